//! Error types for Switcher core primitives.

use std::fmt;

/// Errors raised by the core primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The UI context that owned the dispatch queue has been dropped.
    QueueClosed,
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueClosed => {
                write!(f, "The UI dispatch queue is closed; its owner has been dropped")
            }
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
        }
    }
}

impl std::error::Error for CoreError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
