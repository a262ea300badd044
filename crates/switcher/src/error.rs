//! Error types for the navigation manager.

use thiserror::Error;

use switcher_core::CoreError;

use crate::id::{ViewId, WindowId};

/// Errors that can occur while registering or navigating views.
///
/// Only [`SwitcherError::AllocatorExhausted`] ever escapes the public
/// [`crate::Navigator`] API. Every other variant is reported as a warning
/// and turns the offending call into a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwitcherError {
    /// The view id has never been registered, or was removed.
    #[error("view {0} is not registered")]
    UnknownView(ViewId),

    /// The window id has never been registered, or was removed.
    #[error("window {0} is not registered")]
    UnknownWindow(WindowId),

    /// A view was re-registered while duplicate rejection is enabled.
    #[error("view {0} is already registered")]
    DuplicateView(ViewId),

    /// A window id is already taken; remove the existing window first.
    #[error("window {0} is already registered")]
    DuplicateWindow(WindowId),

    /// Every identifier in the allocator's range is in use.
    #[error("identifier range {low}..={high} is exhausted")]
    AllocatorExhausted {
        /// Lowest identifier in the range.
        low: u64,
        /// Highest identifier in the range.
        high: u64,
    },

    /// A position or size value was rejected.
    #[error("invalid geometry passed to {operation}: {reason}")]
    InvalidGeometry {
        /// The public call that received the value.
        operation: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Error from the core primitives.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for navigation operations.
pub type SwitcherResult<T> = Result<T, SwitcherError>;
