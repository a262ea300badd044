//! The window-control capability consumed by the navigator.
//!
//! The navigator never builds UI itself. An integrator implements
//! [`WindowBackend`] (create windows, describe the primary screen) and
//! [`WindowControl`] (everything done to one window) on top of whatever
//! toolkit the application uses, and the navigator drives those calls.
//!
//! # Focus capabilities
//!
//! Focus-loss hiding needs one of two optional capabilities:
//!
//! - [`WindowControl::focus_signal`]: a signal emitted with the new focus
//!   state. The navigator subscribes to it (preferred).
//! - [`WindowControl::focus_probe`]: a thread-safe reader of the current
//!   focus state, polled from a background thread (legacy fallback).
//!
//! Windows offering neither simply never auto-hide.

use std::sync::Arc;

use switcher_core::Signal;

use crate::geometry::{Position, ScreenRect, Size};

/// Thread-safe reader of a window's current focus state.
pub type FocusProbe = Arc<dyn Fn() -> bool + Send + Sync>;

/// Decoration style applied to a hosting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowStyle {
    /// Title bar and borders from the platform.
    #[default]
    Decorated,
    /// No title bar or borders.
    Undecorated,
    /// No decorations and a transparent background.
    Transparent,
    /// Minimal decorations for tool palettes.
    Utility,
}

/// How a window blocks input to other windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowModality {
    /// The window does not block other windows.
    #[default]
    NonModal,
    /// The window blocks its owner window.
    WindowModal,
    /// The window blocks every other window of the application.
    ApplicationModal,
}

/// Options for a window the navigator asks the backend to create.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowConfig {
    title: String,
    style: WindowStyle,
    modality: WindowModality,
}

impl WindowConfig {
    /// Create a configuration with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the decoration style.
    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the modality.
    pub fn with_modality(mut self, modality: WindowModality) -> Self {
        self.modality = modality;
        self
    }

    /// Window title, possibly empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Decoration style.
    pub fn style(&self) -> WindowStyle {
        self.style
    }

    /// Modality.
    pub fn modality(&self) -> WindowModality {
        self.modality
    }

    pub(crate) fn set_style(&mut self, style: WindowStyle) {
        self.style = style;
    }

    pub(crate) fn set_modality(&mut self, modality: WindowModality) {
        self.modality = modality;
    }
}

/// Operations the navigator performs on one top-level window.
///
/// All methods are called from the UI context that owns the navigator.
pub trait WindowControl {
    /// Opaque content the window can display. The navigator stores it per
    /// view and hands it back through [`WindowControl::set_content`].
    type Content;

    /// Resize the window.
    fn set_size(&mut self, size: Size);

    /// Current window size, used when a view has no size of its own.
    fn size(&self) -> Size;

    /// Move the window's top-left corner.
    fn set_position(&mut self, position: Position);

    /// Maximize or restore the window.
    fn set_maximized(&mut self, maximized: bool);

    /// Set the title bar text.
    fn set_title(&mut self, title: &str);

    /// Apply a decoration style.
    fn set_style(&mut self, _style: WindowStyle) {}

    /// Apply a modality.
    fn set_modality(&mut self, _modality: WindowModality) {}

    /// Replace the displayed content.
    fn set_content(&mut self, content: &Self::Content);

    /// Make the window visible.
    fn show(&mut self);

    /// Hide the window without destroying it.
    fn hide(&mut self);

    /// Raise the window above its siblings.
    fn to_front(&mut self);

    /// Ask the platform to give the window input focus.
    fn request_focus(&mut self);

    /// Whether the window currently has input focus.
    fn is_focused(&self) -> bool;

    /// Signal emitted with the new focus state whenever it changes.
    fn focus_signal(&self) -> Option<&Signal<bool>> {
        None
    }

    /// Thread-safe focus reader for the polling fallback.
    fn focus_probe(&self) -> Option<FocusProbe> {
        None
    }
}

/// Factory and environment queries for windows.
pub trait WindowBackend {
    /// The window type this backend produces.
    type Window: WindowControl;

    /// Construct a new (hidden) window.
    fn create_window(&mut self, config: &WindowConfig) -> Self::Window;

    /// Visible bounds of the primary display, used for centering.
    fn primary_screen(&self) -> ScreenRect;
}

/// Content type of a backend's windows.
pub type ContentOf<B> = <<B as WindowBackend>::Window as WindowControl>::Content;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_builders() {
        let config = WindowConfig::new("Main")
            .with_style(WindowStyle::Utility)
            .with_modality(WindowModality::ApplicationModal);
        assert_eq!(config.title(), "Main");
        assert_eq!(config.style(), WindowStyle::Utility);
        assert_eq!(config.modality(), WindowModality::ApplicationModal);
    }

    #[test]
    fn test_window_config_default() {
        let config = WindowConfig::default();
        assert!(config.title().is_empty());
        assert_eq!(config.style(), WindowStyle::Decorated);
        assert_eq!(config.modality(), WindowModality::NonModal);
    }
}
