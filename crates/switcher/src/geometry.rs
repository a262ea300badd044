//! Geometry values persisted per view.
//!
//! All values are logical pixels as `f64`. The navigator never clamps a
//! caller-supplied position to the screen: a custom position that lands
//! off-screen is the caller's responsibility.

use crate::error::{SwitcherError, SwitcherResult};

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A top-left window position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible bounds of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl ScreenRect {
    /// Create a new screen rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Position that centers a window of `size` on this screen.
    pub fn centered(&self, size: Size) -> Position {
        Position {
            x: self.x + self.width / 2.0 - size.width / 2.0,
            y: self.y + self.height / 2.0 - size.height / 2.0,
        }
    }
}

/// Optional geometry overrides passed to a show call.
///
/// Each value that is set is persisted into the view's record and reused by
/// later calls. Setting `x`/`y` marks the view as custom-positioned, which
/// permanently disables auto-centering for it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewGeometry {
    /// Override width.
    pub width: Option<f64>,
    /// Override height.
    pub height: Option<f64>,
    /// Override left edge.
    pub x: Option<f64>,
    /// Override top edge.
    pub y: Option<f64>,
}

impl ViewGeometry {
    /// No overrides.
    pub const fn new() -> Self {
        Self {
            width: None,
            height: None,
            x: None,
            y: None,
        }
    }

    /// Override the size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Override the position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// True when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.x.is_none() && self.y.is_none()
    }

    /// Reject negative or non-finite positions and non-positive sizes.
    pub fn validate(&self, operation: &'static str) -> SwitcherResult<()> {
        if let Some(x) = self.x {
            check_coordinate(operation, "x", x)?;
        }
        if let Some(y) = self.y {
            check_coordinate(operation, "y", y)?;
        }
        if let Some(width) = self.width {
            check_extent(operation, "width", width)?;
        }
        if let Some(height) = self.height {
            check_extent(operation, "height", height)?;
        }
        Ok(())
    }
}

pub(crate) fn check_coordinate(operation: &'static str, name: &str, value: f64) -> SwitcherResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SwitcherError::InvalidGeometry {
            operation,
            reason: format!("{name} must be a non-negative number, got {value}"),
        })
    }
}

pub(crate) fn check_extent(operation: &'static str, name: &str, value: f64) -> SwitcherResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SwitcherError::InvalidGeometry {
            operation,
            reason: format!("{name} must be a positive number, got {value}"),
        })
    }
}
