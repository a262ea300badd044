//! Prelude module for Switcher.
//!
//! ```ignore
//! use switcher::prelude::*;
//! ```

// ============================================================================
// Navigation
// ============================================================================

pub use crate::{Navigator, NavigatorHandle, SwitcherConfig};
pub use crate::{SwitcherError, SwitcherResult};
pub use crate::{ViewId, WindowId};

// ============================================================================
// Window Capability
// ============================================================================

pub use crate::{WindowBackend, WindowConfig, WindowControl, WindowModality, WindowStyle};

// ============================================================================
// Views and Geometry
// ============================================================================

pub use crate::{FocusPolicy, Position, ScreenRect, Size, ViewGeometry, ViewRecord, ViewState};
