//! Switcher - view/window navigation for desktop applications.
//!
//! Switcher keeps track of logical **views** (panels of caller-owned
//! content) and the top-level **windows** that host them. Callers switch
//! the visible view by a stable [`ViewId`] and get single-step back
//! navigation for free.
//!
//! The crate never builds UI. Integrators implement [`WindowBackend`] and
//! [`WindowControl`] over their toolkit, and [`Navigator`] drives those
//! calls:
//!
//! - **Registry**: views, windows, and a lazily created default window
//! - **History**: back navigation with a [`Signal`] for back-button state
//! - **Geometry**: persisted sizes and positions with auto-centering
//! - **Focus-loss hiding**: via window focus signals or a polling thread
//! - **Cross-thread requests**: [`NavigatorHandle`] posts onto the UI thread
//!
//! # Example
//!
//! ```ignore
//! use switcher::prelude::*;
//!
//! let mut nav = Navigator::new(MyBackend::new(), SwitcherConfig::new());
//! nav.register_view(ViewId::new(1), menu)?;
//! nav.register_view(ViewId::new(2), settings)?;
//! nav.set_hide_on_focus_loss(true, Some(ViewId::new(2)));
//!
//! nav.show(ViewId::new(1))?;
//! nav.show_at(ViewId::new(2), 40.0, 40.0)?;
//! nav.show_previous()?;
//! ```
//!
//! # Logging
//!
//! Everything is reported through `tracing` under the `switcher::*`
//! targets listed in [`switcher_core::logging::targets`]. Calls naming an
//! unknown view or window log a warning and do nothing.

mod config;
mod error;
mod focus;
mod geometry;
mod history;
mod id;
mod navigator;
mod registry;
mod view;
mod window;

pub mod prelude;

pub use config::SwitcherConfig;
pub use error::{SwitcherError, SwitcherResult};
pub use focus::{FocusLostSink, FocusMonitor, FocusPoller, FocusPolicy, PollIntervals};
pub use geometry::{Position, ScreenRect, Size, ViewGeometry};
pub use history::HistoryStack;
pub use id::{IdAllocator, ViewId, WindowId, DEFAULT_ID_RANGE};
pub use navigator::{Navigator, NavigatorHandle};
pub use registry::{Registry, WindowRecord, WindowRegistration};
pub use view::{LifecycleCallback, ViewRecord, ViewState};
pub use window::{
    ContentOf, FocusProbe, WindowBackend, WindowConfig, WindowControl, WindowModality, WindowStyle,
};

pub use switcher_core::{ConnectionId, CoreError, Signal};
