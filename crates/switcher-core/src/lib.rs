//! Core primitives for Switcher.
//!
//! This crate provides the building blocks the navigation manager is made of:
//!
//! - **Signal/Slot System**: Type-safe change notification ([`Signal`])
//! - **Observed Values**: Values that emit a signal when they change
//!   ([`Observed`])
//! - **Dispatch Queue**: Marshalling work onto the single UI context
//!   ([`Dispatcher`], [`DispatchHandle`])
//! - **Logging**: `tracing` targets and span helpers shared by all crates
//!
//! # Signal/Slot Example
//!
//! ```
//! use switcher_core::Signal;
//!
//! let history_changed = Signal::<bool>::new();
//!
//! let conn_id = history_changed.connect(|has_history| {
//!     println!("back button enabled: {}", has_history);
//! });
//!
//! history_changed.emit(true);
//! history_changed.disconnect(conn_id).unwrap();
//! ```
//!
//! # Dispatch Example
//!
//! ```
//! use switcher_core::Dispatcher;
//!
//! struct Counter(u32);
//!
//! let dispatcher = Dispatcher::<Counter>::new();
//! let handle = dispatcher.handle();
//!
//! std::thread::spawn(move || {
//!     handle.post(|c: &mut Counter| c.0 += 1).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut counter = Counter(0);
//! dispatcher.process_all(&mut counter);
//! assert_eq!(counter.0, 1);
//! ```

mod dispatch;
mod error;
pub mod logging;
pub mod observed;
pub mod signal;

pub use dispatch::{DispatchHandle, Dispatcher};
pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use observed::Observed;
pub use signal::{ConnectionId, Signal};
