//! Logging facilities for Switcher.
//!
//! Switcher uses the `tracing` crate for all diagnostics. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // build the navigator, register views...
//! }
//! ```
//!
//! Unknown view or window ids never abort a navigation call. They are
//! reported as `WARN` events under the [`targets::NAVIGATION`] or
//! [`targets::REGISTRY`] target with an `operation` field naming the call,
//! which is usually the fastest way to find a typo'd identifier.
//!
//! Filter a single subsystem with a directive such as
//! `RUST_LOG=switcher::focus=debug`.

/// Span names used throughout Switcher for tracing.
pub mod span_names {
    /// Full show/hide transition span.
    pub const TRANSITION: &str = "switcher::transition";
    /// Dispatch queue draining span.
    pub const DISPATCH: &str = "switcher::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// View and window registries.
    pub const REGISTRY: &str = "switcher::registry";
    /// Back-navigation history.
    pub const HISTORY: &str = "switcher::history";
    /// Focus-loss monitoring (listener and poller).
    pub const FOCUS: &str = "switcher::focus";
    /// Show/hide orchestration.
    pub const NAVIGATION: &str = "switcher::navigation";
    /// Cross-thread dispatch queue.
    pub const DISPATCH: &str = "switcher::dispatch";
    /// Signal/slot system.
    pub const SIGNAL: &str = "switcher::signal";
    /// Performance spans.
    pub const PERF: &str = "switcher::perf";
}

/// Times one navigator operation.
///
/// Enters an `INFO` span named `perf` under [`targets::PERF`] carrying the
/// operation name, and leaves it on drop. Subscribers that record span
/// timings (for example `tracing_subscriber::fmt().with_span_events(..)`)
/// then report how long each show or back navigation took.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "switcher::perf", "perf", operation);
        Self {
            _entered: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let outer = PerfSpan::new("show");
        let inner = PerfSpan::new("show_previous");
        drop(inner);
        drop(outer);
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::REGISTRY,
            targets::HISTORY,
            targets::FOCUS,
            targets::NAVIGATION,
            targets::DISPATCH,
            targets::SIGNAL,
            targets::PERF,
        ] {
            assert!(target.starts_with("switcher::"));
        }
    }
}
