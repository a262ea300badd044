//! Hiding windows when they lose input focus.
//!
//! A [`FocusMonitor`] lives on every window record. When the view a window
//! hosts has focus-loss hiding enabled, the monitor is wired to the window in
//! one of two ways:
//!
//! - **Listener** ([`FocusPolicy::Listener`]): connect to the window's focus
//!   signal. A `false` emission reports the loss.
//! - **Polling** ([`FocusPolicy::Polling`]): a [`FocusPoller`] thread reads
//!   the window's [`FocusProbe`] on an interval and reports each
//!   focused-to-unfocused transition.
//!
//! Either way the report goes to a [`FocusLostSink`], which the navigator
//! backs with its dispatch handle. Nothing here touches a window from a
//! background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use switcher_core::ConnectionId;

use crate::id::WindowId;
use crate::window::{FocusProbe, WindowControl};

/// Receives focus-loss reports. Must be callable from any thread.
pub type FocusLostSink = Arc<dyn Fn(WindowId) + Send + Sync>;

/// How focus loss is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusPolicy {
    /// Subscribe to the window's focus signal.
    #[default]
    Listener,
    /// Poll the window's focus probe from a background thread.
    Polling,
}

/// Sleep intervals for the polling fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Interval between probes while the window is focused.
    pub focused: Duration,
    /// Interval between probes while it is not.
    pub unfocused: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            focused: Duration::from_millis(50),
            unfocused: Duration::from_millis(100),
        }
    }
}

/// Per-window focus-loss wiring.
#[derive(Debug, Default)]
pub struct FocusMonitor {
    connection: Option<ConnectionId>,
    poller: Option<FocusPoller>,
}

impl FocusMonitor {
    /// Create an unwired monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a listener or poller is attached.
    pub fn is_wired(&self) -> bool {
        self.connection.is_some() || self.poller.is_some()
    }

    /// True if wired through the window's focus signal.
    pub fn uses_listener(&self) -> bool {
        self.connection.is_some()
    }

    /// True if wired through a background poller.
    pub fn uses_poller(&self) -> bool {
        self.poller.is_some()
    }

    /// Attach to `window` using `policy`, falling back to the other strategy
    /// when the window lacks the preferred capability.
    ///
    /// Does nothing if already wired.
    pub fn wire<W: WindowControl>(
        &mut self,
        window: &W,
        window_id: WindowId,
        policy: FocusPolicy,
        intervals: PollIntervals,
        sink: &FocusLostSink,
    ) {
        if self.is_wired() {
            return;
        }

        let wired = match policy {
            FocusPolicy::Listener => {
                self.try_listener(window, window_id, sink)
                    || self.try_poller(window, window_id, intervals, sink)
            }
            FocusPolicy::Polling => {
                self.try_poller(window, window_id, intervals, sink)
                    || self.try_listener(window, window_id, sink)
            }
        };

        if !wired {
            tracing::warn!(
                target: "switcher::focus",
                window = %window_id,
                "window offers neither a focus signal nor a focus probe; it will not hide on focus loss"
            );
        }
    }

    /// Detach from `window`. The poller, if any, exits on its next check.
    pub fn unwire<W: WindowControl>(&mut self, window: &W) {
        if let Some(id) = self.connection.take() {
            let removed = window.focus_signal().map(|signal| signal.disconnect(id));
            if let Some(Err(err)) = removed {
                tracing::debug!(target: "switcher::focus", error = %err, "focus listener already gone");
            }
        }
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    fn try_listener<W: WindowControl>(
        &mut self,
        window: &W,
        window_id: WindowId,
        sink: &FocusLostSink,
    ) -> bool {
        let Some(signal) = window.focus_signal() else {
            return false;
        };

        let sink = Arc::clone(sink);
        self.connection = Some(signal.connect(move |focused: &bool| {
            if !*focused {
                sink(window_id);
            }
        }));
        tracing::debug!(target: "switcher::focus", window = %window_id, "focus listener connected");
        true
    }

    fn try_poller<W: WindowControl>(
        &mut self,
        window: &W,
        window_id: WindowId,
        intervals: PollIntervals,
        sink: &FocusLostSink,
    ) -> bool {
        let Some(probe) = window.focus_probe() else {
            return false;
        };

        match FocusPoller::spawn(window_id, probe, intervals, Arc::clone(sink)) {
            Ok(poller) => {
                self.poller = Some(poller);
                true
            }
            Err(err) => {
                tracing::warn!(
                    target: "switcher::focus",
                    window = %window_id,
                    error = %err,
                    "failed to spawn focus poller"
                );
                false
            }
        }
    }
}

/// Background thread polling a window's focus state.
///
/// The thread re-checks its enabled flag on every iteration (at most
/// [`PollIntervals::unfocused`] apart) and exits on its own once the flag is
/// cleared. There is no forced cancellation.
#[derive(Debug)]
pub struct FocusPoller {
    enabled: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FocusPoller {
    /// Start polling `probe`, reporting focus loss to `sink`.
    pub fn spawn(
        window_id: WindowId,
        probe: FocusProbe,
        intervals: PollIntervals,
        sink: FocusLostSink,
    ) -> std::io::Result<Self> {
        let enabled = Arc::new(AtomicBool::new(true));
        let thread_enabled = Arc::clone(&enabled);

        let thread = std::thread::Builder::new()
            .name(format!("switcher-focus-{}", window_id.as_u64()))
            .spawn(move || poll_loop(window_id, &probe, intervals, &sink, &thread_enabled))?;

        tracing::debug!(target: "switcher::focus", window = %window_id, "focus poller started");
        Ok(Self {
            enabled,
            thread: Some(thread),
        })
    }

    /// Ask the thread to exit.
    pub fn stop(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// True until the thread has exited.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop and wait for the thread to exit.
    pub fn join(mut self) -> bool {
        self.stop();
        self.thread.take().is_some_and(|t| t.join().is_ok())
    }
}

impl Drop for FocusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop(
    window_id: WindowId,
    probe: &FocusProbe,
    intervals: PollIntervals,
    sink: &FocusLostSink,
    enabled: &AtomicBool,
) {
    let mut was_focused = false;
    while enabled.load(Ordering::Acquire) {
        if probe() {
            was_focused = true;
            std::thread::sleep(intervals.focused);
            continue;
        }

        if was_focused {
            was_focused = false;
            tracing::trace!(target: "switcher::focus", window = %window_id, "poller observed focus loss");
            sink(window_id);
        }
        std::thread::sleep(intervals.unfocused);
    }
    tracing::debug!(target: "switcher::focus", window = %window_id, "focus poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn fast() -> PollIntervals {
        PollIntervals {
            focused: Duration::from_millis(2),
            unfocused: Duration::from_millis(2),
        }
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_default_intervals() {
        let intervals = PollIntervals::default();
        assert_eq!(intervals.focused, Duration::from_millis(50));
        assert_eq!(intervals.unfocused, Duration::from_millis(100));
    }

    #[test]
    fn test_poller_reports_each_transition_once() {
        let focused = Arc::new(AtomicBool::new(true));
        let reports = Arc::new(AtomicUsize::new(0));

        let probes = Arc::new(AtomicUsize::new(0));

        let probe_flag = Arc::clone(&focused);
        let probe_count = Arc::clone(&probes);
        let probe: FocusProbe = Arc::new(move || {
            let value = probe_flag.load(Ordering::SeqCst);
            probe_count.fetch_add(1, Ordering::SeqCst);
            value
        });
        let sink_reports = Arc::clone(&reports);
        let sink: FocusLostSink = Arc::new(move |_| {
            sink_reports.fetch_add(1, Ordering::SeqCst);
        });

        let poller = FocusPoller::spawn(WindowId::new(1), probe, fast(), sink).unwrap();
        assert!(wait_for(|| probes.load(Ordering::SeqCst) > 0));
        focused.store(false, Ordering::SeqCst);
        assert!(wait_for(|| reports.load(Ordering::SeqCst) == 1));

        // Staying unfocused does not report again.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(reports.load(Ordering::SeqCst), 1);

        focused.store(true, Ordering::SeqCst);
        let seen = probes.load(Ordering::SeqCst);
        assert!(wait_for(|| probes.load(Ordering::SeqCst) > seen + 1));
        focused.store(false, Ordering::SeqCst);
        assert!(wait_for(|| reports.load(Ordering::SeqCst) == 2));

        assert!(poller.join());
    }

    #[test]
    fn test_poller_never_reports_if_never_focused() {
        let reports = Arc::new(AtomicUsize::new(0));
        let sink_reports = Arc::clone(&reports);
        let sink: FocusLostSink = Arc::new(move |_| {
            sink_reports.fetch_add(1, Ordering::SeqCst);
        });

        let poller = FocusPoller::spawn(WindowId::new(2), Arc::new(|| false), fast(), sink).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(reports.load(Ordering::SeqCst), 0);
        assert!(poller.join());
    }

    #[test]
    fn test_poller_exits_after_stop() {
        let sink: FocusLostSink = Arc::new(|_| {});
        let poller = FocusPoller::spawn(WindowId::new(3), Arc::new(|| true), fast(), sink).unwrap();
        assert!(poller.is_running());
        poller.stop();
        assert!(wait_for(|| !poller.is_running()));
    }
}
