//! Navigator configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::focus::{FocusPolicy, PollIntervals};
use crate::id::DEFAULT_ID_RANGE;
use crate::window::{WindowConfig, WindowModality, WindowStyle};

/// Configuration for a [`crate::Navigator`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use switcher::{FocusPolicy, SwitcherConfig};
///
/// let config = SwitcherConfig::new()
///     .with_focus_policy(FocusPolicy::Polling)
///     .with_poll_intervals(Duration::from_millis(20), Duration::from_millis(40))
///     .with_hide_on_focus_loss(true)
///     .with_default_title("Main");
/// assert_eq!(config.focus_policy(), FocusPolicy::Polling);
/// assert!(config.hide_on_focus_loss());
/// ```
#[derive(Debug, Clone)]
pub struct SwitcherConfig {
    id_range: RangeInclusive<u64>,
    id_seed: Option<u64>,
    focus_policy: FocusPolicy,
    poll_intervals: PollIntervals,
    hide_on_focus_loss: bool,
    default_window: WindowConfig,
    reject_duplicate_views: bool,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            id_range: DEFAULT_ID_RANGE,
            id_seed: None,
            focus_policy: FocusPolicy::default(),
            poll_intervals: PollIntervals::default(),
            hide_on_focus_loss: false,
            default_window: WindowConfig::default(),
            reject_duplicate_views: false,
        }
    }
}

impl SwitcherConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the range generated identifiers are drawn from.
    pub fn with_id_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.id_range = range;
        self
    }

    /// Seed the identifier generator for reproducible ids.
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    /// Set the global focus-loss detection strategy.
    pub fn with_focus_policy(mut self, policy: FocusPolicy) -> Self {
        self.focus_policy = policy;
        self
    }

    /// Set the polling intervals used by [`FocusPolicy::Polling`].
    pub fn with_poll_intervals(mut self, focused: Duration, unfocused: Duration) -> Self {
        self.poll_intervals = PollIntervals { focused, unfocused };
        self
    }

    /// Set the focus-loss hiding default for newly registered views.
    pub fn with_hide_on_focus_loss(mut self, hide: bool) -> Self {
        self.hide_on_focus_loss = hide;
        self
    }

    /// Set the configuration used when the default window is created.
    pub fn with_default_window(mut self, config: WindowConfig) -> Self {
        self.default_window = config;
        self
    }

    /// Set the default window's title.
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        let style = self.default_window.style();
        let modality = self.default_window.modality();
        self.default_window = WindowConfig::new(title)
            .with_style(style)
            .with_modality(modality);
        self
    }

    /// Set the default window's style.
    pub fn with_default_style(mut self, style: WindowStyle) -> Self {
        self.default_window.set_style(style);
        self
    }

    /// Set the default window's modality.
    pub fn with_default_modality(mut self, modality: WindowModality) -> Self {
        self.default_window.set_modality(modality);
        self
    }

    /// Refuse to overwrite an already registered view.
    pub fn with_reject_duplicate_views(mut self, reject: bool) -> Self {
        self.reject_duplicate_views = reject;
        self
    }

    pub fn id_range(&self) -> RangeInclusive<u64> {
        self.id_range.clone()
    }

    pub fn id_seed(&self) -> Option<u64> {
        self.id_seed
    }

    pub fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    pub fn poll_intervals(&self) -> PollIntervals {
        self.poll_intervals
    }

    pub fn hide_on_focus_loss(&self) -> bool {
        self.hide_on_focus_loss
    }

    pub fn default_window(&self) -> &WindowConfig {
        &self.default_window
    }

    pub fn reject_duplicate_views(&self) -> bool {
        self.reject_duplicate_views
    }
}
