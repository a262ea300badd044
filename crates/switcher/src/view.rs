//! Per-view records.

use std::fmt;

use crate::focus::FocusPolicy;
use crate::geometry::Position;
use crate::id::{ViewId, WindowId};
use crate::window::{WindowModality, WindowStyle};

/// Callback invoked with the id of a view after it is shown or hidden.
pub type LifecycleCallback = Box<dyn FnMut(ViewId)>;

/// Visibility state of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    /// Registered but never displayed.
    #[default]
    NeverShown,
    /// The current view, displayed in its window.
    Shown,
    /// Another view became current.
    HiddenBySwitch,
    /// Its window lost focus while focus-loss hiding was enabled.
    HiddenByFocusLoss,
    /// Hidden by an explicit hide request.
    HiddenByExplicitHide,
}

impl ViewState {
    /// True for the two states a bare re-show reveals without a new
    /// history entry.
    pub fn is_revealable(self) -> bool {
        matches!(self, Self::HiddenByFocusLoss | Self::HiddenByExplicitHide)
    }
}

/// Persisted configuration of one registered view.
pub struct ViewRecord<C> {
    id: ViewId,
    pub(crate) window: Option<WindowId>,
    pub(crate) content: C,
    pub(crate) width: Option<f64>,
    pub(crate) height: Option<f64>,
    pub(crate) position: Option<Position>,
    pub(crate) has_custom_position: bool,
    pub(crate) hide_on_focus_loss: Option<bool>,
    pub(crate) focus_policy: Option<FocusPolicy>,
    pub(crate) title: String,
    pub(crate) style: Option<WindowStyle>,
    pub(crate) modality: Option<WindowModality>,
    pub(crate) state: ViewState,
    pub(crate) on_shown: Option<LifecycleCallback>,
    pub(crate) on_hidden: Option<LifecycleCallback>,
}

impl<C> ViewRecord<C> {
    /// Create a record with no geometry, hosted by the default window.
    pub fn new(id: ViewId, content: C) -> Self {
        Self {
            id,
            window: None,
            content,
            width: None,
            height: None,
            position: None,
            has_custom_position: false,
            hide_on_focus_loss: None,
            focus_policy: None,
            title: String::new(),
            style: None,
            modality: None,
            state: ViewState::NeverShown,
            on_shown: None,
            on_hidden: None,
        }
    }

    /// Set the initial size. `None` inherits the window's size at show time.
    pub fn with_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Host the view in `window` instead of the default window.
    pub fn with_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_modality(mut self, modality: WindowModality) -> Self {
        self.modality = Some(modality);
        self
    }

    /// Hide the view when its window loses focus. Left unset, the view
    /// follows the navigator's default when registered.
    pub fn with_hide_on_focus_loss(mut self, hide: bool) -> Self {
        self.hide_on_focus_loss = Some(hide);
        self
    }

    /// Override the navigator's focus-loss detection strategy for this view.
    pub fn with_focus_policy(mut self, policy: FocusPolicy) -> Self {
        self.focus_policy = Some(policy);
        self
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Assigned window, `None` meaning the default window.
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Persisted top-left corner, `None` until first positioned.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// True once a caller set an explicit position. Auto-centering is then
    /// never applied again.
    pub fn has_custom_position(&self) -> bool {
        self.has_custom_position
    }

    pub fn hide_on_focus_loss(&self) -> bool {
        self.hide_on_focus_loss.unwrap_or(false)
    }

    pub fn focus_policy(&self) -> Option<FocusPolicy> {
        self.focus_policy
    }

    /// Title, empty when unset.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn style(&self) -> Option<WindowStyle> {
        self.style
    }

    pub fn modality(&self) -> Option<WindowModality> {
        self.modality
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// True if hidden without another view taking its place.
    pub fn is_hidden(&self) -> bool {
        self.state.is_revealable()
    }

    pub fn has_on_shown(&self) -> bool {
        self.on_shown.is_some()
    }

    pub fn has_on_hidden(&self) -> bool {
        self.on_hidden.is_some()
    }

    pub(crate) fn fire_shown(&mut self) {
        let id = self.id;
        if let Some(callback) = self.on_shown.as_mut() {
            callback(id);
        }
    }

    pub(crate) fn fire_hidden(&mut self) {
        let id = self.id;
        if let Some(callback) = self.on_hidden.as_mut() {
            callback(id);
        }
    }
}

impl<C> fmt::Debug for ViewRecord<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRecord")
            .field("id", &self.id)
            .field("window", &self.window)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("position", &self.position)
            .field("has_custom_position", &self.has_custom_position)
            .field("hide_on_focus_loss", &self.hide_on_focus_loss)
            .field("title", &self.title)
            .field("state", &self.state)
            .field("on_shown", &self.on_shown.is_some())
            .field("on_hidden", &self.on_hidden.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_new_record_defaults() {
        let record = ViewRecord::new(ViewId::new(5), "content");
        assert_eq!(record.id(), ViewId::new(5));
        assert_eq!(record.window(), None);
        assert_eq!(record.position(), None);
        assert!(!record.has_custom_position());
        assert_eq!(record.state(), ViewState::NeverShown);
        assert!(!record.is_hidden());
        assert!(record.title().is_empty());
    }

    #[test]
    fn test_builders() {
        let record = ViewRecord::new(ViewId::new(1), ())
            .with_size(Some(300.0), None)
            .with_window(WindowId::new(9))
            .with_title("Settings")
            .with_style(WindowStyle::Utility);
        assert_eq!(record.width(), Some(300.0));
        assert_eq!(record.height(), None);
        assert_eq!(record.window(), Some(WindowId::new(9)));
        assert_eq!(record.title(), "Settings");
        assert_eq!(record.style(), Some(WindowStyle::Utility));
        assert_eq!(record.modality(), None);
    }

    #[test]
    fn test_focus_loss_flag_unset_until_chosen() {
        let record = ViewRecord::new(ViewId::new(1), ());
        assert_eq!(record.hide_on_focus_loss, None);
        assert!(!record.hide_on_focus_loss());

        let record = record.with_hide_on_focus_loss(false);
        assert_eq!(record.hide_on_focus_loss, Some(false));
    }

    #[test]
    fn test_revealable_states() {
        assert!(ViewState::HiddenByFocusLoss.is_revealable());
        assert!(ViewState::HiddenByExplicitHide.is_revealable());
        assert!(!ViewState::HiddenBySwitch.is_revealable());
        assert!(!ViewState::Shown.is_revealable());
        assert!(!ViewState::NeverShown.is_revealable());
    }

    #[test]
    fn test_callbacks_receive_id() {
        let seen = Rc::new(Cell::new(0));
        let mut record = ViewRecord::new(ViewId::new(42), ());
        record.fire_shown();

        let seen_clone = Rc::clone(&seen);
        record.on_shown = Some(Box::new(move |id| seen_clone.set(id.as_u64())));
        record.fire_shown();
        assert_eq!(seen.get(), 42);
        assert!(record.has_on_shown());
        assert!(!record.has_on_hidden());
    }
}
