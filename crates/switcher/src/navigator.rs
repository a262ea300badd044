//! The navigation controller.
//!
//! [`Navigator`] owns the [`Registry`] and [`HistoryStack`] and sequences
//! every show and hide. It lives on the UI thread: it is not `Send`, so the
//! compiler keeps all window mutation on the thread that created it. Other
//! threads reach it through a [`NavigatorHandle`], whose requests run the
//! next time the owner calls [`Navigator::process_pending`].
//!
//! # Example
//!
//! ```ignore
//! use switcher::prelude::*;
//!
//! let mut nav = Navigator::new(backend, SwitcherConfig::new());
//! nav.register_view(ViewId::new(1), login_panel)?;
//! nav.register_view(ViewId::new(2), main_panel)?;
//!
//! nav.show(ViewId::new(1))?;
//! nav.show(ViewId::new(2))?;
//! assert!(nav.has_history());
//!
//! nav.show_previous()?;
//! assert!(nav.is_showing(ViewId::new(1)));
//!
//! // From a worker thread:
//! let handle = nav.handle();
//! std::thread::spawn(move || handle.show(ViewId::new(2)));
//! // ...and on the next event loop turn:
//! nav.process_pending();
//! ```

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use switcher_core::logging::span_names;
use switcher_core::{CoreError, DispatchHandle, Dispatcher, Observed, PerfSpan, Signal};

use crate::config::SwitcherConfig;
use crate::error::{SwitcherError, SwitcherResult};
use crate::focus::{FocusLostSink, FocusPolicy, PollIntervals};
use crate::geometry::{check_coordinate, check_extent, Position, Size, ViewGeometry};
use crate::history::HistoryStack;
use crate::id::{IdAllocator, ViewId, WindowId};
use crate::registry::{Registry, WindowRecord, WindowRegistration};
use crate::view::{ViewRecord, ViewState};
use crate::window::{ContentOf, WindowBackend, WindowControl, WindowModality, WindowStyle};

/// How a view came to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Direct navigation; recorded in history.
    Forward,
    /// Back navigation; history was already popped.
    Back,
    /// Re-showing the view that was hidden in place.
    Reveal,
}

/// Registers views and windows and switches between them.
pub struct Navigator<B: WindowBackend + 'static> {
    registry: Registry<B>,
    history: HistoryStack,
    has_history: Observed<bool>,
    hide_on_focus_loss: bool,
    focus_policy: FocusPolicy,
    poll_intervals: PollIntervals,
    dispatcher: Rc<Dispatcher<Navigator<B>>>,
    focus_sink: FocusLostSink,
}

impl<B: WindowBackend + 'static> Navigator<B> {
    /// Create a navigator driving windows from `backend`.
    pub fn new(backend: B, config: SwitcherConfig) -> Self {
        let allocator = match config.id_seed() {
            Some(seed) => IdAllocator::with_seed(config.id_range(), seed),
            None => IdAllocator::new(config.id_range()),
        };
        let mut registry = Registry::new(backend, allocator, config.default_window().clone());
        registry.set_reject_duplicate_views(config.reject_duplicate_views());

        let dispatcher: Rc<Dispatcher<Navigator<B>>> = Rc::new(Dispatcher::new());
        let handle = dispatcher.handle();
        let focus_sink: FocusLostSink = Arc::new(move |window: WindowId| {
            // The navigator may already be gone; nothing to hide then.
            let _ = handle.post(move |nav: &mut Navigator<B>| nav.notify_focus_lost(window));
        });

        Self {
            registry,
            history: HistoryStack::new(),
            has_history: Observed::new(false),
            hide_on_focus_loss: config.hide_on_focus_loss(),
            focus_policy: config.focus_policy(),
            poll_intervals: config.poll_intervals(),
            dispatcher,
            focus_sink,
        }
    }

    /// A thread-safe handle for posting navigation requests.
    pub fn handle(&self) -> NavigatorHandle<B> {
        NavigatorHandle {
            inner: self.dispatcher.handle(),
        }
    }

    /// Run every request posted through a [`NavigatorHandle`] so far.
    ///
    /// Call this from the event loop. Returns the number of requests run.
    pub fn process_pending(&mut self) -> usize {
        let dispatcher = Rc::clone(&self.dispatcher);
        dispatcher.process_all(self)
    }

    /// True if posted requests are waiting.
    pub fn has_pending(&self) -> bool {
        self.dispatcher.has_pending()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `content` under `id`, hosted by the default window.
    pub fn register_view(&mut self, id: ViewId, content: ContentOf<B>) -> SwitcherResult<()> {
        self.register_view_record(ViewRecord::new(id, content))
    }

    /// Register a fully configured view record.
    ///
    /// Re-registering an id resets its record. If the view is on screen its
    /// window immediately switches to the new content.
    ///
    /// # Errors
    ///
    /// Only [`SwitcherError::AllocatorExhausted`]. A rejected duplicate is
    /// logged and ignored.
    pub fn register_view_record(&mut self, mut record: ViewRecord<ContentOf<B>>) -> SwitcherResult<()> {
        let id = record.id();
        record.hide_on_focus_loss.get_or_insert(self.hide_on_focus_loss);

        let was_showing = self.is_showing(id);
        let hosting = self.registry.hosting_window(id);

        match self.registry.register_view(record) {
            Ok(_) => {}
            Err(err @ SwitcherError::AllocatorExhausted { .. }) => return Err(err),
            Err(err) => {
                warn_ignored("register_view", &err);
                return Ok(());
            }
        }

        if let Some(window_id) = hosting {
            if let Some((view, window)) = self.registry.view_and_window_mut(id, window_id) {
                if was_showing {
                    view.state = ViewState::Shown;
                    window.window.set_content(&view.content);
                }
            }
            self.refresh_focus(window_id);
        }
        Ok(())
    }

    /// Register a caller-owned window under `id`.
    ///
    /// If `id` is the default window's id, the default window moves to a
    /// generated id first. An id already used by another window is logged
    /// and the new window is dropped.
    pub fn register_window(&mut self, id: WindowId, window: B::Window) -> SwitcherResult<()> {
        match self.registry.register_window(id, window) {
            Ok(WindowRegistration::Inserted) => Ok(()),
            Ok(WindowRegistration::MigratedDefault { new_default }) => {
                // The listener or poller still reports the old id.
                if let Some(record) = self.registry.window_mut(new_default) {
                    let WindowRecord { window, focus, .. } = record;
                    focus.unwire(&*window);
                }
                self.refresh_focus(new_default);
                Ok(())
            }
            Err(err @ SwitcherError::AllocatorExhausted { .. }) => Err(err),
            Err(err) => {
                warn_ignored("register_window", &err);
                Ok(())
            }
        }
    }

    /// Register `window` and a view showing `content` in it, both under
    /// generated ids.
    pub fn register_view_with_window(
        &mut self,
        content: ContentOf<B>,
        window: B::Window,
    ) -> SwitcherResult<(ViewId, WindowId)> {
        let (view, window) = self.registry.register_pair(content, window)?;
        if let Some(record) = self.registry.view_mut(view) {
            record.hide_on_focus_loss = Some(self.hide_on_focus_loss);
        }
        Ok((view, window))
    }

    /// Remove a view.
    ///
    /// Its window keeps whatever it displays and stays visible. The view is
    /// dropped from the back history.
    pub fn remove_view(&mut self, id: ViewId) -> Option<ViewRecord<ContentOf<B>>> {
        let hosting = self.registry.hosting_window(id);
        let record = self.registry.remove_view(id)?;

        if let Some(window_id) = hosting {
            self.refresh_focus(window_id);
        }
        self.update_history(|history| history.purge(id));
        Some(record)
    }

    /// Remove a window and hand it back. Views assigned to it fall back to
    /// the default window.
    pub fn remove_window(&mut self, id: WindowId) -> Option<B::Window> {
        let mut record = self.registry.remove_window(id)?;
        record.focus.unwire(&record.window);

        if let Some(view) = record.current_view() {
            if let Some(view) = self.registry.view_mut(view) {
                if view.state == ViewState::Shown {
                    view.state = ViewState::HiddenBySwitch;
                }
            }
        }
        Some(record.into_window())
    }

    /// Host `view` in `window` from its next show on.
    ///
    /// `window` may be registered later. Until it is, the default window is
    /// used.
    pub fn assign_view_to_window(&mut self, view: ViewId, window: WindowId) {
        if let Err(err) = self.registry.assign_view_to_window(view, window) {
            warn_ignored("assign_view_to_window", &err);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show `view` with its stored geometry.
    pub fn show(&mut self, view: ViewId) -> SwitcherResult<()> {
        self.show_with(view, ViewGeometry::new(), false)
    }

    /// Show `view` at `(x, y)`. The position is remembered and disables
    /// auto-centering for this view.
    pub fn show_at(&mut self, view: ViewId, x: f64, y: f64) -> SwitcherResult<()> {
        self.show_with(view, ViewGeometry::new().with_position(x, y), false)
    }

    /// Show `view`, first storing any overrides in `geometry`.
    ///
    /// Overrides are ignored if `view` is already showing. Invalid geometry
    /// rejects the whole call.
    ///
    /// # Errors
    ///
    /// Only [`SwitcherError::AllocatorExhausted`], when the default window
    /// had to be created and no id was left. Unknown views are logged and
    /// ignored.
    pub fn show_with(&mut self, view: ViewId, geometry: ViewGeometry, maximized: bool) -> SwitcherResult<()> {
        let _perf = PerfSpan::new("show");

        let Some(state) = self.registry.view(view).map(ViewRecord::state) else {
            warn_ignored("show", &SwitcherError::UnknownView(view));
            return Ok(());
        };
        if let Err(err) = geometry.validate("show") {
            warn_ignored("show", &err);
            return Ok(());
        }

        let previous = self.history.last_shown();
        if state == ViewState::Shown && previous == Some(view) {
            if !geometry.is_empty() {
                tracing::debug!(
                    target: "switcher::navigation",
                    view = %view,
                    "view already showing, ignoring geometry overrides"
                );
            }
        } else if let Some(record) = self.registry.view_mut(view) {
            apply_overrides(record, &geometry);
        }

        let transition = if previous == Some(view) && state.is_revealable() {
            Transition::Reveal
        } else {
            Transition::Forward
        };
        self.display(view, maximized, previous, transition)
    }

    /// Go back to the previously shown view.
    ///
    /// Does nothing without history. The view left behind is not kept for
    /// forward navigation.
    pub fn show_previous(&mut self) -> SwitcherResult<()> {
        let _perf = PerfSpan::new("show_previous");

        if !self.history.has_history() {
            tracing::debug!(target: "switcher::history", "no history, show_previous ignored");
            return Ok(());
        }

        let previous = self.history.last_shown();
        let Some(target) = self.update_history(HistoryStack::go_back) else {
            return Ok(());
        };
        self.display(target, false, previous, Transition::Back)
    }

    /// Hide `view`, or whatever is showing when `None`.
    ///
    /// A view still displayed by a window it was switched away from has that
    /// window hidden too.
    ///
    /// The hidden view stays the last shown one, so a bare [`Navigator::show`]
    /// or [`Navigator::unhide`] brings it back.
    pub fn hide(&mut self, view: Option<ViewId>) {
        let target = match view {
            Some(id) => id,
            None => match self.current_view() {
                Some(id) => id,
                None => {
                    tracing::debug!(target: "switcher::navigation", "nothing showing, hide ignored");
                    return;
                }
            },
        };

        let Some(state) = self.registry.view(target).map(ViewRecord::state) else {
            warn_ignored("hide", &SwitcherError::UnknownView(target));
            return;
        };

        // A view switched away from in another window is still on screen.
        let on_screen = state == ViewState::Shown
            || (state == ViewState::HiddenBySwitch && self.registry.hosting_window(target).is_some());
        if !on_screen {
            if state != ViewState::NeverShown {
                if let Some(record) = self.registry.view_mut(target) {
                    record.state = ViewState::HiddenByExplicitHide;
                }
            }
            return;
        }

        self.hide_shown(target, ViewState::HiddenByExplicitHide);
    }

    /// Re-show the last shown view if it was hidden in place.
    pub fn unhide(&mut self) -> SwitcherResult<()> {
        let Some(view) = self.history.last_shown() else {
            return Ok(());
        };
        let revealable = self
            .registry
            .view(view)
            .is_some_and(|record| record.state().is_revealable());
        if !revealable {
            return Ok(());
        }
        self.display(view, false, Some(view), Transition::Reveal)
    }

    /// Hide or re-reveal the current view.
    pub fn set_visible(&mut self, visible: bool) -> SwitcherResult<()> {
        if visible {
            self.unhide()
        } else {
            self.hide(None);
            Ok(())
        }
    }

    /// True if some view is on screen.
    pub fn is_visible(&self) -> bool {
        self.current_view().is_some()
    }

    /// True only if `view` is the view currently on screen.
    pub fn is_showing(&self, view: ViewId) -> bool {
        self.current_view() == Some(view)
    }

    /// The view currently on screen.
    pub fn current_view(&self) -> Option<ViewId> {
        self.history
            .last_shown()
            .filter(|id| self.registry.view(*id).is_some_and(|r| r.state() == ViewState::Shown))
    }

    // =========================================================================
    // Focus-loss hiding
    // =========================================================================

    /// Enable or disable hiding on focus loss, for one view or for all.
    ///
    /// With `None` the setting becomes the default for future views and is
    /// applied to every registered view.
    pub fn set_hide_on_focus_loss(&mut self, hide: bool, view: Option<ViewId>) {
        match view {
            None => {
                self.hide_on_focus_loss = hide;
                for record in self.registry.views_mut() {
                    record.hide_on_focus_loss = Some(hide);
                }
                for window in self.registry.window_ids() {
                    self.refresh_focus(window);
                }
            }
            Some(id) => {
                let Some(record) = self.registry.view_mut(id) else {
                    warn_ignored("set_hide_on_focus_loss", &SwitcherError::UnknownView(id));
                    return;
                };
                record.hide_on_focus_loss = Some(hide);
                if let Some(window) = self.registry.hosting_window(id) {
                    self.refresh_focus(window);
                }
            }
        }
    }

    /// Whether `view` (or, with `None`, new views) hides on focus loss.
    pub fn hides_on_focus_loss(&self, view: Option<ViewId>) -> bool {
        match view {
            None => self.hide_on_focus_loss,
            Some(id) => match self.registry.view(id) {
                Some(record) => record.hide_on_focus_loss(),
                None => {
                    warn_ignored("hides_on_focus_loss", &SwitcherError::UnknownView(id));
                    false
                }
            },
        }
    }

    /// Report that `window` lost input focus.
    ///
    /// Focus listeners and pollers call this through the dispatch queue.
    /// The window is hidden if the view it shows has focus-loss hiding
    /// enabled.
    pub fn notify_focus_lost(&mut self, window: WindowId) {
        let Some(view) = self.registry.window(window).and_then(WindowRecord::current_view) else {
            tracing::trace!(target: "switcher::focus", window = %window, "focus lost by idle window");
            return;
        };
        let applies = self
            .registry
            .view(view)
            .is_some_and(|r| r.state() == ViewState::Shown && r.hide_on_focus_loss());
        if !applies {
            return;
        }

        tracing::debug!(target: "switcher::focus", window = %window, view = %view, "hiding on focus loss");
        self.hide_shown(view, ViewState::HiddenByFocusLoss);
    }

    // =========================================================================
    // View configuration
    // =========================================================================

    /// Replace a view's content, updating its window if it is on screen.
    pub fn set_content(&mut self, view: ViewId, content: ContentOf<B>) {
        let Some(record) = self.registry.view_mut(view) else {
            warn_ignored("set_content", &SwitcherError::UnknownView(view));
            return;
        };
        record.content = content;
        self.with_shown_window(view, |record, window| window.set_content(&record.content));
    }

    /// Set the title shown while `view` is displayed.
    pub fn set_title(&mut self, view: ViewId, title: impl Into<String>) {
        let Some(record) = self.registry.view_mut(view) else {
            warn_ignored("set_title", &SwitcherError::UnknownView(view));
            return;
        };
        record.title = title.into();
        self.with_shown_window(view, |record, window| window.set_title(&record.title));
    }

    /// Store a position for `view` without showing it. Disables
    /// auto-centering for this view.
    pub fn set_view_position(&mut self, view: ViewId, x: f64, y: f64) {
        let checked = check_coordinate("set_view_position", "x", x)
            .and_then(|()| check_coordinate("set_view_position", "y", y));
        if let Err(err) = checked {
            warn_ignored("set_view_position", &err);
            return;
        }
        let Some(record) = self.registry.view_mut(view) else {
            warn_ignored("set_view_position", &SwitcherError::UnknownView(view));
            return;
        };
        let position = Position::new(x, y);
        record.position = Some(position);
        record.has_custom_position = true;
        self.with_shown_window(view, |_, window| window.set_position(position));
    }

    /// Store a size for `view` without showing it.
    pub fn set_view_size(&mut self, view: ViewId, width: f64, height: f64) {
        let checked = check_extent("set_view_size", "width", width)
            .and_then(|()| check_extent("set_view_size", "height", height));
        if let Err(err) = checked {
            warn_ignored("set_view_size", &err);
            return;
        }
        let Some(record) = self.registry.view_mut(view) else {
            warn_ignored("set_view_size", &SwitcherError::UnknownView(view));
            return;
        };
        record.width = Some(width);
        record.height = Some(height);
        self.with_shown_window(view, |_, window| window.set_size(Size::new(width, height)));
    }

    /// Style applied to the hosting window whenever `view` is shown.
    pub fn set_view_style(&mut self, view: ViewId, style: WindowStyle) {
        match self.registry.view_mut(view) {
            Some(record) => record.style = Some(style),
            None => warn_ignored("set_view_style", &SwitcherError::UnknownView(view)),
        }
    }

    /// Modality applied to the hosting window whenever `view` is shown.
    pub fn set_view_modality(&mut self, view: ViewId, modality: WindowModality) {
        match self.registry.view_mut(view) {
            Some(record) => record.modality = Some(modality),
            None => warn_ignored("set_view_modality", &SwitcherError::UnknownView(view)),
        }
    }

    /// Style and modality of the default window. Applied at once if the
    /// default window already exists.
    pub fn configure_default_window(&mut self, style: WindowStyle, modality: WindowModality) {
        let config = self.registry.default_config_mut();
        config.set_style(style);
        config.set_modality(modality);

        let Some(id) = self.registry.default_window_id() else {
            return;
        };
        if let Some(record) = self.registry.window_mut(id) {
            record.window.set_style(style);
            record.window.set_modality(modality);
        }
    }

    /// Call `callback` after `view` is shown.
    pub fn set_on_shown(&mut self, view: ViewId, callback: impl FnMut(ViewId) + 'static) {
        match self.registry.view_mut(view) {
            Some(record) => record.on_shown = Some(Box::new(callback)),
            None => warn_ignored("set_on_shown", &SwitcherError::UnknownView(view)),
        }
    }

    /// Call `callback` after `view` is hidden.
    pub fn set_on_hidden(&mut self, view: ViewId, callback: impl FnMut(ViewId) + 'static) {
        match self.registry.view_mut(view) {
            Some(record) => record.on_hidden = Some(Box::new(callback)),
            None => warn_ignored("set_on_hidden", &SwitcherError::UnknownView(view)),
        }
    }

    pub fn clear_on_shown(&mut self, view: ViewId) {
        if let Some(record) = self.registry.view_mut(view) {
            record.on_shown = None;
        }
    }

    pub fn clear_on_hidden(&mut self, view: ViewId) {
        if let Some(record) = self.registry.view_mut(view) {
            record.on_hidden = None;
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// True if [`Navigator::show_previous`] has somewhere to go.
    pub fn has_history(&self) -> bool {
        *self.has_history.get()
    }

    /// Same as [`Navigator::has_history`].
    pub fn last_scene_available(&self) -> bool {
        self.has_history()
    }

    /// Negation of [`Navigator::has_history`], for a back button's disabled
    /// state.
    pub fn no_history(&self) -> bool {
        !self.has_history()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Signal emitted with the new value whenever [`Navigator::has_history`]
    /// changes.
    pub fn history_changed(&self) -> &Signal<bool> {
        self.has_history.changed()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn view(&self, id: ViewId) -> Option<&ViewRecord<ContentOf<B>>> {
        self.registry.view(id)
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.registry.view_ids()
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.registry.window_ids()
    }

    pub fn default_window_id(&self) -> Option<WindowId> {
        self.registry.default_window_id()
    }

    /// The default window, if created yet.
    pub fn default_window(&self) -> Option<&B::Window> {
        let id = self.registry.default_window_id()?;
        self.registry.window(id).map(WindowRecord::window)
    }

    pub fn window(&self, id: WindowId) -> Option<&B::Window> {
        self.registry.window(id).map(WindowRecord::window)
    }

    /// The window `view` is (or would be) shown in.
    pub fn window_of(&self, view: ViewId) -> Option<&B::Window> {
        let Some(id) = self.registry.lookup_window(view) else {
            if !self.registry.contains_view(view) {
                warn_ignored("window_of", &SwitcherError::UnknownView(view));
            }
            return None;
        };
        self.window(id)
    }

    /// Id of the window `view` is (or would be) shown in.
    pub fn window_id_of(&self, view: ViewId) -> Option<WindowId> {
        self.registry.lookup_window(view)
    }

    /// Whether `window`'s focus-loss monitor is attached.
    pub fn is_focus_monitored(&self, window: WindowId) -> bool {
        self.registry.window(window).is_some_and(|w| w.focus().is_wired())
    }

    pub fn registry(&self) -> &Registry<B> {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        self.registry.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.registry.backend_mut()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn display(
        &mut self,
        view: ViewId,
        maximized: bool,
        previous: Option<ViewId>,
        transition: Transition,
    ) -> SwitcherResult<()> {
        let _span = tracing::debug_span!(
            target: "switcher::navigation",
            span_names::TRANSITION,
            view = %view,
            ?transition
        )
        .entered();

        let window_id = self.registry.resolve_window(view)?;

        if let Some(prev) = previous.filter(|p| *p != view) {
            self.leave(prev, window_id);
        }

        // The view may still be registered as shown in a window it was
        // assigned away from.
        if let Some(old) = self.registry.hosting_window(view).filter(|w| *w != window_id) {
            if let Some(record) = self.registry.window_mut(old) {
                record.current_view = None;
            }
            self.refresh_focus(old);
        }

        let screen = self.registry.backend().primary_screen();
        let Some((record, window)) = self.registry.view_and_window_mut(view, window_id) else {
            return Ok(());
        };
        let control = &mut window.window;

        let current = control.size();
        let size = Size::new(
            record.width.unwrap_or(current.width),
            record.height.unwrap_or(current.height),
        );
        let position = match record.position {
            Some(position) if record.has_custom_position => position,
            _ => screen.centered(size),
        };

        if let Some(style) = record.style {
            control.set_style(style);
        }
        if let Some(modality) = record.modality {
            control.set_modality(modality);
        }
        if !record.title.is_empty() {
            control.set_title(&record.title);
        }
        control.set_size(size);
        control.set_position(position);
        control.set_maximized(maximized);
        control.set_content(&record.content);
        control.show();

        window.current_view = Some(view);
        record.state = ViewState::Shown;
        self.refresh_focus(window_id);

        if transition == Transition::Forward {
            self.update_history(|history| history.showing_new_scene(view));
        }

        let Some((record, window)) = self.registry.view_and_window_mut(view, window_id) else {
            return Ok(());
        };
        window.window.to_front();
        window.window.request_focus();

        tracing::debug!(target: "switcher::navigation", view = %view, window = %window_id, "view shown");
        record.fire_shown();
        Ok(())
    }

    /// Mark `prev` as replaced by a view shown in `next_window`.
    fn leave(&mut self, prev: ViewId, next_window: WindowId) {
        let Some(record) = self.registry.view_mut(prev) else {
            return;
        };
        if record.state == ViewState::NeverShown {
            return;
        }
        record.state = ViewState::HiddenBySwitch;

        if let Some(window) = self.registry.hosting_window(prev).filter(|w| *w != next_window) {
            self.refresh_focus(window);
        }
    }

    fn hide_shown(&mut self, view: ViewId, state: ViewState) {
        if let Some(hosting) = self.registry.hosting_window(view) {
            if let Some(record) = self.registry.window_mut(hosting) {
                record.window.hide();
            }
        }

        tracing::debug!(target: "switcher::navigation", view = %view, ?state, "view hidden");
        if let Some(record) = self.registry.view_mut(view) {
            record.state = state;
            record.fire_hidden();
        }
    }

    /// Wire or unwire `window`'s focus monitor to match the view it shows.
    fn refresh_focus(&mut self, window: WindowId) {
        let wanted = self.registry.window(window).and_then(WindowRecord::current_view).and_then(|view| {
            self.registry
                .view(view)
                .filter(|r| r.state() == ViewState::Shown && r.hide_on_focus_loss())
                .map(|r| r.focus_policy().unwrap_or(self.focus_policy))
        });

        let intervals = self.poll_intervals;
        let sink = Arc::clone(&self.focus_sink);
        let Some(record) = self.registry.window_mut(window) else {
            return;
        };
        let WindowRecord { window: control, focus, .. } = record;
        match wanted {
            Some(policy) => focus.wire(&*control, window, policy, intervals, &sink),
            None => focus.unwire(&*control),
        }
    }

    fn with_shown_window(
        &mut self,
        view: ViewId,
        apply: impl FnOnce(&ViewRecord<ContentOf<B>>, &mut B::Window),
    ) {
        if !self.is_showing(view) {
            return;
        }
        let Some(window) = self.registry.hosting_window(view) else {
            return;
        };
        if let Some((record, window)) = self.registry.view_and_window_mut(view, window) {
            apply(record, &mut window.window);
        }
    }

    fn update_history<R>(&mut self, change: impl FnOnce(&mut HistoryStack) -> R) -> R {
        let result = change(&mut self.history);
        let has_history = self.history.has_history();
        if self.has_history.set(has_history) {
            tracing::trace!(target: "switcher::history", has_history, "history availability changed");
        }
        result
    }
}

impl<B: WindowBackend + 'static> fmt::Debug for Navigator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .field("history", &self.history)
            .field("current_view", &self.current_view())
            .field("hide_on_focus_loss", &self.hide_on_focus_loss)
            .field("focus_policy", &self.focus_policy)
            .finish_non_exhaustive()
    }
}

fn apply_overrides<C>(record: &mut ViewRecord<C>, geometry: &ViewGeometry) {
    if geometry.width.is_some() {
        record.width = geometry.width;
    }
    if geometry.height.is_some() {
        record.height = geometry.height;
    }
    if geometry.x.is_some() || geometry.y.is_some() {
        let base = record.position.unwrap_or_default();
        record.position = Some(Position::new(
            geometry.x.unwrap_or(base.x),
            geometry.y.unwrap_or(base.y),
        ));
        record.has_custom_position = true;
    }
}

fn warn_ignored(operation: &'static str, err: &SwitcherError) {
    match err {
        SwitcherError::UnknownView(id) => {
            tracing::warn!(target: "switcher::navigation", operation, view = %id, "unknown view");
        }
        SwitcherError::UnknownWindow(id) | SwitcherError::DuplicateWindow(id) => {
            tracing::warn!(target: "switcher::registry", operation, window = %id, "{err}");
        }
        other => {
            tracing::warn!(target: "switcher::navigation", operation, "{other}");
        }
    }
}

/// Posts navigation requests to a [`Navigator`] from any thread.
///
/// Requests are fire-and-forget. They run in arrival order on the
/// navigator's thread at its next [`Navigator::process_pending`].
pub struct NavigatorHandle<B: WindowBackend + 'static> {
    inner: DispatchHandle<Navigator<B>>,
}

impl<B: WindowBackend + 'static> NavigatorHandle<B> {
    /// Post an arbitrary request.
    ///
    /// Returns [`CoreError::QueueClosed`] if the navigator was dropped.
    pub fn post<F>(&self, request: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Navigator<B>) + Send + 'static,
    {
        self.inner.post(request)
    }

    pub fn show(&self, view: ViewId) -> Result<(), CoreError> {
        self.post(move |nav| log_failure("show", nav.show(view)))
    }

    pub fn show_previous(&self) -> Result<(), CoreError> {
        self.post(|nav| log_failure("show_previous", nav.show_previous()))
    }

    pub fn hide(&self, view: Option<ViewId>) -> Result<(), CoreError> {
        self.post(move |nav| nav.hide(view))
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), CoreError> {
        self.post(move |nav| log_failure("set_visible", nav.set_visible(visible)))
    }
}

impl<B: WindowBackend + 'static> Clone for NavigatorHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: WindowBackend + 'static> fmt::Debug for NavigatorHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorHandle").field("inner", &self.inner).finish()
    }
}

fn log_failure(operation: &'static str, result: SwitcherResult<()>) {
    if let Err(err) = result {
        tracing::error!(target: "switcher::navigation", operation, error = %err, "posted request failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenRect;
    use crate::window::WindowConfig;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<String>>>;

    struct LogWindow {
        log: Log,
        size: Size,
    }

    impl WindowControl for LogWindow {
        type Content = &'static str;
        fn set_size(&mut self, size: Size) {
            self.size = size;
            self.log.borrow_mut().push(format!("size {}x{}", size.width, size.height));
        }
        fn size(&self) -> Size {
            self.size
        }
        fn set_position(&mut self, position: Position) {
            self.log.borrow_mut().push(format!("position {},{}", position.x, position.y));
        }
        fn set_maximized(&mut self, maximized: bool) {
            self.log.borrow_mut().push(format!("maximized {maximized}"));
        }
        fn set_title(&mut self, title: &str) {
            self.log.borrow_mut().push(format!("title {title}"));
        }
        fn set_content(&mut self, content: &&'static str) {
            self.log.borrow_mut().push(format!("content {content}"));
        }
        fn show(&mut self) {
            self.log.borrow_mut().push("show".into());
        }
        fn hide(&mut self) {
            self.log.borrow_mut().push("hide".into());
        }
        fn to_front(&mut self) {
            self.log.borrow_mut().push("to_front".into());
        }
        fn request_focus(&mut self) {
            self.log.borrow_mut().push("request_focus".into());
        }
        fn is_focused(&self) -> bool {
            true
        }
    }

    struct LogBackend {
        log: Log,
    }

    impl WindowBackend for LogBackend {
        type Window = LogWindow;
        fn create_window(&mut self, _config: &WindowConfig) -> LogWindow {
            LogWindow {
                log: Rc::clone(&self.log),
                size: Size::new(400.0, 300.0),
            }
        }
        fn primary_screen(&self) -> ScreenRect {
            ScreenRect::new(0.0, 0.0, 1000.0, 800.0)
        }
    }

    // The handle crosses threads even when the backend cannot.
    static_assertions::assert_impl_all!(NavigatorHandle<LogBackend>: Send, Sync, Clone);
    static_assertions::assert_not_impl_any!(Navigator<LogBackend>: Send, Sync);

    fn navigator() -> (Navigator<LogBackend>, Log) {
        let log: Log = Rc::default();
        let backend = LogBackend { log: Rc::clone(&log) };
        (Navigator::new(backend, SwitcherConfig::new().with_id_seed(11)), log)
    }

    #[test]
    fn test_show_sequence() {
        let (mut nav, log) = navigator();
        let view = ViewId::new(1);
        nav.register_view(view, "home").unwrap();
        nav.set_title(view, "Home");
        nav.show(view).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "title Home",
                "size 400x300",
                "position 300,250",
                "maximized false",
                "content home",
                "show",
                "to_front",
                "request_focus",
            ]
        );
    }

    #[test]
    fn test_transition_fires_shown_after_focus_request() {
        let (mut nav, log) = navigator();
        let view = ViewId::new(1);
        nav.register_view(view, "home").unwrap();

        let seen = Rc::clone(&log);
        nav.set_on_shown(view, move |id| seen.borrow_mut().push(format!("shown {id}")));
        nav.show(view).unwrap();

        let log = log.borrow();
        assert_eq!(log.last().map(String::as_str), Some("shown view#1"));
        assert_eq!(log[log.len() - 2], "request_focus");
    }

    #[test]
    fn test_unknown_view_is_ignored() {
        let (mut nav, log) = navigator();
        nav.show(ViewId::new(404)).unwrap();
        nav.hide(Some(ViewId::new(404)));
        nav.set_content(ViewId::new(404), "x");
        assert!(log.borrow().is_empty());
        assert_eq!(nav.current_view(), None);
    }

    #[test]
    fn test_history_changed_emits_on_flip_only() {
        let (mut nav, _log) = navigator();
        let emitted = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&emitted);
        nav.history_changed().connect(move |value: &bool| sink.lock().push(*value));

        for n in 1..=3 {
            nav.register_view(ViewId::new(n), "v").unwrap();
            nav.show(ViewId::new(n)).unwrap();
        }
        nav.show_previous().unwrap();
        nav.show_previous().unwrap();

        assert_eq!(*emitted.lock(), vec![true, false]);
        assert!(nav.no_history());
    }

    #[test]
    fn test_process_pending_runs_posted_requests() {
        let (mut nav, _log) = navigator();
        nav.register_view(ViewId::new(1), "a").unwrap();
        let handle = nav.handle();

        std::thread::spawn(move || handle.show(ViewId::new(1)).unwrap())
            .join()
            .unwrap();

        assert!(!nav.is_showing(ViewId::new(1)));
        assert_eq!(nav.process_pending(), 1);
        assert!(nav.is_showing(ViewId::new(1)));
    }

    #[test]
    fn test_handle_fails_after_navigator_dropped() {
        let (nav, _log) = navigator();
        let handle = nav.handle();
        drop(nav);
        assert_eq!(handle.hide(None), Err(CoreError::QueueClosed));
    }
}
