//! Identifier-keyed storage for views and windows.
//!
//! The registry owns every [`ViewRecord`] and [`WindowRecord`], the window
//! backend, and the identifier allocator. It knows which window is the
//! default one and creates it on first use, but it never shows, hides or
//! moves anything: that sequencing belongs to [`crate::Navigator`].

use std::collections::HashMap;
use std::fmt;

use crate::error::{SwitcherError, SwitcherResult};
use crate::focus::FocusMonitor;
use crate::id::{IdAllocator, ViewId, WindowId};
use crate::view::ViewRecord;
use crate::window::{ContentOf, WindowBackend, WindowConfig};

/// One registered window.
pub struct WindowRecord<W> {
    id: WindowId,
    pub(crate) window: W,
    pub(crate) current_view: Option<ViewId>,
    pub(crate) focus: FocusMonitor,
}

impl<W> WindowRecord<W> {
    fn new(id: WindowId, window: W) -> Self {
        Self {
            id,
            window,
            current_view: None,
            focus: FocusMonitor::new(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    /// The view whose content the window was last given.
    pub fn current_view(&self) -> Option<ViewId> {
        self.current_view
    }

    pub fn focus(&self) -> &FocusMonitor {
        &self.focus
    }

    pub(crate) fn into_window(self) -> W {
        self.window
    }
}

impl<W> fmt::Debug for WindowRecord<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRecord")
            .field("id", &self.id)
            .field("current_view", &self.current_view)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

/// Result of [`Registry::register_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRegistration {
    /// The window was stored under the requested id.
    Inserted,
    /// The id was reserved by the default window, which moved to `new_default`
    /// first.
    MigratedDefault {
        /// The default window's new id.
        new_default: WindowId,
    },
}

/// Views, windows and the default-window policy.
pub struct Registry<B: WindowBackend> {
    views: HashMap<ViewId, ViewRecord<ContentOf<B>>>,
    windows: HashMap<WindowId, WindowRecord<B::Window>>,
    default_window: Option<WindowId>,
    allocator: IdAllocator,
    backend: B,
    default_config: WindowConfig,
    reject_duplicate_views: bool,
}

impl<B: WindowBackend> Registry<B> {
    /// Create an empty registry.
    pub fn new(backend: B, allocator: IdAllocator, default_config: WindowConfig) -> Self {
        Self {
            views: HashMap::new(),
            windows: HashMap::new(),
            default_window: None,
            allocator,
            backend,
            default_config,
            reject_duplicate_views: false,
        }
    }

    /// Refuse to overwrite registered views.
    pub fn set_reject_duplicate_views(&mut self, reject: bool) {
        self.reject_duplicate_views = reject;
    }

    /// Insert or overwrite a view, returning the record it replaced.
    ///
    /// Creates the default window if no window exists yet.
    ///
    /// # Errors
    ///
    /// [`SwitcherError::DuplicateView`] if the id is registered and duplicates
    /// are rejected. [`SwitcherError::AllocatorExhausted`] if the default
    /// window could not be given an id.
    pub fn register_view(
        &mut self,
        record: ViewRecord<ContentOf<B>>,
    ) -> SwitcherResult<Option<ViewRecord<ContentOf<B>>>> {
        let id = record.id();
        if self.reject_duplicate_views && self.views.contains_key(&id) {
            return Err(SwitcherError::DuplicateView(id));
        }

        if self.windows.is_empty() {
            self.ensure_default_window()?;
        }

        let previous = self.views.insert(id, record);
        tracing::debug!(
            target: "switcher::registry",
            view = %id,
            replaced = previous.is_some(),
            "view registered"
        );
        Ok(previous)
    }

    /// Store a caller-supplied window under `id`.
    ///
    /// If `id` is the default window's id, the default window is first moved
    /// to a fresh id. It is never destroyed.
    ///
    /// # Errors
    ///
    /// [`SwitcherError::DuplicateWindow`] if `id` belongs to a non-default
    /// window. [`SwitcherError::AllocatorExhausted`] if the migration could
    /// not get a new id.
    pub fn register_window(&mut self, id: WindowId, window: B::Window) -> SwitcherResult<WindowRegistration> {
        let mut outcome = WindowRegistration::Inserted;

        if self.default_window == Some(id) {
            let new_default = self.allocate_window_id()?;
            if let Some(mut record) = self.windows.remove(&id) {
                record.id = new_default;
                self.windows.insert(new_default, record);
            }
            self.default_window = Some(new_default);
            tracing::info!(
                target: "switcher::registry",
                from = %id,
                to = %new_default,
                "default window migrated to make room for caller window"
            );
            outcome = WindowRegistration::MigratedDefault { new_default };
        }

        if self.windows.contains_key(&id) {
            return Err(SwitcherError::DuplicateWindow(id));
        }

        self.windows.insert(id, WindowRecord::new(id, window));
        tracing::debug!(target: "switcher::registry", window = %id, "window registered");
        Ok(outcome)
    }

    /// Register `window` under a generated id and a fresh view showing
    /// `content` inside it.
    pub fn register_pair(
        &mut self,
        content: ContentOf<B>,
        window: B::Window,
    ) -> SwitcherResult<(ViewId, WindowId)> {
        let window_id = self.allocate_window_id()?;
        let view_id = self.allocate_view_id()?;

        self.windows.insert(window_id, WindowRecord::new(window_id, window));
        self.views
            .insert(view_id, ViewRecord::new(view_id, content).with_window(window_id));
        tracing::debug!(
            target: "switcher::registry",
            view = %view_id,
            window = %window_id,
            "view registered with its own window"
        );
        Ok((view_id, window_id))
    }

    /// Remove a view. Windows showing it forget it.
    pub fn remove_view(&mut self, id: ViewId) -> Option<ViewRecord<ContentOf<B>>> {
        let Some(record) = self.views.remove(&id) else {
            tracing::warn!(target: "switcher::registry", operation = "remove_view", view = %id, "unknown view");
            return None;
        };

        for window in self.windows.values_mut() {
            if window.current_view == Some(id) {
                window.current_view = None;
            }
        }
        tracing::debug!(target: "switcher::registry", view = %id, "view removed");
        Some(record)
    }

    /// Remove a window. Views assigned to it fall back to the default
    /// window.
    pub fn remove_window(&mut self, id: WindowId) -> Option<WindowRecord<B::Window>> {
        let Some(record) = self.windows.remove(&id) else {
            tracing::warn!(target: "switcher::registry", operation = "remove_window", window = %id, "unknown window");
            return None;
        };

        let mut reassigned = 0usize;
        for view in self.views.values_mut() {
            if view.window == Some(id) {
                view.window = None;
                reassigned += 1;
            }
        }
        if self.default_window == Some(id) {
            self.default_window = None;
        }

        tracing::debug!(target: "switcher::registry", window = %id, reassigned, "window removed");
        Some(record)
    }

    /// Host `view` in `window` from its next show on.
    ///
    /// `window` does not need to be registered yet.
    pub fn assign_view_to_window(&mut self, view: ViewId, window: WindowId) -> SwitcherResult<()> {
        let record = self.views.get_mut(&view).ok_or(SwitcherError::UnknownView(view))?;
        record.window = Some(window);
        Ok(())
    }

    /// The window `view` would be shown in, creating the default window if
    /// needed.
    pub fn resolve_window(&mut self, view: ViewId) -> SwitcherResult<WindowId> {
        let record = self.views.get(&view).ok_or(SwitcherError::UnknownView(view))?;
        match record.window {
            Some(window) if self.windows.contains_key(&window) => Ok(window),
            Some(window) => {
                tracing::warn!(
                    target: "switcher::registry",
                    view = %view,
                    window = %window,
                    "assigned window is not registered, using the default window"
                );
                self.ensure_default_window()
            }
            None => self.ensure_default_window(),
        }
    }

    /// Like [`Registry::resolve_window`], without creating anything.
    pub fn lookup_window(&self, view: ViewId) -> Option<WindowId> {
        let record = self.views.get(&view)?;
        record
            .window
            .filter(|w| self.windows.contains_key(w))
            .or(self.default_window)
    }

    /// The default window's id, creating the window on first use.
    pub fn ensure_default_window(&mut self) -> SwitcherResult<WindowId> {
        if let Some(id) = self.default_window {
            return Ok(id);
        }

        let id = self.allocate_window_id()?;
        let window = self.backend.create_window(&self.default_config);
        self.windows.insert(id, WindowRecord::new(id, window));
        self.default_window = Some(id);
        tracing::debug!(target: "switcher::registry", window = %id, "default window created");
        Ok(id)
    }

    /// The window currently holding `view`'s content.
    pub fn hosting_window(&self, view: ViewId) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.current_view == Some(view))
            .map(WindowRecord::id)
    }

    /// Borrow a view and a window mutably at the same time.
    pub fn view_and_window_mut(
        &mut self,
        view: ViewId,
        window: WindowId,
    ) -> Option<(&mut ViewRecord<ContentOf<B>>, &mut WindowRecord<B::Window>)> {
        let view = self.views.get_mut(&view)?;
        let window = self.windows.get_mut(&window)?;
        Some((view, window))
    }

    fn allocate_window_id(&mut self) -> SwitcherResult<WindowId> {
        let windows = &self.windows;
        let views = &self.views;
        self.allocator
            .next(|raw| windows.contains_key(&WindowId::new(raw)) || views.contains_key(&ViewId::new(raw)))
            .map(WindowId::new)
    }

    fn allocate_view_id(&mut self) -> SwitcherResult<ViewId> {
        let windows = &self.windows;
        let views = &self.views;
        self.allocator
            .next(|raw| windows.contains_key(&WindowId::new(raw)) || views.contains_key(&ViewId::new(raw)))
            .map(ViewId::new)
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewRecord<ContentOf<B>>> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ViewRecord<ContentOf<B>>> {
        self.views.get_mut(&id)
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord<B::Window>> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord<B::Window>> {
        self.windows.get_mut(&id)
    }

    pub fn contains_view(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn contains_window(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn default_window_id(&self) -> Option<WindowId> {
        self.default_window
    }

    /// Registered view ids in ascending order.
    pub fn view_ids(&self) -> Vec<ViewId> {
        let mut ids: Vec<_> = self.views.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Registered window ids in ascending order.
    pub fn window_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.windows.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn views_mut(&mut self) -> impl Iterator<Item = &mut ViewRecord<ContentOf<B>>> {
        self.views.values_mut()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn default_config(&self) -> &WindowConfig {
        &self.default_config
    }

    pub(crate) fn default_config_mut(&mut self) -> &mut WindowConfig {
        &mut self.default_config
    }
}

impl<B: WindowBackend> fmt::Debug for Registry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("views", &self.views.len())
            .field("windows", &self.windows.len())
            .field("default_window", &self.default_window)
            .finish_non_exhaustive()
    }
}
