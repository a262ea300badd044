//! Back-navigation history.

use crate::id::ViewId;

/// Sequence of previously shown views with single-use back navigation.
///
/// Each forward show pushes the view it replaces. Going back pops the top
/// entry and makes it the last shown view again; the popped entry is not
/// kept for forward navigation.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    stack: Vec<ViewId>,
    last_shown: Option<ViewId>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a forward navigation to `view`.
    ///
    /// The first view ever shown only becomes the last shown view. Showing
    /// the current view again still pushes it.
    pub fn showing_new_scene(&mut self, view: ViewId) {
        if let Some(previous) = self.last_shown.replace(view) {
            self.stack.push(previous);
        }
    }

    /// Pop the most recent entry and make it the last shown view.
    pub fn go_back(&mut self) -> Option<ViewId> {
        let view = self.stack.pop()?;
        self.last_shown = Some(view);
        Some(view)
    }

    pub fn has_history(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The most recently displayed view.
    pub fn last_shown(&self) -> Option<ViewId> {
        self.last_shown
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> &[ViewId] {
        &self.stack
    }

    /// Drop every reference to `view`.
    ///
    /// Entries that only became neighbours because `view` sat between them
    /// collapse into one. Repeats recorded by re-showing a view are kept.
    pub fn purge(&mut self, view: ViewId) {
        if self.last_shown == Some(view) {
            self.last_shown = None;
        }

        let mut kept = Vec::with_capacity(self.stack.len());
        let mut gap = false;
        for entry in std::mem::take(&mut self.stack) {
            if entry == view {
                gap = true;
                continue;
            }
            let joined = gap && kept.last() == Some(&entry);
            gap = false;
            if !joined {
                kept.push(entry);
            }
        }
        if gap && kept.last().copied().is_some_and(|top| Some(top) == self.last_shown) {
            kept.pop();
        }
        self.stack = kept;
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.last_shown = None;
    }
}
