//! Values that announce their own changes.

use std::fmt;

use crate::signal::Signal;

/// A value paired with the signal announcing changes to it.
///
/// [`Observed::set`] emits only when the value actually changes, so a
/// connected back button is toggled once per transition rather than once
/// per navigation.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use switcher_core::Observed;
///
/// let mut has_history = Observed::new(false);
/// let flips = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&flips);
/// has_history.changed().connect(move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// has_history.set(true);
/// has_history.set(true);
/// has_history.set(false);
/// assert_eq!(flips.load(Ordering::SeqCst), 2);
/// ```
pub struct Observed<T: 'static> {
    value: T,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + 'static> Observed<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            changed: Signal::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value`, emitting [`Observed::changed`] if it differs from the
    /// current one. Returns whether it did.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value.clone();
        self.changed.emit(value);
        true
    }

    /// Emitted with the new value after every change.
    pub fn changed(&self) -> &Signal<T> {
        &self.changed
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observed<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("value", &self.value)
            .field("listeners", &self.changed.connection_count())
            .finish()
    }
}
