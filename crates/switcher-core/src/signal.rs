//! Change notification.
//!
//! A [`Signal<Args>`] fans one emitted value out to every connected slot.
//! Slots run synchronously on the emitting thread, in connection order.
//! Nothing here hops threads: a slot that must reach the UI context captures
//! a [`crate::DispatchHandle`] and posts, which is how window focus signals
//! are turned into navigator requests.
//!
//! ```
//! use switcher_core::Signal;
//!
//! let focus_changed = Signal::<bool>::new();
//! let id = focus_changed.connect(|focused| assert!(!*focused));
//!
//! focus_changed.emit(false);
//! assert!(focus_changed.disconnect(id).is_ok());
//! assert!(focus_changed.disconnect(id).is_err());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::{CoreError, Result};

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of slots invoked on every [`Signal::emit`].
///
/// `Send + Sync`. The slot list is locked only to copy or change it, so a
/// slot may connect or disconnect on the signal that is calling it.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Add a slot. Keep the returned id to remove it again.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: "switcher::signal", ?id, "slot connected");
        id
    }

    /// Remove a slot.
    ///
    /// Returns [`CoreError::InvalidConnection`] if `id` was never connected
    /// here or is already gone.
    pub fn disconnect(&self, id: ConnectionId) -> Result<()> {
        match self.slots.lock().remove(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidConnection),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every slot with `args`.
    pub fn emit(&self, args: Args) {
        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(target: "switcher::signal", slots = snapshot.len(), "emit");
        for slot in &snapshot {
            slot(&args);
        }
    }
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<bool>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_every_slot_sees_emitted_value() {
        let signal = Signal::<bool>::new();
        let lost = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let lost = Arc::clone(&lost);
            signal.connect(move |focused| {
                if !*focused {
                    lost.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        signal.emit(true);
        signal.emit(false);
        assert_eq!(lost.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnected_slot_is_skipped() {
        let signal = Signal::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = signal.connect(move |n| sink.lock().push(*n));
        signal.emit(1);
        signal.disconnect(id).unwrap();
        signal.emit(2);

        assert_eq!(*seen.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
        assert_eq!(signal.disconnect(id), Err(CoreError::InvalidConnection));
    }

    #[test]
    fn test_slot_can_disconnect_itself() {
        let signal = Arc::new(Signal::<()>::new());
        let own_id = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&signal);
        let slot_id = Arc::clone(&own_id);
        let id = signal.connect(move |_| {
            if let (Some(signal), Some(id)) = (weak.upgrade(), *slot_id.lock()) {
                let _ = signal.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
    }
}
