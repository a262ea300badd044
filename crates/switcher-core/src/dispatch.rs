//! Dispatch queue for marshalling work onto the UI context.
//!
//! Exactly one thread owns the state a [`Dispatcher<T>`] feeds (for Switcher
//! that is the navigator). Any thread may hold a [`DispatchHandle<T>`] and
//! post closures; the owner drains them with [`Dispatcher::process_all`] from
//! its event loop. Posting is fire-and-forget: no value travels back across
//! the hop.
//!
//! Jobs run in arrival order relative to other posted jobs. They are not
//! ordered against calls the owner makes directly between two drains.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::{CoreError, Result};
use crate::logging::span_names;

type Job<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// The receiving end of the dispatch queue, owned by the UI context.
pub struct Dispatcher<T> {
    sender: Sender<Job<T>>,
    receiver: Receiver<Job<T>>,
}

impl<T> Dispatcher<T> {
    /// Create a new, empty dispatch queue.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Create a handle that can post work from any thread.
    pub fn handle(&self) -> DispatchHandle<T> {
        DispatchHandle {
            sender: self.sender.clone(),
        }
    }

    /// Check if there are any pending jobs.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Get the number of pending jobs.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every job queued so far against `target`.
    ///
    /// Jobs posted while draining (including by the jobs themselves) are left
    /// for the next call, so a job that re-posts itself cannot starve the
    /// event loop.
    ///
    /// Returns the number of jobs processed.
    pub fn process_all(&self, target: &mut T) -> usize {
        let count = self.receiver.len();
        if count == 0 {
            return 0;
        }

        let _span = tracing::trace_span!(target: "switcher::dispatch", span_names::DISPATCH, count).entered();
        let mut processed = 0;
        for _ in 0..count {
            match self.receiver.try_recv() {
                Ok(job) => {
                    job(target);
                    processed += 1;
                }
                Err(_) => break,
            }
        }
        processed
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle for posting work to a [`Dispatcher`].
pub struct DispatchHandle<T> {
    sender: Sender<Job<T>>,
}

impl<T> DispatchHandle<T> {
    /// Post a job to run on the UI context.
    ///
    /// Returns [`CoreError::QueueClosed`] if the dispatcher has been dropped.
    pub fn post<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.sender.send(Box::new(job)).map_err(|_| {
            tracing::debug!(target: "switcher::dispatch", "dropping job posted to closed queue");
            CoreError::QueueClosed
        })
    }
}

impl<T> Clone for DispatchHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DispatchHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("pending", &self.sender.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(DispatchHandle<std::rc::Rc<()>>: Send, Sync, Clone);
