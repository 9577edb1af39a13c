//! Pending-event queue shared between producers and the dispatch loop.
//!
//! The queue is a FIFO behind a `lock_api` mutex. Any `RawMutex` with
//! blocking, unbounded acquire can guard it; `parking_lot::RawMutex` is the
//! default. The lock is held only for the push or pop itself, never while
//! a handler runs, so handlers may raise further events.

use crate::core::Event;
use parking_lot::lock_api::{Mutex, RawMutex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Lock-protected FIFO of events awaiting dispatch.
pub struct EventQueue<E, R: RawMutex = parking_lot::RawMutex> {
    pending: Mutex<R, VecDeque<E>>,
}

impl<E: Event, R: RawMutex> EventQueue<E, R> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, event: E) {
        let signal = event.signal();
        let depth = {
            let mut pending = self.pending.lock();
            pending.push_back(event);
            pending.len()
        };
        tracing::trace!(%signal, depth, "event raised");
    }

    /// Remove and return the oldest event as one locked step.
    pub fn pop(&self) -> Option<E> {
        self.pending.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Drop every pending event, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut pending = self.pending.lock();
        let dropped = pending.len();
        pending.clear();
        dropped
    }
}

impl<E: Event, R: RawMutex> Default for EventQueue<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R: RawMutex> fmt::Debug for EventQueue<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

/// Cloneable handle for raising events from other threads or tasks.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{Signal, SignalEvent};
/// use hsm_engine::engine::{EventQueue, Raiser};
/// use std::sync::Arc;
///
/// let queue: Arc<EventQueue<SignalEvent>> = Arc::new(EventQueue::new());
/// let raiser = Raiser::new(Arc::clone(&queue));
///
/// let worker = {
///     let raiser = raiser.clone();
///     std::thread::spawn(move || raiser.raise(SignalEvent::new(Signal::USER)))
/// };
/// worker.join().unwrap();
///
/// assert_eq!(raiser.pending(), 1);
/// ```
pub struct Raiser<E, R: RawMutex = parking_lot::RawMutex> {
    queue: Arc<EventQueue<E, R>>,
}

impl<E: Event, R: RawMutex> Raiser<E, R> {
    pub fn new(queue: Arc<EventQueue<E, R>>) -> Self {
        Self { queue }
    }

    pub fn raise(&self, event: E) {
        self.queue.push(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<E, R: RawMutex> Clone for Raiser<E, R> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<E, R: RawMutex> fmt::Debug for Raiser<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raiser")
            .field("queue", &self.queue)
            .finish()
    }
}
