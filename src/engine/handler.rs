//! Signal-mask bound event handlers.

use crate::core::{Event, Signal};
use std::fmt;

/// Callback run when a handler matches an event.
///
/// Receives the owning state's behavior, the machine context and the
/// event. Returns the next state, or `None` for "handled, no transition".
pub type HandlerFn<S, K, E, X> = Box<dyn FnMut(&mut S, &mut X, &E) -> Option<K> + Send>;

/// Binding of a signal mask to a callback.
///
/// A handler is bound once, at construction, and never rebound.
pub struct EventHandler<S, K, E, X> {
    mask: Signal,
    callback: HandlerFn<S, K, E, X>,
}

impl<S, K, E: Event, X> EventHandler<S, K, E, X> {
    /// Bind `callback` to every event whose signal shares a bit with `mask`.
    pub fn attach<F>(mask: Signal, callback: F) -> Self
    where
        F: FnMut(&mut S, &mut X, &E) -> Option<K> + Send + 'static,
    {
        Self {
            mask,
            callback: Box::new(callback),
        }
    }

    pub fn mask(&self) -> Signal {
        self.mask
    }

    /// True iff the event's signal intersects the mask.
    pub fn matches(&self, event: &E) -> bool {
        event.signal().intersects(self.mask)
    }

    pub fn dispatch(&mut self, owner: &mut S, xif: &mut X, event: &E) -> Option<K> {
        (self.callback)(owner, xif, event)
    }
}

impl<S, K, E, X> fmt::Debug for EventHandler<S, K, E, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SignalEvent;

    #[derive(Default)]
    struct Counter {
        hits: usize,
    }

    #[test]
    fn matches_on_bit_intersection() {
        let handler: EventHandler<Counter, u8, SignalEvent, ()> =
            EventHandler::attach(Signal::new(0b0110), |_, _, _| None);

        assert!(handler.matches(&SignalEvent::new(Signal::new(0b0010))));
        assert!(handler.matches(&SignalEvent::new(Signal::new(0b1100))));
        assert!(!handler.matches(&SignalEvent::new(Signal::new(0b1001))));
        assert!(!handler.matches(&SignalEvent::new(Signal::NONE)));
    }

    #[test]
    fn dispatch_invokes_callback_on_owner() {
        let mut handler = EventHandler::<Counter, u8, SignalEvent, Vec<u32>>::attach(
            Signal::USER,
            |owner, seen, event| {
                owner.hits += 1;
                seen.push(event.signal().bits());
                Some(7)
            },
        );

        let mut owner = Counter::default();
        let mut seen = Vec::new();
        let next = handler.dispatch(&mut owner, &mut seen, &SignalEvent::new(Signal::USER));

        assert_eq!(next, Some(7));
        assert_eq!(owner.hits, 1);
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn debug_shows_mask() {
        let handler: EventHandler<(), u8, SignalEvent, ()> =
            EventHandler::attach(Signal::bit(3), |_, _, _| None);
        let rendered = format!("{handler:?}");
        assert!(rendered.contains("mask"));
    }
}
