//! Events carried through the machine.

use super::signal::Signal;
use serde::{Deserialize, Serialize};

/// Anything that carries a [`Signal`] can be raised into a machine.
///
/// Domains extend events with payloads by implementing this trait on
/// their own types.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::{Event, Signal};
///
/// const TEMPERATURE: Signal = Signal::bit(2);
///
/// struct Reading {
///     celsius: f32,
/// }
///
/// impl Event for Reading {
///     fn signal(&self) -> Signal {
///         TEMPERATURE
///     }
/// }
///
/// let reading = Reading { celsius: 21.5 };
/// assert_eq!(reading.signal(), TEMPERATURE);
/// assert!(reading.celsius > 0.0);
/// ```
pub trait Event: Send + 'static {
    fn signal(&self) -> Signal;
}

/// Event with no payload beyond its signal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignalEvent {
    signal: Signal,
}

impl SignalEvent {
    pub fn new(signal: Signal) -> Self {
        Self { signal }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn set_signal(&mut self, signal: Signal) {
        self.signal = signal;
    }
}

impl Event for SignalEvent {
    fn signal(&self) -> Signal {
        self.signal
    }
}

impl From<Signal> for SignalEvent {
    fn from(signal: Signal) -> Self {
        Self::new(signal)
    }
}

impl Event for Signal {
    fn signal(&self) -> Signal {
        *self
    }
}
