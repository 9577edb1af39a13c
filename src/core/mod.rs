//! Core value types of the state machine.
//!
//! This module contains the plain data the engine moves around:
//! - Signals and the `Event` capability
//! - State keys that address the state arena
//! - Bounded transition history
//!
//! Nothing in here runs application code; hooks and handlers live in the
//! engine module.

mod event;
mod history;
mod key;
mod signal;

pub use event::{Event, SignalEvent};
pub use history::{TransitionLog, TransitionRecord};
pub use key::StateKey;
pub use signal::Signal;
