//! hsm-engine: a hierarchical state machine runtime
//!
//! States are composed into a hierarchy; an event a state does not handle
//! is delegated to its parent, so ancestors carry shared and default
//! behavior. Events are routed by signal bitmask and processed strictly in
//! the order they were raised.
//!
//! # Core Concepts
//!
//! - **Signal**: bit-flag identifier of an event kind; handlers match on a
//!   nonzero bitwise intersection with their mask
//! - **State**: entry/exit hooks plus handlers evaluated in attachment order
//! - **Hsm**: owns the states, queues events behind a lock and walks the
//!   exit/entry chain whenever a handler names a new state
//! - **Entry redirects**: `entry` may itself name another state, and the
//!   machine keeps moving until the chain settles
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::{state_keys, Hsm, Signal, SignalEvent, State, Stateful};
//!
//! state_keys! {
//!     enum Lamp {
//!         Root,
//!         On,
//!         Off,
//!     }
//! }
//!
//! const TURN_ON: Signal = Signal::bit(0);
//! const TURN_OFF: Signal = Signal::bit(1);
//!
//! type Log = Vec<&'static str>;
//!
//! struct Root;
//! struct Light(&'static str);
//!
//! impl Stateful<Lamp, Log> for Root {
//!     fn entry(&mut self, _: &mut Log) -> Option<Lamp> {
//!         Some(Lamp::Off)
//!     }
//! }
//!
//! impl Stateful<Lamp, Log> for Light {
//!     fn entry(&mut self, log: &mut Log) -> Option<Lamp> {
//!         log.push(self.0);
//!         None
//!     }
//! }
//!
//! let mut hsm: Hsm<Lamp, SignalEvent, Log> =
//!     Hsm::new(State::new(Lamp::Root, Root), Vec::new());
//! hsm.attach_state(
//!     State::new(Lamp::Off, Light("off"))
//!         .with_parent(Lamp::Root)
//!         .on(TURN_ON, |_, _, _| Some(Lamp::On)),
//! )?;
//! hsm.attach_state(
//!     State::new(Lamp::On, Light("on"))
//!         .with_parent(Lamp::Root)
//!         .on(TURN_OFF, |_, _, _| Some(Lamp::Off)),
//! )?;
//!
//! assert_eq!(hsm.init()?, Lamp::Off);
//!
//! hsm.raise_event(SignalEvent::new(TURN_ON));
//! hsm.raise_event(SignalEvent::new(TURN_OFF));
//! assert_eq!(hsm.dispatch_events()?, Lamp::Off);
//! assert_eq!(hsm.context(), &vec!["off", "on", "off"]);
//! # Ok::<(), hsm_engine::HsmError>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod enforcement;
pub mod engine;

// Re-export commonly used types
pub use crate::builder::{BuildError, HsmBuilder, HsmConfig};
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{Event, Signal, SignalEvent, StateKey, TransitionLog, TransitionRecord};
pub use crate::engine::{DispatchStats, EventHandler, Hsm, HsmError, Raiser, State, Stateful};
