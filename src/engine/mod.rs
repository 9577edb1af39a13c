//! The runtime: states, handlers, the event queue and the machine that
//! drives them.
//!
//! # Key Concepts
//!
//! - **Handlers**: a signal mask bound to a callback; first match wins
//! - **States**: lifecycle hooks plus handlers, linked to a parent by key
//! - **Hsm**: owns the states, queues events and walks exit/entry chains
//!
//! Nothing here spawns threads or tasks. Producers raise events from any
//! context through a [`Raiser`]; the application calls
//! [`Hsm::dispatch_events`] from its own loop.

mod error;
mod handler;
mod hsm;
mod queue;
mod state;

pub use error::HsmError;
pub use handler::{EventHandler, HandlerFn};
pub use hsm::{DispatchStats, Hsm};
pub use queue::{EventQueue, Raiser};
pub use state::{State, Stateful};

pub(crate) use state::Node;
