//! State identifiers.
//!
//! States are owned by the machine's arena and addressed by key. A key is
//! a plain value (usually a field-less enum), so parent links and
//! transition targets never hold references into the arena.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: keys index the state arena
/// - `Debug`: keys appear in diagnostics
/// - `Serialize` + `Deserialize`: keys are recorded in history and checkpoints
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::StateKey;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Root,
///     Open,
///     Closed,
/// }
///
/// impl StateKey for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Root => "Root",
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Closed.name(), "Closed");
/// ```
///
/// The [`state_keys!`](crate::state_keys) macro derives all of this for
/// field-less enums.
pub trait StateKey:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Name used for logging and error reporting.
    fn name(&self) -> &str;
}
