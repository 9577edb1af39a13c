//! Limits on the parent-delegation walk and the entry-chain walk.

use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use serde::{Deserialize, Serialize};

/// Caps applied while routing an event or settling an entry chain.
///
/// Both caps default to `None`, which leaves the walks unbounded: a cyclic
/// parent relation or an entry chain that never settles will then loop
/// forever. Setting a cap turns either defect into a detectable
/// [`ViolationError`].
///
/// # Example
///
/// ```rust
/// use hsm_engine::enforcement::{ChainLimits, ViolationStrategy};
///
/// let limits = ChainLimits {
///     max_parent_depth: Some(8),
///     max_entry_redirects: Some(16),
///     on_violation: ViolationStrategy::Abort,
/// };
///
/// assert!(limits.check_parent_depth("Leaf", 8).is_ok());
/// assert!(limits.check_parent_depth("Leaf", 9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainLimits {
    /// Maximum number of parent hops a single event may be delegated
    pub max_parent_depth: Option<usize>,
    /// Maximum number of redirects while settling one entry chain
    pub max_entry_redirects: Option<usize>,
    pub on_violation: ViolationStrategy,
}

impl ChainLimits {
    /// No caps at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `hops` is the number of parent hops taken so far, counting the one
    /// about to be made.
    pub fn check_parent_depth(&self, state: &str, hops: usize) -> Result<(), ViolationError> {
        match self.max_parent_depth {
            Some(max) if hops > max => Err(ViolationError::ParentDepthExceeded {
                state: state.to_string(),
                max,
            }),
            _ => Ok(()),
        }
    }

    /// `redirects` counts the redirect about to be followed.
    pub fn check_entry_redirects(
        &self,
        state: &str,
        redirects: usize,
    ) -> Result<(), ViolationError> {
        match self.max_entry_redirects {
            Some(max) if redirects > max => Err(ViolationError::EntryRedirectsExceeded {
                state: state.to_string(),
                max,
            }),
            _ => Ok(()),
        }
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }
}
