//! Violation errors and handling strategies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a dispatch walk breaks a configured limit
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViolationError {
    #[error("Parent chain from '{state}' exceeded {max} delegation hops")]
    ParentDepthExceeded { state: String, max: usize },

    #[error("Entry chain at '{state}' exceeded {max} redirects")]
    EntryRedirectsExceeded { state: String, max: usize },
}

/// Strategy for handling limit violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStrategy {
    /// Stop the walk and report the violation as an error
    #[default]
    Abort,

    /// Stop the walk, log a warning and carry on: the event counts as
    /// unhandled, or the entry chain settles where it stopped
    IgnoreAndLog,
}
