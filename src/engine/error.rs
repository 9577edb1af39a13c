//! Engine error types.

use crate::enforcement::ViolationError;
use thiserror::Error;

/// Errors raised while configuring or driving a machine.
///
/// An event no state handles is not an error: it is dropped and counted
/// in [`DispatchStats::unhandled`](crate::engine::DispatchStats).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HsmError {
    #[error("state not registered: {state}")]
    UnknownState { state: String },

    #[error("state already registered: {state}")]
    DuplicateState { state: String },

    #[error("state '{state}' names unregistered parent '{parent}'")]
    UnknownParent { state: String, parent: String },

    #[error("parent chain of '{state}' forms a cycle")]
    ParentCycle { state: String },

    #[error(transparent)]
    Violation(#[from] ViolationError),
}

impl HsmError {
    /// Stable code for reporting, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            HsmError::UnknownState { .. } => "UNKNOWN_STATE",
            HsmError::DuplicateState { .. } => "DUPLICATE_STATE",
            HsmError::UnknownParent { .. } => "UNKNOWN_PARENT",
            HsmError::ParentCycle { .. } => "PARENT_CYCLE",
            HsmError::Violation(ViolationError::ParentDepthExceeded { .. }) => {
                "PARENT_DEPTH_EXCEEDED"
            }
            HsmError::Violation(ViolationError::EntryRedirectsExceeded { .. }) => {
                "ENTRY_REDIRECTS_EXCEEDED"
            }
        }
    }
}
