//! Build errors for the machine builder.

use crate::engine::HsmError;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Root state not specified. Call .root(state) before .build()")]
    MissingRoot,

    #[error("Context not specified. Call .context(xif) before .build()")]
    MissingContext,

    #[error("Invalid state hierarchy: {0}")]
    Registry(#[from] HsmError),
}
