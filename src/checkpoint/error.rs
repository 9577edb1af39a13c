//! Checkpoint error types.

use thiserror::Error;

/// Errors from taking, encoding or restoring a [`Checkpoint`](super::Checkpoint).
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding a checkpoint as JSON or bincode failed
    #[error("cannot encode checkpoint: {0}")]
    SerializationFailed(String),

    /// Decoding a checkpoint from JSON or bincode failed
    #[error("cannot decode checkpoint: {0}")]
    DeserializationFailed(String),

    #[error("checkpoint format v{found} is not readable, this build reads v{supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpoint was taken from a machine with another root, or its
    /// current state is not registered in the machine being restored
    #[error("checkpoint does not fit this machine: {0}")]
    ValidationFailed(String),
}
