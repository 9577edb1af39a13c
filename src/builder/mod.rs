//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder, the machine configuration and a
//! macro for declaring state keys with minimal boilerplate.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;

pub use config::{HsmConfig, DEFAULT_HISTORY_LIMIT};
pub use error::BuildError;
pub use machine::HsmBuilder;
