//! Opt-in safety limits for dispatch walks.
//!
//! Routing an event up a parent chain and settling an entry chain are both
//! loops whose length is decided by application configuration. A parent
//! cycle or an entry chain that keeps redirecting would never terminate.
//! [`ChainLimits`] caps both walks; what happens on a breach is chosen by
//! [`ViolationStrategy`].
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::enforcement::{ChainLimits, ViolationStrategy};
//!
//! let limits = ChainLimits {
//!     max_parent_depth: Some(16),
//!     max_entry_redirects: Some(32),
//!     on_violation: ViolationStrategy::IgnoreAndLog,
//! };
//! assert_eq!(limits.violation_strategy(), ViolationStrategy::IgnoreAndLog);
//! ```

pub mod rules;
pub mod violations;

pub use rules::ChainLimits;
pub use violations::{ViolationError, ViolationStrategy};
