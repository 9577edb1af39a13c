//! Machine configuration.

use crate::enforcement::ChainLimits;
use serde::{Deserialize, Serialize};

/// Number of transition records kept when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// Runtime settings of a machine.
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Example
///
/// ```rust
/// use hsm_engine::builder::HsmConfig;
///
/// let config = HsmConfig::from_json(r#"{
///     "limits": { "max_parent_depth": 8 },
///     "history_limit": 16
/// }"#).unwrap();
///
/// assert_eq!(config.limits.max_parent_depth, Some(8));
/// assert_eq!(config.history_limit, Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsmConfig {
    pub limits: ChainLimits,
    /// Records kept in the transition log; `None` is unbounded, `Some(0)`
    /// disables recording
    pub history_limit: Option<usize>,
}

impl Default for HsmConfig {
    fn default() -> Self {
        Self {
            limits: ChainLimits::default(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl HsmConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::ViolationStrategy;

    #[test]
    fn empty_document_yields_defaults() {
        let config = HsmConfig::from_json("{}").unwrap();
        assert_eq!(config, HsmConfig::default());
        assert_eq!(config.history_limit, Some(DEFAULT_HISTORY_LIMIT));
        assert_eq!(config.limits, ChainLimits::unbounded());
    }

    #[test]
    fn explicit_null_history_is_unbounded() {
        let config = HsmConfig::from_json(r#"{"history_limit": null}"#).unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = HsmConfig {
            limits: ChainLimits {
                max_parent_depth: Some(4),
                max_entry_redirects: Some(10),
                on_violation: ViolationStrategy::IgnoreAndLog,
            },
            history_limit: Some(0),
        };

        let json = config.to_json().unwrap();
        assert_eq!(HsmConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = HsmConfig::from_json(r#"{"limits": {"on_violation": "retry"}}"#);
        assert!(result.is_err());
    }
}
