//! Configuration for the Staking Pool Subsystem
//!
//! Amounts are in base units (10^-18 of a unit). In JSON they are
//! `0x`-prefixed hex strings; in the environment they are decimal.

use crate::domain::value_objects::{milli_units, units, AccountId, AccountIdParseError, U256};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Collateral needed to forward (32 units).
pub const DEFAULT_FORWARD_UNITS: u64 = 32;

/// Tolerance above capacity, in thousandths of a unit (0.01 units).
pub const DEFAULT_MARGIN_MILLI_UNITS: u64 = 10;

/// Environment variable holding the owner account (hex).
pub const ENV_OWNER: &str = "QC_POOL_OWNER";
/// Environment variable holding the capacity in base units (decimal).
pub const ENV_CAPACITY: &str = "QC_POOL_CAPACITY";
/// Environment variable holding the margin in base units (decimal).
pub const ENV_MARGIN: &str = "QC_POOL_CAPACITY_MARGIN";
/// Environment variable holding the forward amount in base units (decimal).
pub const ENV_FORWARD_AMOUNT: &str = "QC_POOL_FORWARD_AMOUNT";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field that must be positive is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// No owner configured; the zero account can never call privileged operations.
    #[error("owner must be a non-zero account")]
    MissingOwner,

    /// Capacity plus margin does not fit in 256 bits.
    #[error("capacity plus margin overflows")]
    LimitOverflow,

    /// Owner could not be parsed.
    #[error("invalid owner: {0}")]
    InvalidOwner(#[from] AccountIdParseError),

    /// An amount could not be parsed.
    #[error("invalid amount in {var}: {value}")]
    InvalidAmount {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// JSON could not be decoded.
    #[error("invalid config json: {0}")]
    Json(String),
}

/// Staking pool configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Privileged identity.
    pub owner: AccountId,
    /// Collateral threshold at which admission closes.
    pub capacity: U256,
    /// Tolerance allowed above `capacity`.
    pub capacity_margin: U256,
    /// Fixed amount sent to the registration authority per forward.
    pub forward_amount: U256,
    /// Capacity of the broadcast event channel.
    pub event_channel_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            owner: AccountId::ZERO,
            capacity: units(DEFAULT_FORWARD_UNITS),
            capacity_margin: milli_units(DEFAULT_MARGIN_MILLI_UNITS),
            forward_amount: units(DEFAULT_FORWARD_UNITS),
            event_channel_capacity: 1024,
        }
    }
}

impl PoolConfig {
    /// Default configuration owned by `owner`.
    #[must_use]
    pub fn with_owner(owner: AccountId) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    /// Highest pool total admission allows: `capacity + capacity_margin`.
    pub fn admission_limit(&self) -> Result<U256, ConfigError> {
        self.capacity
            .checked_add(self.capacity_margin)
            .ok_or(ConfigError::LimitOverflow)
    }

    /// Reject configurations the pool cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::MissingOwner);
        }
        if self.capacity.is_zero() {
            return Err(ConfigError::Zero("capacity"));
        }
        if self.forward_amount.is_zero() {
            return Err(ConfigError::Zero("forward_amount"));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Zero("event_channel_capacity"));
        }
        self.admission_limit()?;
        Ok(())
    }

    /// Decode from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build from environment variables over the defaults.
    ///
    /// - `QC_POOL_OWNER`: owner account, hex (required)
    /// - `QC_POOL_CAPACITY`: capacity, decimal base units
    /// - `QC_POOL_CAPACITY_MARGIN`: margin, decimal base units
    /// - `QC_POOL_FORWARD_AMOUNT`: forward amount, decimal base units
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(owner) = lookup(ENV_OWNER) {
            config.owner = owner.trim().parse()?;
        }
        if let Some(value) = lookup(ENV_CAPACITY) {
            config.capacity = parse_amount(ENV_CAPACITY, &value)?;
        }
        if let Some(value) = lookup(ENV_MARGIN) {
            config.capacity_margin = parse_amount(ENV_MARGIN, &value)?;
        }
        if let Some(value) = lookup(ENV_FORWARD_AMOUNT) {
            config.forward_amount = parse_amount(ENV_FORWARD_AMOUNT, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_amount(var: &'static str, value: &str) -> Result<U256, ConfigError> {
    U256::from_dec_str(value.trim()).map_err(|_| ConfigError::InvalidAmount {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, units(32));
        assert_eq!(config.forward_amount, units(32));
        assert_eq!(config.admission_limit().unwrap(), milli_units(32_010));
        assert_eq!(config.validate(), Err(ConfigError::MissingOwner));

        let owned = PoolConfig::with_owner(AccountId::new([7u8; 20]));
        assert!(owned.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = PoolConfig {
            forward_amount: U256::zero(),
            ..PoolConfig::with_owner(AccountId::new([7u8; 20]))
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero("forward_amount")));

        let config = PoolConfig {
            capacity: U256::MAX,
            capacity_margin: U256::one(),
            ..PoolConfig::with_owner(AccountId::new([7u8; 20]))
        };
        assert_eq!(config.validate(), Err(ConfigError::LimitOverflow));
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "owner": "0x0909090909090909090909090909090909090909",
            "capacity_margin": "0x2386f26fc10000"
        }"#;
        let config = PoolConfig::from_json_str(json).unwrap();

        assert_eq!(config.owner, AccountId::new([9u8; 20]));
        assert_eq!(config.capacity_margin, milli_units(10));
        assert_eq!(config.capacity, units(32));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            PoolConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_OWNER, "0x0101010101010101010101010101010101010101"),
            (ENV_CAPACITY, "1000"),
            (ENV_MARGIN, "5"),
            (ENV_FORWARD_AMOUNT, "1000"),
        ]);
        let config = PoolConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();

        assert_eq!(config.owner, AccountId::new([1u8; 20]));
        assert_eq!(config.admission_limit().unwrap(), U256::from(1005));
        assert_eq!(config.forward_amount, U256::from(1000));
    }

    #[test]
    fn test_from_lookup_requires_owner() {
        let err = PoolConfig::from_lookup(|k| (k == ENV_CAPACITY).then(|| "1000".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingOwner);
    }

    #[test]
    fn test_from_json_zero_owner_rejected() {
        let json = r#"{ "owner": "0x0000000000000000000000000000000000000000" }"#;
        assert_eq!(
            PoolConfig::from_json_str(json),
            Err(ConfigError::MissingOwner)
        );
    }

    #[test]
    fn test_from_lookup_bad_amount() {
        let err = PoolConfig::from_lookup(|k| (k == ENV_CAPACITY).then(|| "lots".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidAmount {
                var: ENV_CAPACITY,
                value: "lots".to_string(),
            }
        );
    }

    #[test]
    fn test_from_lookup_bad_owner() {
        let err =
            PoolConfig::from_lookup(|k| (k == ENV_OWNER).then(|| "0x12".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOwner(_)));
    }
}
