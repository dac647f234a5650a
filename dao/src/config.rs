//! Facade configuration with TOML file support.
//!
//! TOML integers are signed 64-bit, so amounts are written as `u64` here and
//! widened to `u128` when the facade is built.

use agora_types::params::WEEK_SECS;
use agora_types::{AccountId, ProtocolParams};
use agora_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Initial parameter values, as written in a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsConfig {
    pub token_price: u64,
    pub tokens_per_voting_power: u64,
    pub min_stake_for_voting: u64,
    pub min_stake_for_proposing: u64,
    pub staking_lock_time_secs: u64,
    pub proposal_duration_secs: u64,
}

impl ParamsConfig {
    /// Short timelines matching [`ProtocolParams::testnet_defaults`].
    pub fn testnet() -> Self {
        Self {
            token_price: 1,
            staking_lock_time_secs: 600,
            proposal_duration_secs: 3600,
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> ProtocolParams {
        ProtocolParams {
            token_price: u128::from(self.token_price),
            tokens_per_voting_power: u128::from(self.tokens_per_voting_power),
            min_stake_for_voting: u128::from(self.min_stake_for_voting),
            min_stake_for_proposing: u128::from(self.min_stake_for_proposing),
            staking_lock_time_secs: self.staking_lock_time_secs,
            proposal_duration_secs: self.proposal_duration_secs,
        }
    }
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            token_price: 1_000_000_000,
            tokens_per_voting_power: 100,
            min_stake_for_voting: 100,
            min_stake_for_proposing: 1_000,
            staking_lock_time_secs: WEEK_SECS,
            proposal_duration_secs: WEEK_SECS,
        }
    }
}

/// Configuration for a DAO instance.
///
/// Loaded from a TOML file via [`DaoConfig::from_toml_file`] or built in
/// code (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Account allowed to run owner-only operations.
    #[serde(default = "default_owner")]
    pub owner: AccountId,

    /// Identity of the facade itself. Holds stake allowances and is the only
    /// account that may reassign the panic operator.
    #[serde(default = "default_dao_address")]
    pub dao_address: AccountId,

    /// Account allowed to toggle the circuit breaker.
    #[serde(default = "default_panic_operator")]
    pub panic_operator: AccountId,

    /// Voting power required to open a proposal.
    #[serde(default)]
    pub min_voting_power_to_propose: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial parameter values. Kept last so it serializes as a trailing table.
    #[serde(default)]
    pub params: ParamsConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_owner() -> AccountId {
    AccountId::from_low_u64(1)
}

fn default_dao_address() -> AccountId {
    AccountId::from_low_u64(0xda0)
}

fn default_panic_operator() -> AccountId {
    AccountId::from_low_u64(2)
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaoConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn protocol_params(&self) -> ProtocolParams {
        self.params.to_params()
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            dao_address: default_dao_address(),
            panic_operator: default_panic_operator(),
            min_voting_power_to_propose: 0,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: ParamsConfig::default(),
        }
    }
}
