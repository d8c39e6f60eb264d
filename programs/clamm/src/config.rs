use std::fs;

use clamm_types::{ClammError, ClammResult, UserAlias, DEFAULT_PROTOCOL_FEE, POSITION_DUST_THRESHOLD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Engine configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClammConfig {
    /// Callers allowed to create the fee configuration when none exists yet
    pub bootstrap_authorities: Vec<UserAlias>,

    /// Protocol share of swap fees for new pools when no fee configuration exists
    pub default_protocol_fee: Decimal,

    /// Positions with liquidity and owed tokens all below this are deleted
    pub position_dust_threshold: Decimal,
}

impl ClammConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> ClammResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClammError::storage(format!("Failed to read config file {}: {}", path, e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> ClammResult<Self> {
        let config: ClammConfig = toml::from_str(content)
            .map_err(|e| ClammError::Serialization(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> ClammResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClammError::Serialization(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| ClammError::storage(format!("Failed to write config file {}: {}", path, e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ClammResult<()> {
        if self.default_protocol_fee < Decimal::ZERO || self.default_protocol_fee >= Decimal::ONE {
            return Err(ClammError::invalid_parameter(
                "default_protocol_fee",
                &self.default_protocol_fee.to_string(),
                "fraction in [0, 1)",
            ));
        }

        if self.position_dust_threshold < Decimal::ZERO {
            return Err(ClammError::invalid_parameter(
                "position_dust_threshold",
                &self.position_dust_threshold.to_string(),
                "non-negative",
            ));
        }

        Ok(())
    }

    pub fn is_bootstrap_authority(&self, caller: &UserAlias) -> bool {
        self.bootstrap_authorities.contains(caller)
    }
}

impl Default for ClammConfig {
    fn default() -> Self {
        Self {
            bootstrap_authorities: Vec::new(),
            default_protocol_fee: DEFAULT_PROTOCOL_FEE,
            position_dust_threshold: POSITION_DUST_THRESHOLD,
        }
    }
}
