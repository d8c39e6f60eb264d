//! Singleton protocol fee configuration

use clamm_types::{ClammError, ClammResult, UserAlias};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Record, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexFeeConfig {
    /// Callers allowed to change the configuration and collect protocol fees
    pub authorities: Vec<UserAlias>,
    /// Protocol share applied to newly created pools
    pub protocol_fee: Decimal,
}

pub fn check_protocol_fee(protocol_fee: Decimal) -> ClammResult<()> {
    if protocol_fee < Decimal::ZERO || protocol_fee >= Decimal::ONE {
        return Err(ClammError::invalid_parameter(
            "protocol_fee",
            &protocol_fee.to_string(),
            "fraction in [0, 1)",
        ));
    }
    Ok(())
}

fn check_authorities(authorities: &[UserAlias]) -> ClammResult<()> {
    if authorities.is_empty() {
        return Err(ClammError::invalid_parameter("authorities", "empty", "at least one authority"));
    }
    Ok(())
}

impl DexFeeConfig {
    pub fn new(authorities: Vec<UserAlias>, protocol_fee: Decimal) -> ClammResult<Self> {
        check_authorities(&authorities)?;
        check_protocol_fee(protocol_fee)?;
        let mut config = Self {
            authorities: Vec::new(),
            protocol_fee,
        };
        config.set_authorities(authorities)?;
        Ok(config)
    }

    pub fn is_authority(&self, caller: &UserAlias) -> bool {
        self.authorities.contains(caller)
    }

    /// Replace the authority list, dropping duplicates
    pub fn set_authorities(&mut self, authorities: Vec<UserAlias>) -> ClammResult<()> {
        check_authorities(&authorities)?;
        let mut unique: Vec<UserAlias> = Vec::with_capacity(authorities.len());
        for alias in authorities {
            if !unique.contains(&alias) {
                unique.push(alias);
            }
        }
        self.authorities = unique;
        Ok(())
    }

    pub fn set_protocol_fee(&mut self, protocol_fee: Decimal) -> ClammResult<()> {
        check_protocol_fee(protocol_fee)?;
        self.protocol_fee = protocol_fee;
        Ok(())
    }
}

impl Record for DexFeeConfig {
    const ENTITY: &'static str = "DexFeeConfig";

    fn state_key(&self) -> StateKey {
        StateKey::FeeConfig
    }
}
