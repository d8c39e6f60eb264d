//! Authority checks and accounting for the protocol's share of swap fees

use clamm_math::SafeMath;
use clamm_types::{ClammError, ClammResult, UserAlias};
use rust_decimal::Decimal;

use crate::config::ClammConfig;
use crate::state::{DexFeeConfig, Pool};

/// Who may create or change the fee configuration.
///
/// Once a configuration exists only its authorities may change it; before
/// that only the configured bootstrap authorities may create it.
pub fn authorize_fee_config_change(
    fee_config: Option<&DexFeeConfig>,
    caller: &UserAlias,
    config: &ClammConfig,
) -> ClammResult<()> {
    let allowed = match fee_config {
        Some(fee_config) => fee_config.is_authority(caller),
        None => config.is_bootstrap_authority(caller),
    };
    require!(
        allowed,
        ClammError::unauthorized(format!("{caller} may not change the protocol fee configuration"))
    );
    Ok(())
}

/// Protocol fee collection needs an existing configuration naming the caller
pub fn authorize_collection<'c>(
    fee_config: Option<&'c DexFeeConfig>,
    caller: &UserAlias,
) -> ClammResult<&'c DexFeeConfig> {
    let fee_config = fee_config.ok_or_else(|| ClammError::not_found("DexFeeConfig", "dex-fee-config"))?;
    require!(
        fee_config.is_authority(caller),
        ClammError::unauthorized(format!("{caller} is not a protocol fee authority"))
    );
    Ok(fee_config)
}

impl Pool {
    /// Withdraw accrued protocol fees, capped by what the pool can pay
    pub fn collect_protocol_fees(&mut self, available_0: Decimal, available_1: Decimal) -> ClammResult<(Decimal, Decimal)> {
        let amount_0 = self.protocol_fees_token_0.min(available_0.max(Decimal::ZERO));
        let amount_1 = self.protocol_fees_token_1.min(available_1.max(Decimal::ZERO));
        self.protocol_fees_token_0 = self.protocol_fees_token_0.safe_sub(amount_0)?;
        self.protocol_fees_token_1 = self.protocol_fees_token_1.safe_sub(amount_1)?;
        Ok((amount_0, amount_1))
    }
}
