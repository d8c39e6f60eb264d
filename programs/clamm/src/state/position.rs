//! Liquidity positions

use clamm_math::{calculate_fees_owed, SafeMath};
use clamm_types::{ClammError, ClammResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Record, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPositionData {
    pub pool_hash: String,
    pub position_id: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: Decimal,
    pub fee_growth_inside_0_last: Decimal,
    pub fee_growth_inside_1_last: Decimal,
    pub tokens_owed_0: Decimal,
    pub tokens_owed_1: Decimal,
}

impl DexPositionData {
    pub fn new(pool_hash: impl Into<String>, position_id: impl Into<String>, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            pool_hash: pool_hash.into(),
            position_id: position_id.into(),
            tick_lower,
            tick_upper,
            liquidity: Decimal::ZERO,
            fee_growth_inside_0_last: Decimal::ZERO,
            fee_growth_inside_1_last: Decimal::ZERO,
            tokens_owed_0: Decimal::ZERO,
            tokens_owed_1: Decimal::ZERO,
        }
    }

    /// Accrue fees earned since the last snapshot and advance it
    pub fn update_fee_growth(&mut self, fee_growth_inside_0: Decimal, fee_growth_inside_1: Decimal) -> ClammResult<()> {
        let owed_0 = calculate_fees_owed(self.liquidity, self.fee_growth_inside_0_last, fee_growth_inside_0)?;
        let owed_1 = calculate_fees_owed(self.liquidity, self.fee_growth_inside_1_last, fee_growth_inside_1)?;

        self.tokens_owed_0 = self.tokens_owed_0.safe_add(owed_0)?;
        self.tokens_owed_1 = self.tokens_owed_1.safe_add(owed_1)?;
        self.fee_growth_inside_0_last = fee_growth_inside_0;
        self.fee_growth_inside_1_last = fee_growth_inside_1;
        Ok(())
    }

    pub fn update_liquidity(&mut self, liquidity_delta: Decimal) -> ClammResult<()> {
        let next = self.liquidity.safe_add(liquidity_delta)?;
        if next < Decimal::ZERO {
            return Err(ClammError::validation(format!(
                "cannot remove {} liquidity from position {} holding {}",
                -liquidity_delta, self.position_id, self.liquidity
            )));
        }
        self.liquidity = next;
        Ok(())
    }

    /// Settle fees then apply the liquidity change
    pub fn update(
        &mut self,
        liquidity_delta: Decimal,
        fee_growth_inside_0: Decimal,
        fee_growth_inside_1: Decimal,
    ) -> ClammResult<()> {
        self.update_fee_growth(fee_growth_inside_0, fee_growth_inside_1)?;
        self.update_liquidity(liquidity_delta)
    }

    pub fn credit_owed(&mut self, amount_0: Decimal, amount_1: Decimal) -> ClammResult<()> {
        self.tokens_owed_0 = self.tokens_owed_0.safe_add(amount_0)?;
        self.tokens_owed_1 = self.tokens_owed_1.safe_add(amount_1)?;
        Ok(())
    }

    /// Take up to the requested amounts out of the owed balances
    pub fn collect_owed(&mut self, requested_0: Decimal, requested_1: Decimal) -> ClammResult<(Decimal, Decimal)> {
        let amount_0 = requested_0.max(Decimal::ZERO).min(self.tokens_owed_0);
        let amount_1 = requested_1.max(Decimal::ZERO).min(self.tokens_owed_1);
        self.tokens_owed_0 = self.tokens_owed_0.safe_sub(amount_0)?;
        self.tokens_owed_1 = self.tokens_owed_1.safe_sub(amount_1)?;
        Ok((amount_0, amount_1))
    }

    pub fn is_dust(&self, threshold: Decimal) -> bool {
        self.liquidity < threshold && self.tokens_owed_0 < threshold && self.tokens_owed_1 < threshold
    }
}

impl Record for DexPositionData {
    const ENTITY: &'static str = "Position";

    fn state_key(&self) -> StateKey {
        StateKey::Position {
            pool_hash: self.pool_hash.clone(),
            tick_upper: self.tick_upper,
            tick_lower: self.tick_lower,
            position_id: self.position_id.clone(),
        }
    }
}
