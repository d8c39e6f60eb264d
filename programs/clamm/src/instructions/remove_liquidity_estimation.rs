/// Estimates the tokens a burn would release, without touching state.

use clamm_types::{ClammResult, FeeTier, TokenClassKey, UserAlias};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_non_negative;
use crate::context::Context;
use crate::logic::PositionLedger;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityEstimationParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Liquidity to remove
    pub amount: Decimal,
    #[serde(default)]
    pub position_id: Option<String>,
    /// Position holder when estimating for someone other than the caller
    #[serde(default)]
    pub owner: Option<UserAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityEstimationResult {
    pub amount0: Decimal,
    pub amount1: Decimal,
}

pub fn get_remove_liquidity_estimation(
    ctx: &mut Context<'_>,
    params: RemoveLiquidityEstimationParams,
) -> ClammResult<RemoveLiquidityEstimationResult> {
    require_non_negative("amount", params.amount)?;

    let owner = params.owner.clone().unwrap_or_else(|| ctx.caller.clone());
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    let mut position = PositionLedger::fetch(
        &unit,
        &owner,
        &pool.pool_hash(),
        params.tick_lower,
        params.tick_upper,
        params.position_id.as_deref(),
    )?;

    let (amount0, amount1) = pool.burn(&mut unit, &mut position, params.amount)?;
    Ok(RemoveLiquidityEstimationResult { amount0, amount1 })
}
