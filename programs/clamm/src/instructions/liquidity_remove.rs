/// Removes liquidity from a position. Released tokens are credited to the
/// position's owed balances and leave the pool on fee collection. Removing
/// zero liquidity only settles fees.

use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_non_negative;
use crate::context::Context;
use crate::logic::PositionLedger;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Liquidity to remove
    pub amount: Decimal,
    pub amount0_min: Decimal,
    pub amount1_min: Decimal,
    #[serde(default)]
    pub position_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityResult {
    pub position_id: String,
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub pool_hash: String,
    pub pool_alias: UserAlias,
    pub pool_fee: FeeTier,
    pub user_address: UserAlias,
}

// ============================================================================
// Handler Functions
// ============================================================================

pub fn handler(ctx: &mut Context<'_>, params: RemoveLiquidityParams) -> ClammResult<RemoveLiquidityResult> {
    require_non_negative("amount", params.amount)?;
    require_non_negative("amount0Min", params.amount0_min)?;
    require_non_negative("amount1Min", params.amount1_min)?;

    let caller = ctx.caller.clone();
    let dust_threshold = ctx.config.position_dust_threshold;
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    let pool_hash = pool.pool_hash();

    let mut position = PositionLedger::fetch(
        &unit,
        &caller,
        &pool_hash,
        params.tick_lower,
        params.tick_upper,
        params.position_id.as_deref(),
    )?;

    let (amount0, amount1) = pool.burn(&mut unit, &mut position, params.amount)?;
    if amount0 < params.amount0_min || amount1 < params.amount1_min {
        return Err(ClammError::slippage(format!(
            "minimums ({}, {}) not met by amounts ({amount0}, {amount1})",
            params.amount0_min, params.amount1_min
        )));
    }

    PositionLedger::save_or_remove_dust(&mut unit, &caller, &position, dust_threshold)?;
    unit.save(&pool)?;
    unit.commit()?;

    info!(
        "{caller} removed {} liquidity from {pool_hash} position {}, credited ({amount0}, {amount1})",
        params.amount, position.position_id
    );

    Ok(RemoveLiquidityResult {
        position_id: position.position_id,
        amount0,
        amount1,
        pool_alias: pool.pool_alias(),
        pool_hash,
        pool_fee: pool.fee,
        user_address: caller,
    })
}
