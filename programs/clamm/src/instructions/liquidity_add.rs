/// Adds liquidity to a price range, creating the position and its boundary
/// ticks on first use. The liquidity minted is the most the desired amounts can
/// fund at the current price; the amounts actually charged must clear the
/// caller's minimums.

use clamm_math::{check_tick_range, get_liquidity_for_amounts, tick_to_sqrt_price};
use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{amount_in_token_units, require_non_negative};
use crate::context::Context;
use crate::logic::PositionLedger;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: Decimal,
    pub amount1_desired: Decimal,
    pub amount0_min: Decimal,
    pub amount1_min: Decimal,
    /// Existing position to top up
    #[serde(default)]
    pub position_id: Option<String>,
    /// Distinguishes several positions over the same range
    #[serde(default)]
    pub unique_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityResult {
    pub position_id: String,
    pub liquidity: Decimal,
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

pub fn handler(ctx: &mut Context<'_>, params: AddLiquidityParams) -> ClammResult<AddLiquidityResult> {
    require_non_negative("amount0Desired", params.amount0_desired)?;
    require_non_negative("amount1Desired", params.amount1_desired)?;
    require_non_negative("amount0Min", params.amount0_min)?;
    require_non_negative("amount1Min", params.amount1_min)?;

    let caller = ctx.caller.clone();
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    check_tick_range(params.tick_lower, params.tick_upper, pool.tick_spacing)?;

    let liquidity = get_liquidity_for_amounts(
        pool.sqrt_price,
        tick_to_sqrt_price(params.tick_lower)?,
        tick_to_sqrt_price(params.tick_upper)?,
        params.amount0_desired,
        params.amount1_desired,
    )?;
    require!(
        liquidity > Decimal::ZERO,
        ClammError::validation(format!(
            "desired amounts ({}, {}) fund no liquidity in [{}, {}]",
            params.amount0_desired, params.amount1_desired, params.tick_lower, params.tick_upper
        ))
    );

    let pool_hash = pool.pool_hash();
    let pool_alias = pool.pool_alias();
    let mut position = PositionLedger::fetch_or_create(
        &unit,
        &caller,
        &pool_hash,
        params.tick_lower,
        params.tick_upper,
        params.position_id.as_deref(),
        params.unique_key.as_deref().unwrap_or_default(),
    )?;

    let (amount0, amount1) = pool.mint(&mut unit, &mut position, liquidity)?;
    let amount0 = amount_in_token_units(&unit, &pool.token0, amount0)?;
    let amount1 = amount_in_token_units(&unit, &pool.token1, amount1)?;

    if amount0 < params.amount0_min || amount1 < params.amount1_min {
        return Err(ClammError::slippage(format!(
            "minimums ({}, {}) not met by amounts ({amount0}, {amount1})",
            params.amount0_min, params.amount1_min
        )));
    }

    unit.transfer(&caller, &pool_alias, &pool.token0, amount0)?;
    unit.transfer(&caller, &pool_alias, &pool.token1, amount1)?;

    PositionLedger::save(&mut unit, &caller, &position)?;
    unit.save(&pool)?;
    unit.commit()?;

    info!(
        "{caller} added {liquidity} liquidity to {pool_hash} [{}, {}] position {} for ({amount0}, {amount1})",
        params.tick_lower, params.tick_upper, position.position_id
    );

    Ok(AddLiquidityResult {
        position_id: position.position_id,
        liquidity,
        amount0,
        amount1,
        pool_hash,
        pool_alias,
        pool_fee: pool.fee,
        user_address: caller,
    })
}
