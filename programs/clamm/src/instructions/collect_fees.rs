/// Collects tokens owed to a position: swap fees it has earned plus liquidity
/// it has released. Each amount is capped by the request, the owed balance and
/// the pool's live balance.

use clamm_math::{round_to_token_decimals, Rounding};
use clamm_types::{ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_non_negative;
use crate::context::Context;
use crate::logic::{PositionLedger, WorkUnit};
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectPositionFeesParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub amount0_requested: Decimal,
    pub amount1_requested: Decimal,
    pub tick_lower: i32,
    pub tick_upper: i32,
    #[serde(default)]
    pub position_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectPositionFeesResult {
    pub position_id: String,
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub pool_hash: String,
    pub pool_alias: UserAlias,
    pub user_address: UserAlias,
}

/// Largest payable amount of `token`, in the token's own precision
fn payable(
    unit: &WorkUnit<'_>,
    pool_alias: &UserAlias,
    token: &TokenClassKey,
    requested: Decimal,
    owed: Decimal,
) -> ClammResult<Decimal> {
    let balance = unit.balance_of(pool_alias, token)?;
    let wanted = requested.min(owed);
    if balance < wanted {
        warn!("collect of {wanted} {token} capped at pool balance {balance}");
    }
    Ok(round_to_token_decimals(
        wanted.min(balance).max(Decimal::ZERO),
        unit.token_decimals(token)?,
        Rounding::Down,
    ))
}

// ============================================================================
// Handler Functions
// ============================================================================

pub fn handler(ctx: &mut Context<'_>, params: CollectPositionFeesParams) -> ClammResult<CollectPositionFeesResult> {
    require_non_negative("amount0Requested", params.amount0_requested)?;
    require_non_negative("amount1Requested", params.amount1_requested)?;

    let caller = ctx.caller.clone();
    let dust_threshold = ctx.config.position_dust_threshold;
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    let pool_hash = pool.pool_hash();
    let pool_alias = pool.pool_alias();

    let mut position = PositionLedger::fetch(
        &unit,
        &caller,
        &pool_hash,
        params.tick_lower,
        params.tick_upper,
        params.position_id.as_deref(),
    )?;

    pool.settle_fees(&mut unit, &mut position)?;
    let amount0 = payable(&unit, &pool_alias, &pool.token0, params.amount0_requested, position.tokens_owed_0)?;
    let amount1 = payable(&unit, &pool_alias, &pool.token1, params.amount1_requested, position.tokens_owed_1)?;
    let (amount0, amount1) = pool.collect(&mut position, amount0, amount1)?;

    unit.transfer(&pool_alias, &caller, &pool.token0, amount0)?;
    unit.transfer(&pool_alias, &caller, &pool.token1, amount1)?;

    PositionLedger::save_or_remove_dust(&mut unit, &caller, &position, dust_threshold)?;
    unit.save(&pool)?;
    unit.commit()?;

    info!(
        "{caller} collected ({amount0}, {amount1}) from {pool_hash} position {}",
        position.position_id
    );

    Ok(CollectPositionFeesResult {
        position_id: position.position_id,
        amount0,
        amount1,
        pool_hash,
        pool_alias,
        user_address: caller,
    })
}
