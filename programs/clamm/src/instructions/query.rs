//! Read-only lookups

use clamm_types::{ClammResult, FeeTier, TokenClassKey, UserAlias};
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::PositionLedger;
use crate::state::{DexFeeConfig, DexPositionData, Pool, Slot0, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPoolParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPositionParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    #[serde(default)]
    pub position_id: Option<String>,
    /// Defaults to the caller
    #[serde(default)]
    pub owner: Option<UserAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserPositionsParams {
    pub user: UserAlias,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    pub pool_hash: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub position_id: String,
}

pub fn get_pool_data(ctx: &mut Context<'_>, params: GetPoolParams) -> ClammResult<Pool> {
    let unit = ctx.work_unit();
    Pool::load(&unit, &params.token0, &params.token1, params.fee)
}

pub fn get_slot0(ctx: &mut Context<'_>, params: GetPoolParams) -> ClammResult<Slot0> {
    Ok(get_pool_data(ctx, params)?.slot0())
}

pub fn get_position(ctx: &mut Context<'_>, params: GetPositionParams) -> ClammResult<DexPositionData> {
    let owner = params.owner.clone().unwrap_or_else(|| ctx.caller.clone());
    let unit = ctx.work_unit();
    let pool_hash = Pool::load(&unit, &params.token0, &params.token1, params.fee)?.pool_hash();
    PositionLedger::fetch(
        &unit,
        &owner,
        &pool_hash,
        params.tick_lower,
        params.tick_upper,
        params.position_id.as_deref(),
    )
}

/// Every position the user holds, grouped by pool then range
pub fn get_user_positions(ctx: &mut Context<'_>, params: GetUserPositionsParams) -> ClammResult<Vec<UserPosition>> {
    let unit = ctx.work_unit();
    let positions = PositionLedger::positions_of(&unit, &params.user)?
        .into_iter()
        .flat_map(|index| {
            let pool_hash = index.pool_hash.clone();
            index
                .entries()
                .into_iter()
                .map(move |(tick_lower, tick_upper, position_id)| UserPosition {
                    pool_hash: pool_hash.clone(),
                    tick_lower,
                    tick_upper,
                    position_id,
                })
        })
        .collect();
    Ok(positions)
}

pub fn get_dex_fee_config(ctx: &mut Context<'_>) -> ClammResult<DexFeeConfig> {
    ctx.work_unit().load_required(&StateKey::FeeConfig)
}
