/// Hands a position to another user. Only the owner index moves; the
/// position record, its liquidity and owed tokens are unchanged.

use clamm_types::{ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::info;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::PositionLedger;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDexPositionParams {
    pub to_user: UserAlias,
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub position_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDexPositionResult {
    pub position_id: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub from: UserAlias,
    pub to: UserAlias,
}

pub fn handler(ctx: &mut Context<'_>, params: TransferDexPositionParams) -> ClammResult<TransferDexPositionResult> {
    let caller = ctx.caller.clone();
    let mut unit = ctx.work_unit();
    let pool_hash = Pool::load(&unit, &params.token0, &params.token1, params.fee)?.pool_hash();

    let position = PositionLedger::transfer(&mut unit, &caller, &params.to_user, &pool_hash, &params.position_id)?;
    unit.commit()?;

    info!(
        "position {} in {pool_hash} transferred from {caller} to {}",
        position.position_id, params.to_user
    );

    Ok(TransferDexPositionResult {
        position_id: position.position_id,
        tick_lower: position.tick_lower,
        tick_upper: position.tick_upper,
        from: caller,
        to: params.to_user,
    })
}
