/// Collects the protocol's accrued share of swap fees from a pool.
/// Only callable by a fee authority; amounts are capped by the pool's live
/// balance and whatever could not be paid stays accrued.

use clamm_types::{ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount_out_token_units;
use crate::context::Context;
use crate::logic::authorize_collection;
use crate::state::{DexFeeConfig, Pool, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectProtocolFeesParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub recipient: UserAlias,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectProtocolFeesResult {
    pub amount0: Decimal,
    pub amount1: Decimal,
}

// ============================================================================
// Handler Functions
// ============================================================================

pub fn handler(ctx: &mut Context<'_>, params: CollectProtocolFeesParams) -> ClammResult<CollectProtocolFeesResult> {
    let caller = ctx.caller.clone();
    let mut unit = ctx.work_unit();

    let fee_config: Option<DexFeeConfig> = unit.load(&StateKey::FeeConfig)?;
    authorize_collection(fee_config.as_ref(), &caller)?;

    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    let pool_alias = pool.pool_alias();

    let balance0 = unit.balance_of(&pool_alias, &pool.token0)?;
    let balance1 = unit.balance_of(&pool_alias, &pool.token1)?;
    if balance0 < pool.protocol_fees_token_0 || balance1 < pool.protocol_fees_token_1 {
        warn!(
            "protocol fees ({}, {}) exceed pool balances ({balance0}, {balance1})",
            pool.protocol_fees_token_0, pool.protocol_fees_token_1
        );
    }
    let available0 = amount_out_token_units(&unit, &pool.token0, pool.protocol_fees_token_0.min(balance0))?;
    let available1 = amount_out_token_units(&unit, &pool.token1, pool.protocol_fees_token_1.min(balance1))?;
    let (amount0, amount1) = pool.collect_protocol_fees(available0, available1)?;

    unit.transfer(&pool_alias, &params.recipient, &pool.token0, amount0)?;
    unit.transfer(&pool_alias, &params.recipient, &pool.token1, amount1)?;
    unit.save(&pool)?;
    unit.commit()?;

    info!(
        "{caller} collected protocol fees ({amount0}, {amount1}) from {} to {}",
        pool.pool_hash(),
        params.recipient
    );

    Ok(CollectProtocolFeesResult { amount0, amount1 })
}
