/// Overrides the protocol fee fraction of a single pool. Fees already accrued
/// are unaffected; the new fraction applies from the next swap.

use clamm_types::{ClammResult, FeeTier, TokenClassKey};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::authorize_collection;
use crate::state::{check_protocol_fee, DexFeeConfig, Pool, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurePoolProtocolFeeParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub protocol_fee: Decimal,
}

pub fn handler(ctx: &mut Context<'_>, params: ConfigurePoolProtocolFeeParams) -> ClammResult<Pool> {
    check_protocol_fee(params.protocol_fee)?;

    let caller = ctx.caller.clone();
    let mut unit = ctx.work_unit();

    let fee_config: Option<DexFeeConfig> = unit.load(&StateKey::FeeConfig)?;
    authorize_collection(fee_config.as_ref(), &caller)?;

    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    pool.protocol_fee = params.protocol_fee;
    unit.save(&pool)?;
    unit.commit()?;

    info!("{caller} set protocol fee of pool {} to {}", pool.pool_hash(), pool.protocol_fee);
    Ok(pool)
}
