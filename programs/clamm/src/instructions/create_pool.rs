/// Creates a pool for an ordered token pair and fee tier at an initial price.
/// New pools take the protocol fee from the fee configuration when one exists,
/// otherwise the engine default.

use clamm_math::check_sqrt_price;
use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::state::{check_token_order, DexFeeConfig, Pool, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub initial_sqrt_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolResult {
    pub pool_hash: String,
    pub pool_alias: UserAlias,
}

// ============================================================================
// Handler Functions
// ============================================================================

pub fn handler(ctx: &mut Context<'_>, params: CreatePoolParams) -> ClammResult<CreatePoolResult> {
    check_token_order(&params.token0, &params.token1)?;
    check_sqrt_price(params.initial_sqrt_price)?;

    let default_protocol_fee = ctx.config.default_protocol_fee;
    let mut unit = ctx.work_unit();

    // Both tokens must be known to the bank
    unit.token_decimals(&params.token0)?;
    unit.token_decimals(&params.token1)?;

    let key = Pool::key_for(&params.token0, &params.token1, params.fee);
    if unit.load::<Pool>(&key)?.is_some() {
        return Err(ClammError::conflict(format!(
            "pool for {} / {} at fee {} already exists",
            params.token0, params.token1, params.fee
        )));
    }

    let protocol_fee = unit
        .load::<DexFeeConfig>(&StateKey::FeeConfig)?
        .map(|config| config.protocol_fee)
        .unwrap_or(default_protocol_fee);

    let pool = Pool::new(
        params.token0,
        params.token1,
        params.fee,
        params.initial_sqrt_price,
        protocol_fee,
    )?;
    let result = CreatePoolResult {
        pool_hash: pool.pool_hash(),
        pool_alias: pool.pool_alias(),
    };

    unit.save(&pool)?;
    unit.commit()?;

    info!(
        "pool {} created: {} / {} fee {} sqrtPrice {} tick {}",
        result.pool_hash, pool.token0, pool.token1, pool.fee, pool.sqrt_price, pool.tick
    );
    Ok(result)
}
