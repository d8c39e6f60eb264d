/// Swaps one pool token for the other. A positive `amount` fixes the input,
/// a negative one fixes the output. The price never moves past
/// `sqrtPriceLimit`; the optional amount bounds are checked against what
/// actually changes hands.

use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey, UserAlias};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{amount_in_token_units, amount_out_token_units};
use crate::context::Context;
use crate::logic::SwapArgs;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub amount: Decimal,
    pub zero_for_one: bool,
    pub sqrt_price_limit: Decimal,
    #[serde(default)]
    pub amount_in_maximum: Option<Decimal>,
    #[serde(default)]
    pub amount_out_minimum: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    /// Positive amounts were paid into the pool, negative ones paid out
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

pub fn handler(ctx: &mut Context<'_>, params: SwapParams) -> ClammResult<SwapResult> {
    let caller = ctx.caller.clone();
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    let pool_hash = pool.pool_hash();
    let pool_alias = pool.pool_alias();

    let outcome = pool.swap(
        &mut unit,
        &SwapArgs {
            zero_for_one: params.zero_for_one,
            amount_specified: params.amount,
            sqrt_price_limit: params.sqrt_price_limit,
        },
    )?;

    let (token_in, token_out, engine_in, engine_out) = if params.zero_for_one {
        (pool.token0.clone(), pool.token1.clone(), outcome.amount0, -outcome.amount1)
    } else {
        (pool.token1.clone(), pool.token0.clone(), outcome.amount1, -outcome.amount0)
    };

    let amount_in = amount_in_token_units(&unit, &token_in, engine_in.max(Decimal::ZERO))?;
    let mut amount_out = amount_out_token_units(&unit, &token_out, engine_out.max(Decimal::ZERO))?;

    let pool_balance = unit.balance_of(&pool_alias, &token_out)?;
    if amount_out > pool_balance {
        warn!("swap output {amount_out} {token_out} capped at pool balance {pool_balance}");
        amount_out = amount_out_token_units(&unit, &token_out, pool_balance)?;
    }

    if let Some(maximum) = params.amount_in_maximum {
        if amount_in > maximum {
            return Err(ClammError::slippage(format!(
                "amountInMaximum {maximum} exceeded by amount in {amount_in}"
            )));
        }
    }
    if let Some(minimum) = params.amount_out_minimum {
        if amount_out < minimum {
            return Err(ClammError::slippage(format!(
                "amountOutMinimum {minimum} not met by amount out {amount_out}"
            )));
        }
    }

    unit.transfer(&caller, &pool_alias, &token_in, amount_in)?;
    unit.transfer(&pool_alias, &caller, &token_out, amount_out)?;
    unit.save(&pool)?;
    unit.commit()?;

    let (amount0, amount1) = if params.zero_for_one {
        (amount_in, -amount_out)
    } else {
        (-amount_out, amount_in)
    };

    info!(
        "{caller} swapped on {pool_hash}: ({amount0}, {amount1}), sqrtPrice {} -> {}, {} ticks crossed",
        outcome.sqrt_price_before, outcome.sqrt_price_after, outcome.ticks_crossed
    );

    Ok(SwapResult {
        amount0,
        amount1,
        pool_hash,
        pool_alias,
        pool_fee: pool.fee,
        user_address: caller,
    })
}
