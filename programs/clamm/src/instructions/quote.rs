/// Simulates a swap to the edge of the price range without touching state.

use clamm_math::{max_sqrt_price, min_sqrt_price};
use clamm_types::{ClammResult, FeeTier, TokenClassKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::logic::SwapArgs;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteExactAmountParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub zero_for_one: bool,
    /// Positive for exact input, negative for exact output
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteExactAmountResult {
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub current_sqrt_price: Decimal,
    pub new_sqrt_price: Decimal,
}

pub fn quote_exact_amount(ctx: &mut Context<'_>, params: QuoteExactAmountParams) -> ClammResult<QuoteExactAmountResult> {
    let mut unit = ctx.work_unit();
    let mut pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;

    let sqrt_price_limit = if params.zero_for_one {
        min_sqrt_price()?
    } else {
        max_sqrt_price()?
    };
    let outcome = pool.swap(
        &mut unit,
        &SwapArgs {
            zero_for_one: params.zero_for_one,
            amount_specified: params.amount,
            sqrt_price_limit,
        },
    )?;

    // The work unit is dropped uncommitted
    Ok(QuoteExactAmountResult {
        amount0: outcome.amount0,
        amount1: outcome.amount1,
        current_sqrt_price: outcome.sqrt_price_before,
        new_sqrt_price: outcome.sqrt_price_after,
    })
}
