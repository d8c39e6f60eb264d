/// Given an amount of one token and a range, the liquidity it funds and the
/// amount of the other token that must accompany it.

use clamm_math::{
    check_tick_range, get_amounts_for_liquidity, get_liquidity_for_amount_0, get_liquidity_for_amount_1,
    tick_to_sqrt_price, Rounding,
};
use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::state::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityEstimationParams {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount: Decimal,
    /// True when `amount` is in token0
    pub zero_for_one: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityEstimationResult {
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub liquidity: Decimal,
}

pub fn get_add_liquidity_estimation(
    ctx: &mut Context<'_>,
    params: AddLiquidityEstimationParams,
) -> ClammResult<AddLiquidityEstimationResult> {
    require!(
        params.amount > Decimal::ZERO,
        ClammError::validation(format!("amount must be positive, got {}", params.amount))
    );

    let unit = ctx.work_unit();
    let pool = Pool::load(&unit, &params.token0, &params.token1, params.fee)?;
    check_tick_range(params.tick_lower, params.tick_upper, pool.tick_spacing)?;

    let sqrt_price_lower = tick_to_sqrt_price(params.tick_lower)?;
    let sqrt_price_upper = tick_to_sqrt_price(params.tick_upper)?;
    let price = pool.sqrt_price;

    let liquidity = if params.zero_for_one {
        require!(
            price < sqrt_price_upper,
            ClammError::validation("range lies below the current price and takes only token1")
        );
        get_liquidity_for_amount_0(price.max(sqrt_price_lower), sqrt_price_upper, params.amount)?
    } else {
        require!(
            price > sqrt_price_lower,
            ClammError::validation("range lies above the current price and takes only token0")
        );
        get_liquidity_for_amount_1(sqrt_price_lower, price.min(sqrt_price_upper), params.amount)?
    };

    let (amount0, amount1) =
        get_amounts_for_liquidity(price, sqrt_price_lower, sqrt_price_upper, liquidity, Rounding::Up)?;
    Ok(AddLiquidityEstimationResult {
        amount0,
        amount1,
        liquidity,
    })
}
