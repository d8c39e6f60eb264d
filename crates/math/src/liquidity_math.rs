//! # Liquidity Math
//!
//! Token amounts for a liquidity delta over a sqrt-price interval, and the
//! inverse: the liquidity a pair of token amounts can fund. Amounts owed to
//! the pool round up; amounts paid out and liquidity credited round down.

use clamm_types::{ClammError, ClammResult};
use rust_decimal::Decimal;

use crate::safe::{div_rounding, round_amount, Rounding, SafeMath};

fn ordered(sqrt_price_a: Decimal, sqrt_price_b: Decimal) -> (Decimal, Decimal) {
    if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    }
}

/// Amount of token0 between two sqrt prices: `L * (b - a) / b / a`
pub fn get_amount_0_delta(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    liquidity: Decimal,
    rounding: Rounding,
) -> ClammResult<Decimal> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    if lower <= Decimal::ZERO {
        return Err(ClammError::invalid_parameter("sqrt_price", &lower.to_string(), "positive sqrt price"));
    }
    if liquidity.is_zero() || lower == upper {
        return Ok(Decimal::ZERO);
    }

    // Divide in two steps so the product of the prices never materialises
    let numerator = liquidity.safe_mul(upper.safe_sub(lower)?)?;
    let over_upper = div_rounding(numerator, upper, rounding)?;
    let amount = div_rounding(over_upper, lower, rounding)?;
    Ok(round_amount(amount, rounding))
}

/// Amount of token1 between two sqrt prices: `L * (b - a)`
pub fn get_amount_1_delta(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    liquidity: Decimal,
    rounding: Rounding,
) -> ClammResult<Decimal> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    if liquidity.is_zero() || lower == upper {
        return Ok(Decimal::ZERO);
    }
    let amount = liquidity.safe_mul(upper.safe_sub(lower)?)?;
    Ok(round_amount(amount, rounding))
}

/// Signed token0 delta for a signed liquidity delta
///
/// Positive liquidity (deposits) rounds up, negative (withdrawals) rounds the
/// magnitude down.
pub fn get_amount_0_delta_signed(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    liquidity_delta: Decimal,
) -> ClammResult<Decimal> {
    if liquidity_delta < Decimal::ZERO {
        Ok(-get_amount_0_delta(sqrt_price_a, sqrt_price_b, -liquidity_delta, Rounding::Down)?)
    } else {
        get_amount_0_delta(sqrt_price_a, sqrt_price_b, liquidity_delta, Rounding::Up)
    }
}

/// Signed token1 delta for a signed liquidity delta
pub fn get_amount_1_delta_signed(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    liquidity_delta: Decimal,
) -> ClammResult<Decimal> {
    if liquidity_delta < Decimal::ZERO {
        Ok(-get_amount_1_delta(sqrt_price_a, sqrt_price_b, -liquidity_delta, Rounding::Down)?)
    } else {
        get_amount_1_delta(sqrt_price_a, sqrt_price_b, liquidity_delta, Rounding::Up)
    }
}

/// Liquidity funded by `amount0` over `[a, b]`: `amount0 * a * b / (b - a)`
pub fn get_liquidity_for_amount_0(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    amount0: Decimal,
) -> ClammResult<Decimal> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let width = upper.safe_sub(lower)?;
    if width.is_zero() {
        return Err(ClammError::division_by_zero("liquidity for amount0 over empty interval"));
    }
    let scaled = div_rounding(amount0.safe_mul(lower)?, width, Rounding::Down)?;
    Ok(round_amount(scaled.safe_mul(upper)?, Rounding::Down))
}

/// Liquidity funded by `amount1` over `[a, b]`: `amount1 / (b - a)`
pub fn get_liquidity_for_amount_1(
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    amount1: Decimal,
) -> ClammResult<Decimal> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let width = upper.safe_sub(lower)?;
    if width.is_zero() {
        return Err(ClammError::division_by_zero("liquidity for amount1 over empty interval"));
    }
    Ok(round_amount(div_rounding(amount1, width, Rounding::Down)?, Rounding::Down))
}

/// Maximum liquidity both amounts can fund at the current price
pub fn get_liquidity_for_amounts(
    sqrt_price: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    amount0: Decimal,
    amount1: Decimal,
) -> ClammResult<Decimal> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    if sqrt_price <= lower {
        get_liquidity_for_amount_0(lower, upper, amount0)
    } else if sqrt_price < upper {
        let liquidity0 = get_liquidity_for_amount_0(sqrt_price, upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount_1(lower, sqrt_price, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount_1(lower, upper, amount1)
    }
}

/// Token amounts represented by `liquidity` over `[a, b]` at the current price
pub fn get_amounts_for_liquidity(
    sqrt_price: Decimal,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    liquidity: Decimal,
    rounding: Rounding,
) -> ClammResult<(Decimal, Decimal)> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    if sqrt_price <= lower {
        Ok((get_amount_0_delta(lower, upper, liquidity, rounding)?, Decimal::ZERO))
    } else if sqrt_price < upper {
        Ok((
            get_amount_0_delta(sqrt_price, upper, liquidity, rounding)?,
            get_amount_1_delta(lower, sqrt_price, liquidity, rounding)?,
        ))
    } else {
        Ok((Decimal::ZERO, get_amount_1_delta(lower, upper, liquidity, rounding)?))
    }
}
