//! # Tick Math
//!
//! Conversions between ticks and square-root prices. The tick power
//! `1.0001^tick` is evaluated in double precision and the square root is
//! taken in decimal after an exact power-of-two rescale, so every tick in
//! `[MIN_TICK, MAX_TICK]` maps to a distinct, strictly increasing price.

use clamm_types::{ClammError, ClammResult, MAX_TICK, MIN_TICK, TICK_BASE};
use rust_decimal::prelude::*;

use crate::safe::SafeMath;

/// Get sqrt price from tick
pub fn tick_to_sqrt_price(tick: i32) -> ClammResult<Decimal> {
    check_tick(tick)?;

    // powf uses the platform libm, so the low bits of `price` are not
    // guaranteed identical across hosts
    let price = TICK_BASE.powf(tick as f64);

    // Bring the mantissa into [1, 4) with an even power of two so the
    // square root of the scale factor is exact
    let exponent = price.log2().floor() as i32;
    let even = exponent - exponent.rem_euclid(2);
    let scaled = price * 2f64.powi(-even);

    let mantissa = Decimal::from_f64(scaled)
        .ok_or_else(|| ClammError::math_overflow("tick price to decimal", &[&scaled.to_string()]))?;
    let root = mantissa
        .sqrt()
        .ok_or_else(|| ClammError::math_overflow("decimal sqrt", &[&mantissa.to_string()]))?;

    let half = even / 2;
    let factor = Decimal::from_i128_with_scale(1i128 << half.unsigned_abs(), 0);
    if half >= 0 {
        root.safe_mul(factor)
    } else {
        root.safe_div(factor)
    }
}

/// Get the greatest tick whose sqrt price is at or below `sqrt_price`
pub fn sqrt_price_to_tick(sqrt_price: Decimal) -> ClammResult<i32> {
    check_sqrt_price(sqrt_price)?;

    let approx = sqrt_price
        .to_f64()
        .ok_or_else(|| ClammError::math_overflow("sqrt price to f64", &[&sqrt_price.to_string()]))?;
    let estimate = (2.0 * approx.ln() / TICK_BASE.ln()).floor();
    let mut tick = (estimate as i32).clamp(MIN_TICK, MAX_TICK);

    // The float estimate can be off by one either way near tick boundaries
    while tick > MIN_TICK && tick_to_sqrt_price(tick)? > sqrt_price {
        tick -= 1;
    }
    while tick < MAX_TICK && tick_to_sqrt_price(tick + 1)? <= sqrt_price {
        tick += 1;
    }
    Ok(tick)
}

/// Sqrt price at `MIN_TICK`
pub fn min_sqrt_price() -> ClammResult<Decimal> {
    tick_to_sqrt_price(MIN_TICK)
}

/// Sqrt price at `MAX_TICK`
pub fn max_sqrt_price() -> ClammResult<Decimal> {
    tick_to_sqrt_price(MAX_TICK)
}

pub fn check_tick(tick: i32) -> ClammResult<()> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ClammError::TickOutOfBounds {
            tick,
            min_tick: MIN_TICK,
            max_tick: MAX_TICK,
        });
    }
    Ok(())
}

pub fn check_sqrt_price(sqrt_price: Decimal) -> ClammResult<()> {
    let min = min_sqrt_price()?;
    let max = max_sqrt_price()?;
    if sqrt_price < min || sqrt_price > max {
        return Err(ClammError::SqrtPriceOutOfBounds {
            sqrt_price: sqrt_price.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Validate a position range against bounds and the pool's spacing
pub fn check_tick_range(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> ClammResult<()> {
    if tick_lower >= tick_upper {
        return Err(ClammError::validation(format!(
            "tickLower ({tick_lower}) must be less than tickUpper ({tick_upper})"
        )));
    }
    check_tick(tick_lower)?;
    check_tick(tick_upper)?;
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        return Err(ClammError::validation(format!(
            "ticks ({tick_lower}, {tick_upper}) must be multiples of tick spacing {tick_spacing}"
        )));
    }
    Ok(())
}

/// Round a tick to the nearest multiple of `tick_spacing` inside the valid range
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> i32 {
    let rounded = ((tick as f64) / (tick_spacing as f64)).round() as i32 * tick_spacing;
    if rounded < MIN_TICK {
        rounded + tick_spacing
    } else if rounded > MAX_TICK {
        rounded - tick_spacing
    } else {
        rounded
    }
}

/// Largest gross liquidity a single tick may reference for this spacing
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: i32) -> ClammResult<Decimal> {
    if tick_spacing <= 0 {
        return Err(ClammError::invalid_parameter(
            "tick_spacing",
            &tick_spacing.to_string(),
            "positive spacing",
        ));
    }
    // Integer division truncates toward zero, which rounds MIN_TICK up
    let min_tick = MIN_TICK / tick_spacing * tick_spacing;
    let max_tick = MAX_TICK / tick_spacing * tick_spacing;
    let num_ticks = (max_tick - min_tick) / tick_spacing + 1;
    Ok(Decimal::MAX.safe_div(Decimal::from(num_ticks))?.floor())
}
