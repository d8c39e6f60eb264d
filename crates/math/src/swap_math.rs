//! # Swap Math
//!
//! Price movement for a given input or output amount and the single-step
//! swap computation used by the engine's step loop.
//!
//! Rounding always favours the pool:
//! - input amounts and fees round up
//! - output amounts round down
//! - the next sqrt price rounds so the trader gets slightly less movement

use clamm_types::{ClammError, ClammResult, SwapDirection};
use rust_decimal::Decimal;

use crate::liquidity_math::{get_amount_0_delta, get_amount_1_delta};
use crate::safe::{div_rounding, round_amount, Rounding, SafeMath};

/// Next sqrt price after adding or removing `amount` of token0
///
/// `L / (L / sqrtP ± amount)`, rounded up.
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_price: Decimal,
    liquidity: Decimal,
    amount: Decimal,
    add: bool,
) -> ClammResult<Decimal> {
    if amount.is_zero() {
        return Ok(sqrt_price);
    }
    // A smaller denominator yields a larger price
    let virtual_reserve = div_rounding(liquidity, sqrt_price, Rounding::Down)?;
    let denominator = if add {
        virtual_reserve.safe_add(amount)?
    } else {
        virtual_reserve.safe_sub(amount)?
    };
    if denominator <= Decimal::ZERO {
        return Err(ClammError::InsufficientLiquidity);
    }
    div_rounding(liquidity, denominator, Rounding::Up)
}

/// Next sqrt price after adding or removing `amount` of token1
///
/// `sqrtP ± amount / L`, rounded down.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_price: Decimal,
    liquidity: Decimal,
    amount: Decimal,
    add: bool,
) -> ClammResult<Decimal> {
    if add {
        let quotient = div_rounding(amount, liquidity, Rounding::Down)?;
        sqrt_price.safe_add(quotient)
    } else {
        let quotient = div_rounding(amount, liquidity, Rounding::Up)?;
        if sqrt_price <= quotient {
            return Err(ClammError::InsufficientLiquidity);
        }
        sqrt_price.safe_sub(quotient)
    }
}

fn check_price_and_liquidity(sqrt_price: Decimal, liquidity: Decimal) -> ClammResult<()> {
    if sqrt_price <= Decimal::ZERO {
        return Err(ClammError::invalid_parameter("sqrt_price", &sqrt_price.to_string(), "positive sqrt price"));
    }
    if liquidity <= Decimal::ZERO {
        return Err(ClammError::invalid_parameter("liquidity", &liquidity.to_string(), "positive liquidity"));
    }
    Ok(())
}

/// Next sqrt price after `amount_in` of the input token enters the pool
pub fn get_next_sqrt_price_from_input(
    sqrt_price: Decimal,
    liquidity: Decimal,
    amount_in: Decimal,
    direction: SwapDirection,
) -> ClammResult<Decimal> {
    check_price_and_liquidity(sqrt_price, liquidity)?;
    match direction {
        SwapDirection::ZeroForOne => {
            get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price, liquidity, amount_in, true)
        }
        SwapDirection::OneForZero => {
            get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price, liquidity, amount_in, true)
        }
    }
}

/// Next sqrt price after `amount_out` of the output token leaves the pool
pub fn get_next_sqrt_price_from_output(
    sqrt_price: Decimal,
    liquidity: Decimal,
    amount_out: Decimal,
    direction: SwapDirection,
) -> ClammResult<Decimal> {
    check_price_and_liquidity(sqrt_price, liquidity)?;
    match direction {
        SwapDirection::ZeroForOne => {
            get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price, liquidity, amount_out, false)
        }
        SwapDirection::OneForZero => {
            get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price, liquidity, amount_out, false)
        }
    }
}

/// Result of a single swap step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapStep {
    /// Sqrt price after the step
    pub sqrt_price_next: Decimal,
    /// Input consumed, excluding the fee
    pub amount_in: Decimal,
    /// Output produced
    pub amount_out: Decimal,
    /// Fee charged on the input
    pub fee_amount: Decimal,
}

/// Swap within a single liquidity region toward `sqrt_price_target`
///
/// `amount_remaining` is positive for exact input and negative for exact
/// output. `fee` is the fee fraction (e.g. 0.003). The direction follows
/// from the relative position of the target.
pub fn compute_swap_step(
    sqrt_price_current: Decimal,
    sqrt_price_target: Decimal,
    liquidity: Decimal,
    amount_remaining: Decimal,
    fee: Decimal,
) -> ClammResult<SwapStep> {
    let direction = if sqrt_price_current >= sqrt_price_target {
        SwapDirection::ZeroForOne
    } else {
        SwapDirection::OneForZero
    };
    let zero_for_one = direction.is_zero_for_one();
    let exact_input = amount_remaining >= Decimal::ZERO;
    let fee_complement = Decimal::ONE.safe_sub(fee)?;

    let mut amount_in = Decimal::ZERO;
    let mut amount_out = Decimal::ZERO;

    let sqrt_price_next = if exact_input {
        let remaining_less_fee = round_amount(amount_remaining.safe_mul(fee_complement)?, Rounding::Down);
        amount_in = if zero_for_one {
            get_amount_0_delta(sqrt_price_target, sqrt_price_current, liquidity, Rounding::Up)?
        } else {
            get_amount_1_delta(sqrt_price_current, sqrt_price_target, liquidity, Rounding::Up)?
        };
        if remaining_less_fee >= amount_in {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_input(sqrt_price_current, liquidity, remaining_less_fee, direction)?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_target, sqrt_price_current, liquidity, Rounding::Down)?
        } else {
            get_amount_0_delta(sqrt_price_current, sqrt_price_target, liquidity, Rounding::Down)?
        };
        if -amount_remaining >= amount_out {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_output(sqrt_price_current, liquidity, -amount_remaining, direction)?
        }
    };

    let reached_target = sqrt_price_next == sqrt_price_target;

    // Recompute whichever side was not already fixed by reaching the target
    if zero_for_one {
        if !(reached_target && exact_input) {
            amount_in = get_amount_0_delta(sqrt_price_next, sqrt_price_current, liquidity, Rounding::Up)?;
        }
        if !(reached_target && !exact_input) {
            amount_out = get_amount_1_delta(sqrt_price_next, sqrt_price_current, liquidity, Rounding::Down)?;
        }
    } else {
        if !(reached_target && exact_input) {
            amount_in = get_amount_1_delta(sqrt_price_current, sqrt_price_next, liquidity, Rounding::Up)?;
        }
        if !(reached_target && !exact_input) {
            amount_out = get_amount_0_delta(sqrt_price_current, sqrt_price_next, liquidity, Rounding::Down)?;
        }
    }

    // Exact output never pays out more than requested
    if !exact_input && amount_out > -amount_remaining {
        amount_out = -amount_remaining;
    }

    let fee_amount = if exact_input && !reached_target {
        // The remainder of the input becomes fee
        amount_remaining.safe_sub(amount_in)?
    } else {
        round_amount(
            div_rounding(amount_in.safe_mul(fee)?, fee_complement, Rounding::Up)?,
            Rounding::Up,
        )
    };

    Ok(SwapStep {
        sqrt_price_next,
        amount_in,
        amount_out,
        fee_amount,
    })
}
