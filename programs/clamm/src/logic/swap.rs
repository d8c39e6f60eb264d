//! Swap execution
//!
//! Walks initialized ticks from the current price toward the caller's limit,
//! one step per liquidity region:
//! - price the step against the active liquidity
//! - split the step fee between LPs and the protocol
//! - cross the boundary tick when the step reaches it

use clamm_math::{
    compute_swap_step, fee_growth_delta, max_sqrt_price, min_sqrt_price, split_protocol_fee, sqrt_price_to_tick,
    tick_to_sqrt_price, SafeMath,
};
use clamm_types::{ClammError, ClammResult, SwapDirection, MAX_TICK, MIN_TICK};
use log::debug;
use rust_decimal::Decimal;

use super::{TickLedger, WorkUnit};
use crate::state::Pool;

/// Parameters for swap execution
#[derive(Debug, Clone, PartialEq)]
pub struct SwapArgs {
    pub zero_for_one: bool,
    /// Positive for exact input, negative for exact output
    pub amount_specified: Decimal,
    pub sqrt_price_limit: Decimal,
}

/// Final swap execution result
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    /// Signed pool deltas: positive flows into the pool
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub sqrt_price_before: Decimal,
    pub sqrt_price_after: Decimal,
    pub tick_after: i32,
    pub ticks_crossed: u32,
    /// Protocol share accrued by this swap, in the input token
    pub protocol_fee_accrued: Decimal,
}

/// Swap state tracking during execution
#[derive(Debug)]
struct SwapState {
    amount_specified_remaining: Decimal,
    amount_calculated: Decimal,
    sqrt_price: Decimal,
    tick: i32,
    liquidity: Decimal,
    /// Accumulator for the input token
    fee_growth_global: Decimal,
    protocol_fee: Decimal,
    ticks_crossed: u32,
}

impl Pool {
    fn check_swap_limit(&self, direction: SwapDirection, limit: Decimal) -> ClammResult<()> {
        let min = min_sqrt_price()?;
        let max = max_sqrt_price()?;
        let valid = match direction {
            SwapDirection::ZeroForOne => limit < self.sqrt_price && limit >= min,
            SwapDirection::OneForZero => limit > self.sqrt_price && limit <= max,
        };
        if !valid {
            return Err(ClammError::slippage(format!(
                "sqrtPriceLimit {limit} invalid for {direction:?} from sqrtPrice {} (bounds [{min}, {max}])",
                self.sqrt_price
            )));
        }
        Ok(())
    }

    /// Execute a swap against this pool, staging crossed ticks in `unit`.
    ///
    /// The pool itself is updated in memory; the caller saves it.
    pub fn swap(&mut self, unit: &mut WorkUnit<'_>, args: &SwapArgs) -> ClammResult<SwapOutcome> {
        require!(
            !args.amount_specified.is_zero(),
            ClammError::validation("amountSpecified cannot be zero")
        );

        let sqrt_price_before = self.sqrt_price;
        if args.sqrt_price_limit == self.sqrt_price {
            return Ok(SwapOutcome {
                amount0: Decimal::ZERO,
                amount1: Decimal::ZERO,
                sqrt_price_before,
                sqrt_price_after: sqrt_price_before,
                tick_after: self.tick,
                ticks_crossed: 0,
                protocol_fee_accrued: Decimal::ZERO,
            });
        }

        let direction = SwapDirection::from_zero_for_one(args.zero_for_one);
        let zero_for_one = args.zero_for_one;
        self.check_swap_limit(direction, args.sqrt_price_limit)?;

        let exact_input = args.amount_specified > Decimal::ZERO;
        let fee = self.fee_fraction();
        let pool_hash = self.pool_hash();

        let mut state = SwapState {
            amount_specified_remaining: args.amount_specified,
            amount_calculated: Decimal::ZERO,
            sqrt_price: self.sqrt_price,
            tick: self.tick,
            liquidity: self.liquidity,
            fee_growth_global: if zero_for_one {
                self.fee_growth_global_0
            } else {
                self.fee_growth_global_1
            },
            protocol_fee: Decimal::ZERO,
            ticks_crossed: 0,
        };

        while !state.amount_specified_remaining.is_zero() && state.sqrt_price != args.sqrt_price_limit {
            let sqrt_price_start = state.sqrt_price;

            let (tick_next, initialized) = match TickLedger::next_initialized_tick(self, state.tick, direction) {
                Some(tick) => (tick.clamp(MIN_TICK, MAX_TICK), true),
                None if zero_for_one => (MIN_TICK, false),
                None => (MAX_TICK, false),
            };
            let sqrt_price_next = tick_to_sqrt_price(tick_next)?;
            let sqrt_price_target = if zero_for_one {
                sqrt_price_next.max(args.sqrt_price_limit)
            } else {
                sqrt_price_next.min(args.sqrt_price_limit)
            };

            let step = compute_swap_step(
                state.sqrt_price,
                sqrt_price_target,
                state.liquidity,
                state.amount_specified_remaining,
                fee,
            )?;
            state.sqrt_price = step.sqrt_price_next;

            let paid = step.amount_in.safe_add(step.fee_amount)?;
            if exact_input {
                state.amount_specified_remaining = state.amount_specified_remaining.safe_sub(paid)?;
                state.amount_calculated = state.amount_calculated.safe_sub(step.amount_out)?;
            } else {
                state.amount_specified_remaining = state.amount_specified_remaining.safe_add(step.amount_out)?;
                state.amount_calculated = state.amount_calculated.safe_add(paid)?;
            }

            if state.liquidity > Decimal::ZERO {
                let (lp_fee, protocol_fee) = split_protocol_fee(step.fee_amount, self.protocol_fee)?;
                state.protocol_fee = state.protocol_fee.safe_add(protocol_fee)?;
                state.fee_growth_global = state
                    .fee_growth_global
                    .safe_add(fee_growth_delta(lp_fee, state.liquidity)?)?;
            } else {
                state.protocol_fee = state.protocol_fee.safe_add(step.fee_amount)?;
            }

            debug!(
                "swap step {sqrt_price_start} -> {} in {} out {} fee {}",
                state.sqrt_price, step.amount_in, step.amount_out, step.fee_amount
            );

            if state.sqrt_price == sqrt_price_next {
                if initialized {
                    let (fee_growth_0, fee_growth_1) = if zero_for_one {
                        (state.fee_growth_global, self.fee_growth_global_1)
                    } else {
                        (self.fee_growth_global_0, state.fee_growth_global)
                    };
                    let mut liquidity_net = TickLedger::cross(unit, &pool_hash, tick_next, fee_growth_0, fee_growth_1)?;
                    if zero_for_one {
                        liquidity_net = -liquidity_net;
                    }
                    let liquidity = state.liquidity.safe_add(liquidity_net)?;
                    if liquidity < Decimal::ZERO {
                        return Err(ClammError::math_underflow(
                            "active liquidity after tick cross",
                            &[&state.liquidity.to_string(), &liquidity_net.to_string()],
                        ));
                    }
                    state.liquidity = liquidity;
                    state.ticks_crossed += 1;
                    state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
                } else {
                    // Ran off the end of the tick range
                    if !state.amount_specified_remaining.is_zero() {
                        return Err(ClammError::InsufficientLiquidity);
                    }
                    state.tick = sqrt_price_to_tick(state.sqrt_price)?;
                }
            } else if state.sqrt_price != sqrt_price_start {
                state.tick = sqrt_price_to_tick(state.sqrt_price)?;
            }

            // A step that stops short of its target has consumed the amount
            if state.sqrt_price != sqrt_price_target {
                break;
            }
        }

        self.sqrt_price = state.sqrt_price;
        self.tick = state.tick;
        self.liquidity = state.liquidity;
        if zero_for_one {
            self.fee_growth_global_0 = state.fee_growth_global;
            self.protocol_fees_token_0 = self.protocol_fees_token_0.safe_add(state.protocol_fee)?;
        } else {
            self.fee_growth_global_1 = state.fee_growth_global;
            self.protocol_fees_token_1 = self.protocol_fees_token_1.safe_add(state.protocol_fee)?;
        }

        let consumed = args.amount_specified.safe_sub(state.amount_specified_remaining)?;
        let (amount0, amount1) = if zero_for_one == exact_input {
            (consumed, state.amount_calculated)
        } else {
            (state.amount_calculated, consumed)
        };

        Ok(SwapOutcome {
            amount0,
            amount1,
            sqrt_price_before,
            sqrt_price_after: self.sqrt_price,
            tick_after: self.tick,
            ticks_crossed: state.ticks_crossed,
            protocol_fee_accrued: state.protocol_fee,
        })
    }
}
