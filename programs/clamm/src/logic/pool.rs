//! Liquidity operations on the pool aggregate

use clamm_math::{
    check_tick_range, get_amount_0_delta_signed, get_amount_1_delta_signed, get_fee_growth_inside,
    tick_to_sqrt_price, SafeMath,
};
use clamm_types::{ClammError, ClammResult, FeeTier, TokenClassKey};
use log::debug;
use rust_decimal::Decimal;

use super::{TickLedger, WorkUnit};
use crate::state::{DexPositionData, Pool, TickData};

/// Negation that never produces a negative zero
fn negate(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        -value
    }
}

impl Pool {
    /// Load the pool for a token pair and fee tier; NotFound if never created
    pub fn load(
        unit: &WorkUnit<'_>,
        token0: &TokenClassKey,
        token1: &TokenClassKey,
        fee: FeeTier,
    ) -> ClammResult<Pool> {
        unit.load_required(&Pool::key_for(token0, token1, fee))
    }

    /// Fee growth inside a range given its two boundary ticks
    pub fn get_fee_growth_inside(&self, lower: &TickData, upper: &TickData) -> ClammResult<(Decimal, Decimal)> {
        get_fee_growth_inside(
            lower.tick,
            upper.tick,
            self.tick,
            self.fee_growth_global_0,
            self.fee_growth_global_1,
            &TickLedger::fee_growth_outside(lower, upper),
        )
    }

    /// Apply a signed liquidity delta to `position`.
    ///
    /// Updates both boundary ticks and the bitmap, settles the position's
    /// fees, and moves active liquidity when the range holds the current
    /// tick. Returns the signed token amounts: positive is owed to the pool.
    pub fn modify_position(
        &mut self,
        unit: &mut WorkUnit<'_>,
        position: &mut DexPositionData,
        liquidity_delta: Decimal,
    ) -> ClammResult<(Decimal, Decimal)> {
        let tick_lower = position.tick_lower;
        let tick_upper = position.tick_upper;
        check_tick_range(tick_lower, tick_upper, self.tick_spacing)?;
        let pool_hash = self.pool_hash();

        let (lower, upper) = if liquidity_delta.is_zero() {
            (
                TickLedger::get_or_new(unit, &pool_hash, tick_lower)?,
                TickLedger::get_or_new(unit, &pool_hash, tick_upper)?,
            )
        } else {
            (
                TickLedger::update(unit, self, &pool_hash, tick_lower, liquidity_delta, false)?,
                TickLedger::update(unit, self, &pool_hash, tick_upper, liquidity_delta, true)?,
            )
        };

        let (inside_0, inside_1) = self.get_fee_growth_inside(&lower, &upper)?;
        position.update(liquidity_delta, inside_0, inside_1)?;

        if liquidity_delta.is_zero() {
            return Ok((Decimal::ZERO, Decimal::ZERO));
        }
        TickLedger::store(unit, &lower)?;
        TickLedger::store(unit, &upper)?;

        let sqrt_price_lower = tick_to_sqrt_price(tick_lower)?;
        let sqrt_price_upper = tick_to_sqrt_price(tick_upper)?;

        let amounts = if self.tick < tick_lower {
            (
                get_amount_0_delta_signed(sqrt_price_lower, sqrt_price_upper, liquidity_delta)?,
                Decimal::ZERO,
            )
        } else if self.tick < tick_upper {
            let next = self.liquidity.safe_add(liquidity_delta)?;
            if next < Decimal::ZERO {
                return Err(ClammError::math_underflow(
                    "pool liquidity",
                    &[&self.liquidity.to_string(), &liquidity_delta.to_string()],
                ));
            }
            self.liquidity = next;
            (
                get_amount_0_delta_signed(self.sqrt_price, sqrt_price_upper, liquidity_delta)?,
                get_amount_1_delta_signed(sqrt_price_lower, self.sqrt_price, liquidity_delta)?,
            )
        } else {
            (
                Decimal::ZERO,
                get_amount_1_delta_signed(sqrt_price_lower, sqrt_price_upper, liquidity_delta)?,
            )
        };

        debug!(
            "position {} [{tick_lower}, {tick_upper}] liquidity delta {liquidity_delta}: amounts ({}, {})",
            position.position_id, amounts.0, amounts.1
        );
        Ok(amounts)
    }

    /// Add liquidity; returns the token amounts the provider owes
    pub fn mint(
        &mut self,
        unit: &mut WorkUnit<'_>,
        position: &mut DexPositionData,
        liquidity: Decimal,
    ) -> ClammResult<(Decimal, Decimal)> {
        require!(
            liquidity > Decimal::ZERO,
            ClammError::validation(format!("liquidity to add must be positive, got {liquidity}"))
        );
        let amounts = self.modify_position(unit, position, liquidity)?;
        self.gross_pool_liquidity = self.gross_pool_liquidity.safe_add(liquidity)?;
        Ok(amounts)
    }

    /// Remove liquidity, crediting the released tokens to the position.
    ///
    /// Zero liquidity only settles fees.
    pub fn burn(
        &mut self,
        unit: &mut WorkUnit<'_>,
        position: &mut DexPositionData,
        liquidity: Decimal,
    ) -> ClammResult<(Decimal, Decimal)> {
        require!(
            liquidity >= Decimal::ZERO,
            ClammError::validation(format!("liquidity to remove cannot be negative, got {liquidity}"))
        );
        require!(
            liquidity <= position.liquidity,
            ClammError::validation(format!(
                "cannot remove {liquidity} liquidity from position {} holding {}",
                position.position_id, position.liquidity
            ))
        );

        let (amount_0, amount_1) = self.modify_position(unit, position, -liquidity)?;
        let released = (negate(amount_0), negate(amount_1));
        position.credit_owed(released.0, released.1)?;
        Ok(released)
    }

    /// Bring the position's owed balances up to date with fee growth
    pub fn settle_fees(&mut self, unit: &mut WorkUnit<'_>, position: &mut DexPositionData) -> ClammResult<()> {
        if position.liquidity > Decimal::ZERO {
            self.modify_position(unit, position, Decimal::ZERO)?;
        }
        Ok(())
    }

    /// Take up to the requested amounts out of the position's owed balances.
    /// Run [`Pool::settle_fees`] first so those balances are current.
    pub fn collect(
        &self,
        position: &mut DexPositionData,
        amount_0_requested: Decimal,
        amount_1_requested: Decimal,
    ) -> ClammResult<(Decimal, Decimal)> {
        position.collect_owed(amount_0_requested, amount_1_requested)
    }
}
