//! Tick records and the pool bitmap, read and staged through a work unit

use clamm_math::FeeGrowthOutside;
use clamm_types::{ClammResult, SwapDirection};
use log::debug;
use rust_decimal::Decimal;

use super::WorkUnit;
use crate::state::{Pool, Record, StateKey, TickData};

pub struct TickLedger;

impl TickLedger {
    fn key(pool_hash: &str, tick: i32) -> StateKey {
        StateKey::Tick {
            pool_hash: pool_hash.to_string(),
            tick,
        }
    }

    pub fn get(unit: &WorkUnit<'_>, pool_hash: &str, tick: i32) -> ClammResult<Option<TickData>> {
        unit.load(&Self::key(pool_hash, tick))
    }

    /// Stored tick, or a fresh unreferenced one
    pub fn get_or_new(unit: &WorkUnit<'_>, pool_hash: &str, tick: i32) -> ClammResult<TickData> {
        Ok(Self::get(unit, pool_hash, tick)?.unwrap_or_else(|| TickData::new(pool_hash, tick)))
    }

    /// Apply a position's liquidity delta to one of its boundary ticks.
    ///
    /// Flips the pool bitmap when the tick gains its first or loses its last
    /// reference. The tick itself is returned unsaved so fee growth inside the
    /// range can still be read from it; persist with [`TickLedger::store`].
    pub fn update(
        unit: &WorkUnit<'_>,
        pool: &mut Pool,
        pool_hash: &str,
        tick: i32,
        liquidity_delta: Decimal,
        upper: bool,
    ) -> ClammResult<TickData> {
        let mut data = Self::get_or_new(unit, pool_hash, tick)?;
        let flipped = data.update(
            pool.tick,
            liquidity_delta,
            upper,
            pool.fee_growth_global_0,
            pool.fee_growth_global_1,
            pool.max_liquidity_per_tick,
        )?;
        if flipped {
            pool.bitmap.flip_tick(tick, pool.tick_spacing)?;
        }
        Ok(data)
    }

    /// Save a referenced tick, clear an unreferenced one
    pub fn store(unit: &mut WorkUnit<'_>, data: &TickData) -> ClammResult<()> {
        if data.is_referenced() {
            unit.save(data)
        } else {
            unit.delete(&data.state_key());
            Ok(())
        }
    }

    /// Cross `tick` during a swap, returning its liquidity net
    pub fn cross(
        unit: &mut WorkUnit<'_>,
        pool_hash: &str,
        tick: i32,
        fee_growth_global_0: Decimal,
        fee_growth_global_1: Decimal,
    ) -> ClammResult<Decimal> {
        let mut data: TickData = unit.load_required(&Self::key(pool_hash, tick))?;
        let liquidity_net = data.cross(fee_growth_global_0, fee_growth_global_1)?;
        unit.save(&data)?;
        debug!("crossed tick {tick} with liquidity net {liquidity_net}");
        Ok(liquidity_net)
    }

    pub fn fee_growth_outside(lower: &TickData, upper: &TickData) -> FeeGrowthOutside {
        FeeGrowthOutside {
            lower_0: lower.fee_growth_outside_0,
            lower_1: lower.fee_growth_outside_1,
            upper_0: upper.fee_growth_outside_0,
            upper_1: upper.fee_growth_outside_1,
        }
    }

    pub fn next_initialized_tick(pool: &Pool, tick: i32, direction: SwapDirection) -> Option<i32> {
        pool.bitmap.next_initialized_tick(tick, pool.tick_spacing, direction)
    }
}
