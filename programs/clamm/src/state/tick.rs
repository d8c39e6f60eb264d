//! Per-tick liquidity and fee bookkeeping

use clamm_math::SafeMath;
use clamm_types::{ClammError, ClammResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Record, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickData {
    pub pool_hash: String,
    pub tick: i32,
    /// Total liquidity referencing this tick as a boundary
    pub liquidity_gross: Decimal,
    /// Liquidity added when the price crosses this tick upward
    pub liquidity_net: Decimal,
    pub fee_growth_outside_0: Decimal,
    pub fee_growth_outside_1: Decimal,
    pub initialised: bool,
}

impl TickData {
    pub fn new(pool_hash: impl Into<String>, tick: i32) -> Self {
        Self {
            pool_hash: pool_hash.into(),
            tick,
            liquidity_gross: Decimal::ZERO,
            liquidity_net: Decimal::ZERO,
            fee_growth_outside_0: Decimal::ZERO,
            fee_growth_outside_1: Decimal::ZERO,
            initialised: false,
        }
    }

    /// Apply a liquidity delta from a position bounded by this tick.
    ///
    /// Returns true when the tick flipped between referenced and
    /// unreferenced, in which case the caller must flip its bitmap bit.
    pub fn update(
        &mut self,
        tick_current: i32,
        liquidity_delta: Decimal,
        upper: bool,
        fee_growth_global_0: Decimal,
        fee_growth_global_1: Decimal,
        max_liquidity: Decimal,
    ) -> ClammResult<bool> {
        let gross_before = self.liquidity_gross;
        let gross_after = gross_before.safe_add(liquidity_delta)?;

        if gross_after < Decimal::ZERO {
            return Err(ClammError::math_underflow(
                "tick liquidity gross",
                &[&gross_before.to_string(), &liquidity_delta.to_string()],
            ));
        }
        if gross_after > max_liquidity {
            return Err(ClammError::TickLiquidityExceeded {
                tick: self.tick,
                gross: gross_after.to_string(),
                max: max_liquidity.to_string(),
            });
        }

        let flipped = gross_after.is_zero() != gross_before.is_zero();

        if gross_before.is_zero() {
            // Growth below the current tick is assumed to have happened below
            if self.tick <= tick_current {
                self.fee_growth_outside_0 = fee_growth_global_0;
                self.fee_growth_outside_1 = fee_growth_global_1;
            }
            self.initialised = true;
        }

        self.liquidity_gross = gross_after;
        self.liquidity_net = if upper {
            self.liquidity_net.safe_sub(liquidity_delta)?
        } else {
            self.liquidity_net.safe_add(liquidity_delta)?
        };

        Ok(flipped)
    }

    /// Flip the outside accumulators as the price moves through this tick
    pub fn cross(&mut self, fee_growth_global_0: Decimal, fee_growth_global_1: Decimal) -> ClammResult<Decimal> {
        self.fee_growth_outside_0 = fee_growth_global_0.safe_sub(self.fee_growth_outside_0)?;
        self.fee_growth_outside_1 = fee_growth_global_1.safe_sub(self.fee_growth_outside_1)?;
        Ok(self.liquidity_net)
    }

    pub fn is_referenced(&self) -> bool {
        !self.liquidity_gross.is_zero()
    }
}

impl Record for TickData {
    const ENTITY: &'static str = "Tick";

    fn state_key(&self) -> StateKey {
        StateKey::Tick {
            pool_hash: self.pool_hash.clone(),
            tick: self.tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max() -> Decimal {
        Decimal::from(1_000_000)
    }

    #[test]
    fn test_update_flips_on_first_and_last_reference() {
        let mut tick = TickData::new("pool", 60);
        let flipped = tick
            .update(0, Decimal::from(100), false, Decimal::ONE, Decimal::TWO, max())
            .unwrap();
        assert!(flipped);
        assert!(tick.initialised);
        // Tick above the current price starts with no outside growth
        assert_eq!(tick.fee_growth_outside_0, Decimal::ZERO);

        let flipped = tick
            .update(0, Decimal::from(50), true, Decimal::ONE, Decimal::TWO, max())
            .unwrap();
        assert!(!flipped);
        assert_eq!(tick.liquidity_gross, Decimal::from(150));
        assert_eq!(tick.liquidity_net, Decimal::from(50));

        tick.update(0, Decimal::from(-100), false, Decimal::ONE, Decimal::TWO, max())
            .unwrap();
        let flipped = tick
            .update(0, Decimal::from(-50), true, Decimal::ONE, Decimal::TWO, max())
            .unwrap();
        assert!(flipped);
        assert!(!tick.is_referenced());
        assert_eq!(tick.liquidity_net, Decimal::ZERO);
    }

    #[test]
    fn test_update_below_current_seeds_outside_growth() {
        let mut tick = TickData::new("pool", -60);
        tick.update(0, Decimal::ONE, false, Decimal::from(7), Decimal::from(9), max())
            .unwrap();
        assert_eq!(tick.fee_growth_outside_0, Decimal::from(7));
        assert_eq!(tick.fee_growth_outside_1, Decimal::from(9));
    }

    #[test]
    fn test_update_rejects_over_capacity() {
        let mut tick = TickData::new("pool", 0);
        let err = tick
            .update(0, Decimal::from(2_000_000), false, Decimal::ZERO, Decimal::ZERO, max())
            .unwrap_err();
        assert!(matches!(err, ClammError::TickLiquidityExceeded { .. }));
        assert!(tick.update(0, Decimal::NEGATIVE_ONE, false, Decimal::ZERO, Decimal::ZERO, max()).is_err());
    }

    #[test]
    fn test_cross_flips_outside() {
        let mut tick = TickData::new("pool", 0);
        tick.update(0, Decimal::from(10), false, Decimal::from(3), Decimal::from(4), max())
            .unwrap();
        let net = tick.cross(Decimal::from(5), Decimal::from(4)).unwrap();
        assert_eq!(net, Decimal::from(10));
        assert_eq!(tick.fee_growth_outside_0, Decimal::from(2));
        assert_eq!(tick.fee_growth_outside_1, Decimal::ZERO);
    }
}
