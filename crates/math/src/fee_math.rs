//! # Fee Math
//!
//! Fee growth accounting: per-liquidity growth from a swap step, the
//! growth inside a tick range, and the tokens a position earns from it.

use clamm_types::ClammResult;
use rust_decimal::Decimal;

use crate::safe::{div_rounding, round_amount, Rounding, SafeMath};

/// Fee growth outside values of the two range boundaries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeeGrowthOutside {
    pub lower_0: Decimal,
    pub lower_1: Decimal,
    pub upper_0: Decimal,
    pub upper_1: Decimal,
}

/// Per-unit-of-liquidity growth from `fee_amount`, rounded down
pub fn fee_growth_delta(fee_amount: Decimal, liquidity: Decimal) -> ClammResult<Decimal> {
    div_rounding(fee_amount, liquidity, Rounding::Down)
}

/// Split a step fee into (lp_share, protocol_share)
pub fn split_protocol_fee(fee_amount: Decimal, protocol_fee: Decimal) -> ClammResult<(Decimal, Decimal)> {
    if protocol_fee.is_zero() {
        return Ok((fee_amount, Decimal::ZERO));
    }
    let protocol_share = round_amount(fee_amount.safe_mul(protocol_fee)?, Rounding::Down);
    Ok((fee_amount.safe_sub(protocol_share)?, protocol_share))
}

/// Fee growth inside `[tick_lower, tick_upper]` for both tokens
///
/// below = outside(lower) if current >= lower, else global - outside(lower)
/// above = outside(upper) if current < upper, else global - outside(upper)
/// inside = global - below - above
pub fn get_fee_growth_inside(
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0: Decimal,
    fee_growth_global_1: Decimal,
    outside: &FeeGrowthOutside,
) -> ClammResult<(Decimal, Decimal)> {
    let (below_0, below_1) = if tick_current >= tick_lower {
        (outside.lower_0, outside.lower_1)
    } else {
        (
            fee_growth_global_0.safe_sub(outside.lower_0)?,
            fee_growth_global_1.safe_sub(outside.lower_1)?,
        )
    };

    let (above_0, above_1) = if tick_current < tick_upper {
        (outside.upper_0, outside.upper_1)
    } else {
        (
            fee_growth_global_0.safe_sub(outside.upper_0)?,
            fee_growth_global_1.safe_sub(outside.upper_1)?,
        )
    };

    Ok((
        fee_growth_global_0.safe_sub(below_0)?.safe_sub(above_0)?,
        fee_growth_global_1.safe_sub(below_1)?.safe_sub(above_1)?,
    ))
}

/// Tokens earned by `liquidity` since the last snapshot; never negative
pub fn calculate_fees_owed(
    liquidity: Decimal,
    fee_growth_inside_last: Decimal,
    fee_growth_inside: Decimal,
) -> ClammResult<Decimal> {
    let growth = fee_growth_inside.safe_sub(fee_growth_inside_last)?;
    if growth <= Decimal::ZERO || liquidity.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(round_amount(liquidity.safe_mul(growth)?, Rounding::Down))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_split_protocol_fee() {
        let (lp, protocol) = split_protocol_fee(dec("3"), dec("0.1")).unwrap();
        assert_eq!(protocol, dec("0.3"));
        assert_eq!(lp, dec("2.7"));
        let (lp, protocol) = split_protocol_fee(dec("3"), Decimal::ZERO).unwrap();
        assert_eq!((lp, protocol), (dec("3"), Decimal::ZERO));
    }

    #[test]
    fn test_fee_growth_inside_when_price_in_range() {
        let outside = FeeGrowthOutside {
            lower_0: dec("1"),
            lower_1: dec("2"),
            upper_0: dec("0.5"),
            upper_1: dec("0.25"),
        };
        let (inside_0, inside_1) = get_fee_growth_inside(-60, 60, 0, dec("10"), dec("20"), &outside).unwrap();
        assert_eq!(inside_0, dec("8.5"));
        assert_eq!(inside_1, dec("17.75"));
    }

    #[test]
    fn test_fee_growth_inside_when_price_outside_range() {
        // Below the range everything outside the lower tick is above the price
        let outside = FeeGrowthOutside {
            lower_0: dec("4"),
            lower_1: Decimal::ZERO,
            upper_0: dec("1"),
            upper_1: Decimal::ZERO,
        };
        let (inside_0, _) = get_fee_growth_inside(-60, 60, -120, dec("10"), Decimal::ZERO, &outside).unwrap();
        // below = 10 - 4, above = 1
        assert_eq!(inside_0, dec("3"));
    }

    #[test]
    fn test_fees_owed_never_negative() {
        assert_eq!(calculate_fees_owed(dec("100"), dec("0.5"), dec("0.25")).unwrap(), Decimal::ZERO);
        assert_eq!(calculate_fees_owed(dec("100"), dec("0.25"), dec("0.5")).unwrap(), dec("25"));
        assert_eq!(calculate_fees_owed(Decimal::ZERO, Decimal::ZERO, dec("9")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_fee_growth_delta_rounds_down() {
        let growth = fee_growth_delta(Decimal::ONE, dec("3")).unwrap();
        assert!(growth * dec("3") <= Decimal::ONE);
    }
}
