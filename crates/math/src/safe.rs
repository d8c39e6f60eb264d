/// Safe decimal arithmetic with overflow protection and directed rounding
///
/// All operations return errors instead of panicking. Amounts are quantised
/// to `AMOUNT_DECIMALS` places; quotients used for prices keep full precision
/// but can be biased one unit in the last place toward the pool.

use clamm_types::{ClammError, ClammResult, AMOUNT_DECIMALS};
use rust_decimal::{Decimal, RoundingStrategy};

// ============================================================================
// Rounding
// ============================================================================

/// Rounding direction for amounts and quotients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Toward positive infinity
    Up,
    /// Toward negative infinity
    Down,
}

impl Rounding {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::Up => RoundingStrategy::ToPositiveInfinity,
            Rounding::Down => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Quantise an engine amount to `AMOUNT_DECIMALS` places
pub fn round_amount(value: Decimal, rounding: Rounding) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMALS, rounding.strategy())
}

/// Quantise to a token's native decimals before it moves through the bank
pub fn round_to_token_decimals(value: Decimal, decimals: u32, rounding: Rounding) -> Decimal {
    value.round_dp_with_strategy(decimals, rounding.strategy())
}

// ============================================================================
// Safe Basic Arithmetic
// ============================================================================

/// Checked arithmetic for decimals
pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self) -> ClammResult<Self>;
    fn safe_sub(self, rhs: Self) -> ClammResult<Self>;
    fn safe_mul(self, rhs: Self) -> ClammResult<Self>;
    fn safe_div(self, rhs: Self) -> ClammResult<Self>;
}

impl SafeMath for Decimal {
    fn safe_add(self, rhs: Self) -> ClammResult<Self> {
        self.checked_add(rhs).ok_or_else(|| {
            ClammError::math_overflow("decimal addition", &[&self.to_string(), &rhs.to_string()])
        })
    }

    fn safe_sub(self, rhs: Self) -> ClammResult<Self> {
        self.checked_sub(rhs).ok_or_else(|| {
            ClammError::math_underflow("decimal subtraction", &[&self.to_string(), &rhs.to_string()])
        })
    }

    fn safe_mul(self, rhs: Self) -> ClammResult<Self> {
        self.checked_mul(rhs).ok_or_else(|| {
            ClammError::math_overflow("decimal multiplication", &[&self.to_string(), &rhs.to_string()])
        })
    }

    fn safe_div(self, rhs: Self) -> ClammResult<Self> {
        if rhs.is_zero() {
            return Err(ClammError::division_by_zero(&format!("decimal division: {} / {}", self, rhs)));
        }
        self.checked_div(rhs).ok_or_else(|| {
            ClammError::math_overflow("decimal division", &[&self.to_string(), &rhs.to_string()])
        })
    }
}

// ============================================================================
// Directed Division
// ============================================================================

/// Divide by a positive denominator, biasing the last digit in `rounding` direction
pub fn div_rounding(numerator: Decimal, denominator: Decimal, rounding: Rounding) -> ClammResult<Decimal> {
    let quotient = numerator.safe_div(denominator)?;
    let product = match quotient.checked_mul(denominator) {
        Some(product) => product,
        None => return Ok(quotient),
    };
    let ulp = Decimal::new(1, quotient.scale());
    match rounding {
        Rounding::Up if product < numerator => quotient.safe_add(ulp),
        Rounding::Down if product > numerator => quotient.safe_sub(ulp),
        _ => Ok(quotient),
    }
}

/// `a * b / c` with the product checked for overflow
pub fn mul_div(a: Decimal, b: Decimal, c: Decimal, rounding: Rounding) -> ClammResult<Decimal> {
    div_rounding(a.safe_mul(b)?, c, rounding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_amount_directions() {
        let value = dec("1.0000000000000000015");
        assert_eq!(round_amount(value, Rounding::Up), dec("1.000000000000000002"));
        assert_eq!(round_amount(value, Rounding::Down), dec("1.000000000000000001"));
        assert_eq!(round_to_token_decimals(dec("2.123456789"), 8, Rounding::Down), dec("2.12345678"));
        assert_eq!(round_to_token_decimals(dec("2.123456781"), 8, Rounding::Up), dec("2.12345679"));
    }

    #[test]
    fn test_safe_ops_report_errors() {
        assert!(Decimal::MAX.safe_add(Decimal::ONE).is_err());
        assert!(Decimal::MAX.safe_mul(Decimal::TWO).is_err());
        assert!(matches!(
            Decimal::ONE.safe_div(Decimal::ZERO),
            Err(ClammError::DivisionByZero { .. })
        ));
        assert_eq!(dec("1.5").safe_sub(dec("2")).unwrap(), dec("-0.5"));
    }

    #[test]
    fn test_div_rounding_brackets_exact_value() {
        let up = div_rounding(Decimal::ONE, dec("3"), Rounding::Up).unwrap();
        let down = div_rounding(Decimal::ONE, dec("3"), Rounding::Down).unwrap();
        assert!(up > down);
        assert!(up * dec("3") >= Decimal::ONE);
        assert!(down * dec("3") <= Decimal::ONE);
        // Exact quotients are untouched
        assert_eq!(div_rounding(dec("10"), dec("4"), Rounding::Up).unwrap(), dec("2.5"));
    }
}
