/// Market identifiers: fee tiers, token classes, owners and swap direction

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FEE_DENOMINATOR, POOL_ALIAS_PREFIX};
use crate::errors::ClammError;

// ============================================================================
// Fee Tiers
// ============================================================================

/// Supported swap fee tiers; each fixes the pool's tick spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.05%, tick spacing 10
    Lowest,
    /// 0.3%, tick spacing 60
    Medium,
    /// 1%, tick spacing 200
    Highest,
}

impl FeeTier {
    pub const ALL: [FeeTier; 3] = [FeeTier::Lowest, FeeTier::Medium, FeeTier::Highest];

    /// Fee in pips (units of 1e-6)
    pub fn pips(self) -> u32 {
        match self {
            FeeTier::Lowest => 500,
            FeeTier::Medium => 3_000,
            FeeTier::Highest => 10_000,
        }
    }

    pub fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Lowest => 10,
            FeeTier::Medium => 60,
            FeeTier::Highest => 200,
        }
    }

    /// Fee as a fraction of the input amount
    pub fn fraction(self) -> Decimal {
        Decimal::from(self.pips()) / Decimal::from(FEE_DENOMINATOR)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = ClammError;

    fn try_from(pips: u32) -> Result<Self, Self::Error> {
        FeeTier::ALL
            .into_iter()
            .find(|tier| tier.pips() == pips)
            .ok_or_else(|| ClammError::invalid_parameter("fee", &pips.to_string(), "one of 500, 3000, 10000"))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.pips()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pips())
    }
}

// ============================================================================
// Token Classes
// ============================================================================

/// Four-part token class identifier; ordering follows the joined string key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClassKey {
    pub collection: String,
    pub category: String,
    pub r#type: String,
    pub additional_key: String,
}

impl TokenClassKey {
    pub fn new(
        collection: impl Into<String>,
        category: impl Into<String>,
        r#type: impl Into<String>,
        additional_key: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            category: category.into(),
            r#type: r#type.into(),
            additional_key: additional_key.into(),
        }
    }

    pub fn to_string_key(&self) -> String {
        format!(
            "{}${}${}${}",
            self.collection, self.category, self.r#type, self.additional_key
        )
    }
}

impl Ord for TokenClassKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string_key().cmp(&other.to_string_key())
    }
}

impl PartialOrd for TokenClassKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TokenClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_key())
    }
}

impl FromStr for TokenClassKey {
    type Err = ClammError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('$').collect();
        match parts.as_slice() {
            [collection, category, r#type, additional_key] => {
                Ok(Self::new(*collection, *category, *r#type, *additional_key))
            }
            _ => Err(ClammError::invalid_parameter(
                "token",
                s,
                "collection$category$type$additionalKey",
            )),
        }
    }
}

// ============================================================================
// Owners
// ============================================================================

/// Identity of a token holder or caller, e.g. `client|alice`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAlias(String);

impl UserAlias {
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// Service account holding a pool's balances
    pub fn for_pool(pool_hash: &str) -> Self {
        Self(format!("{POOL_ALIAS_PREFIX}{pool_hash}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserAlias {
    fn from(alias: &str) -> Self {
        Self::new(alias)
    }
}

// ============================================================================
// Swap Direction
// ============================================================================

/// Swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Token0 in, token1 out; price moves down
    ZeroForOne,
    /// Token1 in, token0 out; price moves up
    OneForZero,
}

impl SwapDirection {
    pub fn from_zero_for_one(zero_for_one: bool) -> Self {
        if zero_for_one {
            SwapDirection::ZeroForOne
        } else {
            SwapDirection::OneForZero
        }
    }

    pub fn is_zero_for_one(self) -> bool {
        matches!(self, SwapDirection::ZeroForOne)
    }
}
