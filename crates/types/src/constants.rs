/// Protocol constants used across the engine

use rust_decimal::Decimal;

// ============================================================================
// Tick and Price Constants
// ============================================================================

/// Minimum tick value, price = 1.0001^MIN_TICK
pub const MIN_TICK: i32 = -887_272;

/// Maximum tick value
pub const MAX_TICK: i32 = 887_272;

/// Base of the tick price curve
pub const TICK_BASE: f64 = 1.0001;

/// Number of ticks tracked by a single bitmap word
pub const TICKS_PER_WORD: i32 = 256;

// ============================================================================
// Amount and Fee Constants
// ============================================================================

/// Decimal places kept for token amounts and liquidity produced by the engine
pub const AMOUNT_DECIMALS: u32 = 18;

/// Fee tiers are expressed in pips, 1_000_000 = 100%
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Protocol share of swap fees applied when no fee configuration exists (0.1)
pub const DEFAULT_PROTOCOL_FEE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Positions whose liquidity and owed tokens all fall below this are deleted (1e-8)
pub const POSITION_DUST_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

// ============================================================================
// Identity Constants
// ============================================================================

/// Prefix of the service alias that holds a pool's token balances
pub const POOL_ALIAS_PREFIX: &str = "service|pool_";
