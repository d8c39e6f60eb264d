/// Mathematical utilities for the concentrated liquidity engine
///
/// This crate provides checked decimal arithmetic with directed rounding,
/// tick/price conversion, liquidity and token amount math, single-step
/// swap math and fee growth accounting.

pub mod safe;
pub mod tick_math;
pub mod liquidity_math;
pub mod swap_math;
pub mod fee_math;

// Re-export commonly used functions
pub use safe::*;
pub use tick_math::*;
pub use liquidity_math::*;
pub use swap_math::*;
pub use fee_math::*;
