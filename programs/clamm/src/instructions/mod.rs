/// Instruction module: one `handler` per external operation.
/// Pool lifecycle and liquidity instructions mutate state through a work unit
/// and commit once; quotes, estimations and queries never commit.

// Pool lifecycle
pub mod create_pool;

// Liquidity
pub mod collect_fees;
pub mod liquidity_add;
pub mod liquidity_remove;
pub mod transfer_position;

// Trading
pub mod swap;

// Protocol fee administration
pub mod configure_fee_authorities;
pub mod configure_pool_protocol_fee;
pub mod fee_collect_protocol;
pub mod set_protocol_fee;

// Read-only simulations and queries
pub mod add_liquidity_estimation;
pub mod query;
pub mod quote;
pub mod remove_liquidity_estimation;

pub use add_liquidity_estimation::{AddLiquidityEstimationParams, AddLiquidityEstimationResult};
pub use collect_fees::{CollectPositionFeesParams, CollectPositionFeesResult};
pub use configure_fee_authorities::ConfigureDexFeeAddressParams;
pub use configure_pool_protocol_fee::ConfigurePoolProtocolFeeParams;
pub use create_pool::{CreatePoolParams, CreatePoolResult};
pub use fee_collect_protocol::{CollectProtocolFeesParams, CollectProtocolFeesResult};
pub use liquidity_add::{AddLiquidityParams, AddLiquidityResult};
pub use liquidity_remove::{RemoveLiquidityParams, RemoveLiquidityResult};
pub use query::{GetPoolParams, GetPositionParams, GetUserPositionsParams, UserPosition};
pub use quote::{QuoteExactAmountParams, QuoteExactAmountResult};
pub use remove_liquidity_estimation::{RemoveLiquidityEstimationParams, RemoveLiquidityEstimationResult};
pub use set_protocol_fee::SetProtocolFeeParams;
pub use swap::{SwapParams, SwapResult};
pub use transfer_position::{TransferDexPositionParams, TransferDexPositionResult};

use clamm_math::{round_to_token_decimals, Rounding};
use clamm_types::{ClammError, ClammResult, TokenClassKey};
use rust_decimal::Decimal;

use crate::logic::WorkUnit;

/// Amount moving into the pool, rounded up to the token's precision
pub(crate) fn amount_in_token_units(unit: &WorkUnit<'_>, token: &TokenClassKey, amount: Decimal) -> ClammResult<Decimal> {
    Ok(round_to_token_decimals(amount, unit.token_decimals(token)?, Rounding::Up))
}

/// Amount leaving the pool, rounded down to the token's precision
pub(crate) fn amount_out_token_units(unit: &WorkUnit<'_>, token: &TokenClassKey, amount: Decimal) -> ClammResult<Decimal> {
    Ok(round_to_token_decimals(amount, unit.token_decimals(token)?, Rounding::Down))
}

pub(crate) fn require_non_negative(name: &str, value: Decimal) -> ClammResult<()> {
    if value < Decimal::ZERO {
        return Err(ClammError::invalid_parameter(name, &value.to_string(), "non-negative amount"));
    }
    Ok(())
}
