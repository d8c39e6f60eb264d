//! Pool aggregate: one per (token0, token1, fee tier)

use clamm_math::{sqrt_price_to_tick, tick_spacing_to_max_liquidity_per_tick};
use clamm_types::{pool_hash, ClammError, ClammResult, FeeTier, TokenClassKey, UserAlias};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fee_config::check_protocol_fee;
use super::tick_bitmap::TickBitmap;
use super::{Record, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub token0: TokenClassKey,
    pub token1: TokenClassKey,
    pub fee: FeeTier,
    pub tick_spacing: i32,

    /// Current sqrt price and the tick it falls in
    pub sqrt_price: Decimal,
    pub tick: i32,

    /// Liquidity active at the current price
    pub liquidity: Decimal,
    /// Sum of all liquidity ever minted into the pool
    pub gross_pool_liquidity: Decimal,

    /// Cumulative LP fees per unit of liquidity
    pub fee_growth_global_0: Decimal,
    pub fee_growth_global_1: Decimal,

    /// Protocol share of each swap fee, in [0, 1)
    pub protocol_fee: Decimal,
    pub protocol_fees_token_0: Decimal,
    pub protocol_fees_token_1: Decimal,

    pub max_liquidity_per_tick: Decimal,
    pub bitmap: TickBitmap,
}

/// Snapshot of the pool's price state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot0 {
    pub sqrt_price: Decimal,
    pub tick: i32,
    pub liquidity: Decimal,
    pub gross_pool_liquidity: Decimal,
}

/// Tokens must be passed in ascending string-key order
pub fn check_token_order(token0: &TokenClassKey, token1: &TokenClassKey) -> ClammResult<()> {
    if token0 >= token1 {
        return Err(ClammError::validation(format!(
            "token0 ({token0}) must sort strictly before token1 ({token1})"
        )));
    }
    Ok(())
}

impl Pool {
    pub fn new(
        token0: TokenClassKey,
        token1: TokenClassKey,
        fee: FeeTier,
        initial_sqrt_price: Decimal,
        protocol_fee: Decimal,
    ) -> ClammResult<Self> {
        check_token_order(&token0, &token1)?;
        check_protocol_fee(protocol_fee)?;
        if initial_sqrt_price <= Decimal::ZERO {
            return Err(ClammError::invalid_parameter(
                "initial_sqrt_price",
                &initial_sqrt_price.to_string(),
                "positive sqrt price",
            ));
        }
        let tick = sqrt_price_to_tick(initial_sqrt_price)?;
        let tick_spacing = fee.tick_spacing();

        Ok(Self {
            token0,
            token1,
            fee,
            tick_spacing,
            sqrt_price: initial_sqrt_price,
            tick,
            liquidity: Decimal::ZERO,
            gross_pool_liquidity: Decimal::ZERO,
            fee_growth_global_0: Decimal::ZERO,
            fee_growth_global_1: Decimal::ZERO,
            protocol_fee,
            protocol_fees_token_0: Decimal::ZERO,
            protocol_fees_token_1: Decimal::ZERO,
            max_liquidity_per_tick: tick_spacing_to_max_liquidity_per_tick(tick_spacing)?,
            bitmap: TickBitmap::new(),
        })
    }

    pub fn pool_hash(&self) -> String {
        pool_hash(&self.token0, &self.token1, self.fee)
    }

    /// Service account holding this pool's balances
    pub fn pool_alias(&self) -> UserAlias {
        UserAlias::for_pool(&self.pool_hash())
    }

    /// Storage key for the pool of a token pair and fee tier
    pub fn key_for(token0: &TokenClassKey, token1: &TokenClassKey, fee: FeeTier) -> StateKey {
        StateKey::Pool {
            pool_hash: pool_hash(token0, token1, fee),
        }
    }

    pub fn fee_fraction(&self) -> Decimal {
        self.fee.fraction()
    }

    pub fn slot0(&self) -> Slot0 {
        Slot0 {
            sqrt_price: self.sqrt_price,
            tick: self.tick,
            liquidity: self.liquidity,
            gross_pool_liquidity: self.gross_pool_liquidity,
        }
    }
}

impl Record for Pool {
    const ENTITY: &'static str = "Pool";

    fn state_key(&self) -> StateKey {
        StateKey::Pool {
            pool_hash: self.pool_hash(),
        }
    }
}
