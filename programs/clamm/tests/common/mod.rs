//! Shared test infrastructure: in-memory ledgers, two registered tokens, and
//! shortcuts for the handlers most tests go through.

#![allow(dead_code)]

use std::str::FromStr;

pub use clamm::instructions::*;
pub use clamm::logic::{PositionLedger, WorkUnit};
pub use clamm::math::{max_sqrt_price, min_sqrt_price, tick_to_sqrt_price};
pub use clamm::*;
pub use rust_decimal::Decimal;

pub type TestResult<T = ()> = anyhow::Result<T>;

pub mod constants {
    pub const TOKEN0_DECIMALS: u32 = 8;
    pub const TOKEN1_DECIMALS: u32 = 8;
    pub const STARTING_BALANCE: i64 = 1_000_000_000;
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn close(a: Decimal, b: Decimal, tolerance: &str) -> bool {
    (a - b).abs() <= dec(tolerance)
}

pub fn token0() -> TokenClassKey {
    TokenClassKey::new("GALA", "Unit", "none", "none")
}

pub fn token1() -> TokenClassKey {
    TokenClassKey::new("GUSDC", "Unit", "none", "none")
}

pub fn admin() -> UserAlias {
    UserAlias::new("client|admin")
}

pub fn alice() -> UserAlias {
    UserAlias::new("client|alice")
}

pub fn bob() -> UserAlias {
    UserAlias::new("client|bob")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct TestContext {
    pub store: MemoryStore,
    pub bank: MemoryBank,
    pub config: ClammConfig,
}

impl TestContext {
    pub fn new() -> Self {
        init_logging();
        let mut bank = MemoryBank::new();
        bank.register_token(token0(), constants::TOKEN0_DECIMALS);
        bank.register_token(token1(), constants::TOKEN1_DECIMALS);
        for user in [alice(), bob()] {
            bank.mint(&user, &token0(), Decimal::from(constants::STARTING_BALANCE));
            bank.mint(&user, &token1(), Decimal::from(constants::STARTING_BALANCE));
        }

        let config = ClammConfig {
            bootstrap_authorities: vec![admin()],
            ..ClammConfig::default()
        };

        Self {
            store: MemoryStore::new(),
            bank,
            config,
        }
    }

    /// Run `f` as `caller` against this context's ledgers
    pub fn run<T>(&mut self, caller: &UserAlias, f: impl FnOnce(&mut Context<'_>) -> ClammResult<T>) -> ClammResult<T> {
        let mut ctx = Context::new(caller.clone(), &self.config, &mut self.store, &mut self.bank);
        f(&mut ctx)
    }

    pub fn create_pool(&mut self, fee: FeeTier, initial_sqrt_price: Decimal) -> ClammResult<CreatePoolResult> {
        let params = CreatePoolParams {
            token0: token0(),
            token1: token1(),
            fee,
            initial_sqrt_price,
        };
        self.run(&admin(), |ctx| instructions::create_pool::handler(ctx, params))
    }

    pub fn add_liquidity(
        &mut self,
        user: &UserAlias,
        fee: FeeTier,
        tick_lower: i32,
        tick_upper: i32,
        amount0_desired: Decimal,
        amount1_desired: Decimal,
    ) -> ClammResult<AddLiquidityResult> {
        let params = AddLiquidityParams {
            token0: token0(),
            token1: token1(),
            fee,
            tick_lower,
            tick_upper,
            amount0_desired,
            amount1_desired,
            amount0_min: Decimal::ZERO,
            amount1_min: Decimal::ZERO,
            position_id: None,
            unique_key: None,
        };
        self.run(user, |ctx| instructions::liquidity_add::handler(ctx, params))
    }

    pub fn swap(
        &mut self,
        user: &UserAlias,
        fee: FeeTier,
        amount: Decimal,
        zero_for_one: bool,
        sqrt_price_limit: Decimal,
    ) -> ClammResult<SwapResult> {
        let params = SwapParams {
            token0: token0(),
            token1: token1(),
            fee,
            amount,
            zero_for_one,
            sqrt_price_limit,
            amount_in_maximum: None,
            amount_out_minimum: None,
        };
        self.run(user, |ctx| instructions::swap::handler(ctx, params))
    }

    /// Swap with the widest limit allowed in that direction
    pub fn swap_unbounded(&mut self, user: &UserAlias, fee: FeeTier, amount: Decimal, zero_for_one: bool) -> ClammResult<SwapResult> {
        let limit = if zero_for_one {
            min_sqrt_price()?
        } else {
            max_sqrt_price()?
        };
        self.swap(user, fee, amount, zero_for_one, limit)
    }

    pub fn pool(&mut self, fee: FeeTier) -> Pool {
        let params = GetPoolParams {
            token0: token0(),
            token1: token1(),
            fee,
        };
        self.run(&admin(), |ctx| instructions::query::get_pool_data(ctx, params))
            .unwrap()
    }

    /// Overwrite the stored pool record
    pub fn put_pool(&mut self, pool: &Pool) {
        let mut unit = WorkUnit::new(&mut self.store, &mut self.bank);
        unit.save(pool).unwrap();
        unit.commit().unwrap();
    }

    /// Every stored tick of a pool
    pub fn ticks(&self, pool_hash: &str) -> Vec<TickData> {
        self.store
            .scan_prefix(&format!("tick/{pool_hash}/"))
            .unwrap()
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).unwrap())
            .collect()
    }

    pub fn balance(&self, owner: &UserAlias, token: &TokenClassKey) -> Decimal {
        self.bank.balance_of(owner, token).unwrap()
    }

    /// Move a pool's balance of `token` elsewhere until only `keep` is left
    pub fn drain_pool(&mut self, fee: FeeTier, token: &TokenClassKey, keep: Decimal) {
        let alias = self.pool(fee).pool_alias();
        let excess = self.balance(&alias, token) - keep;
        self.bank
            .transfer(&alias, &UserAlias::new("client|sink"), token, excess)
            .unwrap();
    }

    /// Mint exact liquidity into a fresh position, bypassing amount sizing
    pub fn mint_exact(
        &mut self,
        owner: &UserAlias,
        fee: FeeTier,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: Decimal,
    ) -> DexPositionData {
        let mut pool = self.pool(fee);
        let mut unit = WorkUnit::new(&mut self.store, &mut self.bank);
        let mut position =
            PositionLedger::fetch_or_create(&unit, owner, &pool.pool_hash(), tick_lower, tick_upper, None, "exact")
                .unwrap();
        pool.mint(&mut unit, &mut position, liquidity).unwrap();
        PositionLedger::save(&mut unit, owner, &position).unwrap();
        unit.save(&pool).unwrap();
        unit.commit().unwrap();
        position
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks aligned to `spacing` that cover (almost) the whole price range
pub fn full_range(fee: FeeTier) -> (i32, i32) {
    let spacing = fee.tick_spacing();
    let max = types::MAX_TICK / spacing * spacing;
    (-max, max)
}
