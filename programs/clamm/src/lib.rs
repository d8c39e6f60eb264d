//! Concentrated liquidity AMM engine
//!
//! Every external operation lives in [`instructions`] as a `handler` taking a
//! [`Context`]. Handlers load records through a [`logic::WorkUnit`], run the
//! pool, tick and position logic in memory, and commit staged writes and
//! token transfers only once the whole computation has succeeded.

#[macro_use]
pub mod macros;

pub mod config;
pub mod context;
pub mod instructions;
pub mod ledger;
pub mod logic;
pub mod state;

pub use clamm_math as math;
pub use clamm_types as types;

pub use clamm_types::{ClammError, ClammResult, ErrorKind, FeeTier, SwapDirection, TokenClassKey, UserAlias};
pub use config::ClammConfig;
pub use context::Context;
pub use ledger::{MemoryBank, MemoryStore, StateStore, TokenBank};
pub use state::*;
