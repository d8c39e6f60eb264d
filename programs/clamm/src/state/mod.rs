//! Persistent records and their storage keys

pub mod fee_config;
pub mod pool;
pub mod position;
pub mod position_owner;
pub mod tick;
pub mod tick_bitmap;

pub use fee_config::*;
pub use pool::*;
pub use position::*;
pub use position_owner::*;
pub use tick::*;
pub use tick_bitmap::*;

use clamm_types::UserAlias;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Identity of a stored record
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Pool {
        pool_hash: String,
    },
    Tick {
        pool_hash: String,
        tick: i32,
    },
    Position {
        pool_hash: String,
        tick_upper: i32,
        tick_lower: i32,
        position_id: String,
    },
    PositionOwner {
        owner: UserAlias,
        pool_hash: String,
    },
    FeeConfig,
}

impl StateKey {
    pub fn storage_key(&self) -> String {
        match self {
            StateKey::Pool { pool_hash } => format!("pool/{pool_hash}"),
            StateKey::Tick { pool_hash, tick } => format!("tick/{pool_hash}/{tick}"),
            StateKey::Position {
                pool_hash,
                tick_upper,
                tick_lower,
                position_id,
            } => format!("position/{pool_hash}/{tick_upper}/{tick_lower}/{position_id}"),
            StateKey::PositionOwner { owner, pool_hash } => {
                format!("{}{pool_hash}", Self::owner_prefix(owner))
            }
            StateKey::FeeConfig => "dex-fee-config".to_string(),
        }
    }

    /// Prefix shared by every owner index of `owner`
    pub fn owner_prefix(owner: &UserAlias) -> String {
        format!("position-owner/{owner}/")
    }
}

/// A record the work unit can load and stage
pub trait Record: Serialize + DeserializeOwned {
    /// Name used in NotFound errors
    const ENTITY: &'static str;

    fn state_key(&self) -> StateKey;
}
