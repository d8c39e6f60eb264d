/// Deterministic identifiers derived by hashing

use sha2::{Digest, Sha256};

use crate::market::{FeeTier, TokenClassKey, UserAlias};

/// Pool identity: SHA-256 over both token keys and the fee tier
pub fn pool_hash(token0: &TokenClassKey, token1: &TokenClassKey, fee: FeeTier) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token0.to_string_key().as_bytes());
    hasher.update(b"|");
    hasher.update(token1.to_string_key().as_bytes());
    hasher.update(b"|");
    hasher.update(fee.pips().to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Position id derived from the pool, range, owner and a caller-supplied uniqueness token
pub fn derive_position_id(
    pool_hash: &str,
    tick_lower: i32,
    tick_upper: i32,
    owner: &UserAlias,
    unique_key: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pool_hash.as_bytes());
    hasher.update(tick_lower.to_be_bytes());
    hasher.update(tick_upper.to_be_bytes());
    hasher.update(owner.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(unique_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Key of a tick range inside an owner's index
pub fn tick_range_key(tick_lower: i32, tick_upper: i32) -> String {
    format!("{tick_lower}:{tick_upper}")
}
