//! External collaborators: a key-value state store and a token bank.
//!
//! The engine never persists or moves tokens directly; it stages both in a
//! work unit and hands them to these traits on commit.

mod memory;

pub use memory::{MemoryBank, MemoryStore};

use clamm_types::{ClammResult, TokenClassKey, UserAlias};
use rust_decimal::Decimal;

/// Byte-valued key-value store with ordered prefix scans
pub trait StateStore {
    fn get(&self, key: &str) -> ClammResult<Option<Vec<u8>>>;

    fn put(&mut self, key: &str, value: Vec<u8>) -> ClammResult<()>;

    fn delete(&mut self, key: &str) -> ClammResult<()>;

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &str) -> ClammResult<Vec<(String, Vec<u8>)>>;
}

/// Fungible token ledger
pub trait TokenBank {
    /// Native decimal places of a token; NotFound for unknown tokens
    fn decimals(&self, token: &TokenClassKey) -> ClammResult<u32>;

    fn balance_of(&self, owner: &UserAlias, token: &TokenClassKey) -> ClammResult<Decimal>;

    fn transfer(
        &mut self,
        from: &UserAlias,
        to: &UserAlias,
        token: &TokenClassKey,
        amount: Decimal,
    ) -> ClammResult<()>;
}
