/// Unit of Work Pattern for State Management
///
/// Tracks every record written and every token transfer requested while an
/// operation runs. Reads see the operation's own staged writes. Nothing reaches
/// the store or the bank until `commit`, so a failed operation leaves no trace.

use std::collections::BTreeMap;

use clamm_types::{ClammError, ClammResult, TokenClassKey, UserAlias};
use log::debug;
use rust_decimal::Decimal;

use crate::ledger::{StateStore, TokenBank};
use crate::state::{Record, StateKey};

// ============================================================================
// Core Unit of Work Types
// ============================================================================

/// A staged change to one storage key
#[derive(Clone, Debug, PartialEq)]
enum PendingWrite {
    Put(Vec<u8>),
    Delete,
}

/// A staged token movement
#[derive(Clone, Debug, PartialEq)]
pub struct TokenTransfer {
    pub from: UserAlias,
    pub to: UserAlias,
    pub token: TokenClassKey,
    pub amount: Decimal,
}

// ============================================================================
// Unit of Work Implementation
// ============================================================================

pub struct WorkUnit<'a> {
    store: &'a mut dyn StateStore,
    bank: &'a mut dyn TokenBank,

    /// Pending writes keyed by storage key
    pending_changes: BTreeMap<String, PendingWrite>,

    /// Pending transfers in request order
    transfers: Vec<TokenTransfer>,
}

impl<'a> WorkUnit<'a> {
    pub fn new(store: &'a mut dyn StateStore, bank: &'a mut dyn TokenBank) -> Self {
        Self {
            store,
            bank,
            pending_changes: BTreeMap::new(),
            transfers: Vec::new(),
        }
    }

    // ========================================================================
    // State Loading Functions
    // ========================================================================

    pub fn load<T: Record>(&self, key: &StateKey) -> ClammResult<Option<T>> {
        let storage_key = key.storage_key();
        let bytes = match self.pending_changes.get(&storage_key) {
            Some(PendingWrite::Put(bytes)) => Some(bytes.clone()),
            Some(PendingWrite::Delete) => None,
            None => self.store.get(&storage_key)?,
        };
        bytes.map(|bytes| decode(&bytes)).transpose()
    }

    /// Load a record that must exist
    pub fn load_required<T: Record>(&self, key: &StateKey) -> ClammResult<T> {
        self.load(key)?
            .ok_or_else(|| ClammError::not_found(T::ENTITY, key.storage_key()))
    }

    /// Every record under `prefix`, staged changes included, in key order
    pub fn load_prefix<T: Record>(&self, prefix: &str) -> ClammResult<Vec<T>> {
        let mut merged: BTreeMap<String, Vec<u8>> = self.store.scan_prefix(prefix)?.into_iter().collect();
        for (key, change) in self.pending_changes.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match change {
                PendingWrite::Put(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                PendingWrite::Delete => {
                    merged.remove(key);
                }
            }
        }
        merged.values().map(|bytes| decode(bytes)).collect()
    }

    // ========================================================================
    // State Staging Functions
    // ========================================================================

    pub fn save<T: Record>(&mut self, record: &T) -> ClammResult<()> {
        let bytes = serde_json::to_vec(record)?;
        self.pending_changes
            .insert(record.state_key().storage_key(), PendingWrite::Put(bytes));
        Ok(())
    }

    pub fn delete(&mut self, key: &StateKey) {
        self.pending_changes.insert(key.storage_key(), PendingWrite::Delete);
    }

    // ========================================================================
    // Token Functions
    // ========================================================================

    pub fn token_decimals(&self, token: &TokenClassKey) -> ClammResult<u32> {
        self.bank.decimals(token)
    }

    /// Live balance adjusted by the transfers already staged in this unit
    pub fn balance_of(&self, owner: &UserAlias, token: &TokenClassKey) -> ClammResult<Decimal> {
        let mut balance = self.bank.balance_of(owner, token)?;
        for transfer in self.transfers.iter().filter(|t| &t.token == token) {
            if &transfer.from == owner {
                balance -= transfer.amount;
            }
            if &transfer.to == owner {
                balance += transfer.amount;
            }
        }
        Ok(balance)
    }

    /// Stage a transfer; fails now if `from` cannot cover it
    pub fn transfer(
        &mut self,
        from: &UserAlias,
        to: &UserAlias,
        token: &TokenClassKey,
        amount: Decimal,
    ) -> ClammResult<()> {
        if amount < Decimal::ZERO {
            return Err(ClammError::invalid_parameter(
                "amount",
                &amount.to_string(),
                "non-negative transfer amount",
            ));
        }
        if amount.is_zero() {
            return Ok(());
        }

        let available = self.balance_of(from, token)?;
        if available < amount {
            return Err(ClammError::InsufficientBalance {
                owner: from.to_string(),
                token: token.to_string_key(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }

        self.transfers.push(TokenTransfer {
            from: from.clone(),
            to: to.clone(),
            token: token.clone(),
            amount,
        });
        Ok(())
    }

    pub fn pending_transfers(&self) -> &[TokenTransfer] {
        &self.transfers
    }

    // ========================================================================
    // Commit Functions
    // ========================================================================

    /// Apply staged transfers, then staged writes
    pub fn commit(self) -> ClammResult<()> {
        let Self {
            store,
            bank,
            pending_changes,
            transfers,
        } = self;

        debug!(
            "committing {} writes and {} transfers",
            pending_changes.len(),
            transfers.len()
        );

        for transfer in &transfers {
            bank.transfer(&transfer.from, &transfer.to, &transfer.token, transfer.amount)?;
        }

        for (key, change) in pending_changes {
            match change {
                PendingWrite::Put(bytes) => store.put(&key, bytes)?,
                PendingWrite::Delete => store.delete(&key)?,
            }
        }
        Ok(())
    }
}

fn decode<T: Record>(bytes: &[u8]) -> ClammResult<T> {
    serde_json::from_slice(bytes).map_err(|err| ClammError::Serialization(format!("{}: {err}", T::ENTITY)))
}
