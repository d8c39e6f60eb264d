//! In-memory ledgers for hosts without persistent storage and for tests

use std::collections::{BTreeMap, HashMap};

use clamm_types::{ClammError, ClammResult, TokenClassKey, UserAlias};
use rust_decimal::Decimal;

use super::{StateStore, TokenBank};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> ClammResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> ClammResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> ClammResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> ClammResult<Vec<(String, Vec<u8>)>> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBank {
    decimals: HashMap<TokenClassKey, u32>,
    balances: HashMap<(UserAlias, TokenClassKey), Decimal>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_token(&mut self, token: TokenClassKey, decimals: u32) {
        self.decimals.insert(token, decimals);
    }

    /// Credit `amount` out of thin air
    pub fn mint(&mut self, owner: &UserAlias, token: &TokenClassKey, amount: Decimal) {
        *self
            .balances
            .entry((owner.clone(), token.clone()))
            .or_insert(Decimal::ZERO) += amount;
    }

    fn balance(&self, owner: &UserAlias, token: &TokenClassKey) -> Decimal {
        self.balances
            .get(&(owner.clone(), token.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl TokenBank for MemoryBank {
    fn decimals(&self, token: &TokenClassKey) -> ClammResult<u32> {
        self.decimals
            .get(token)
            .copied()
            .ok_or_else(|| ClammError::not_found("Token", token.to_string_key()))
    }

    fn balance_of(&self, owner: &UserAlias, token: &TokenClassKey) -> ClammResult<Decimal> {
        self.decimals(token)?;
        Ok(self.balance(owner, token))
    }

    fn transfer(
        &mut self,
        from: &UserAlias,
        to: &UserAlias,
        token: &TokenClassKey,
        amount: Decimal,
    ) -> ClammResult<()> {
        self.decimals(token)?;
        if amount < Decimal::ZERO {
            return Err(ClammError::invalid_parameter("amount", &amount.to_string(), "non-negative"));
        }
        let available = self.balance(from, token);
        if available < amount {
            return Err(ClammError::InsufficientBalance {
                owner: from.to_string(),
                token: token.to_string_key(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }
        self.balances.insert((from.clone(), token.clone()), available - amount);
        self.mint(to, token, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_prefix_is_bounded() {
        let mut store = MemoryStore::new();
        store.put("owner/a/1", vec![1]).unwrap();
        store.put("owner/a/2", vec![2]).unwrap();
        store.put("owner/ab/1", vec![3]).unwrap();
        store.put("pool/x", vec![4]).unwrap();
        let found = store.scan_prefix("owner/a/").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "owner/a/1");
        store.delete("owner/a/1").unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_transfer_moves_balance() {
        let token = TokenClassKey::new("GALA", "Unit", "none", "none");
        let alice = UserAlias::new("client|alice");
        let bob = UserAlias::new("client|bob");
        let mut bank = MemoryBank::new();
        bank.register_token(token.clone(), 8);
        bank.mint(&alice, &token, Decimal::from(10));

        bank.transfer(&alice, &bob, &token, Decimal::from(4)).unwrap();
        assert_eq!(bank.balance_of(&alice, &token).unwrap(), Decimal::from(6));
        assert_eq!(bank.balance_of(&bob, &token).unwrap(), Decimal::from(4));

        let err = bank.transfer(&bob, &alice, &token, Decimal::from(5)).unwrap_err();
        assert!(matches!(err, ClammError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_unknown_token() {
        let bank = MemoryBank::new();
        let token = TokenClassKey::new("NOPE", "Unit", "none", "none");
        let err = bank.decimals(&token).unwrap_err();
        assert!(matches!(err, ClammError::NotFound { .. }));
    }
}
