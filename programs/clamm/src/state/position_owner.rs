//! Index of the positions a user holds in one pool

use std::collections::BTreeMap;

use clamm_types::{tick_range_key, UserAlias};
use serde::{Deserialize, Serialize};

use super::{Record, StateKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPositionOwner {
    pub owner: UserAlias,
    pub pool_hash: String,
    /// "lower:upper" to position ids, in creation order
    pub tick_range_map: BTreeMap<String, Vec<String>>,
}

impl DexPositionOwner {
    pub fn new(owner: UserAlias, pool_hash: impl Into<String>) -> Self {
        Self {
            owner,
            pool_hash: pool_hash.into(),
            tick_range_map: BTreeMap::new(),
        }
    }

    pub fn add_position(&mut self, tick_lower: i32, tick_upper: i32, position_id: &str) {
        let ids = self
            .tick_range_map
            .entry(tick_range_key(tick_lower, tick_upper))
            .or_default();
        if !ids.iter().any(|id| id == position_id) {
            ids.push(position_id.to_string());
        }
    }

    /// Returns false if the id was not indexed under that range
    pub fn remove_position(&mut self, tick_lower: i32, tick_upper: i32, position_id: &str) -> bool {
        let key = tick_range_key(tick_lower, tick_upper);
        let Some(ids) = self.tick_range_map.get_mut(&key) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|id| id != position_id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.tick_range_map.remove(&key);
        }
        removed
    }

    pub fn position_ids(&self, tick_lower: i32, tick_upper: i32) -> &[String] {
        self.tick_range_map
            .get(&tick_range_key(tick_lower, tick_upper))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, tick_lower: i32, tick_upper: i32, position_id: &str) -> bool {
        self.position_ids(tick_lower, tick_upper).iter().any(|id| id == position_id)
    }

    /// Range holding `position_id`, if any
    pub fn find_tick_range(&self, position_id: &str) -> Option<(i32, i32)> {
        self.tick_range_map
            .iter()
            .find(|(_, ids)| ids.iter().any(|id| id == position_id))
            .and_then(|(key, _)| parse_range_key(key))
    }

    /// Every (tick_lower, tick_upper, position_id) in the index
    pub fn entries(&self) -> Vec<(i32, i32, String)> {
        self.tick_range_map
            .iter()
            .filter_map(|(key, ids)| parse_range_key(key).map(|range| (range, ids)))
            .flat_map(|((lower, upper), ids)| ids.iter().map(move |id| (lower, upper, id.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tick_range_map.is_empty()
    }
}

fn parse_range_key(key: &str) -> Option<(i32, i32)> {
    let (lower, upper) = key.split_once(':')?;
    Some((lower.parse().ok()?, upper.parse().ok()?))
}

impl Record for DexPositionOwner {
    const ENTITY: &'static str = "PositionOwner";

    fn state_key(&self) -> StateKey {
        StateKey::PositionOwner {
            owner: self.owner.clone(),
            pool_hash: self.pool_hash.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_positions_per_range() {
        let mut index = DexPositionOwner::new(UserAlias::new("client|alice"), "pool");
        index.add_position(-60, 60, "a");
        index.add_position(-60, 60, "b");
        index.add_position(-60, 60, "a");
        index.add_position(-120, 0, "c");

        assert_eq!(index.position_ids(-60, 60), ["a".to_string(), "b".to_string()]);
        assert_eq!(index.find_tick_range("c"), Some((-120, 0)));
        assert_eq!(index.entries().len(), 3);
    }

    #[test]
    fn test_remove_drops_empty_ranges() {
        let mut index = DexPositionOwner::new(UserAlias::new("client|alice"), "pool");
        index.add_position(-60, 60, "a");
        assert!(!index.remove_position(-60, 60, "zzz"));
        assert!(index.remove_position(-60, 60, "a"));
        assert!(index.is_empty());
        assert!(!index.remove_position(-60, 60, "a"));
    }
}
