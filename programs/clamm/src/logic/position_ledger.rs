//! Positions and the per-owner index that locates them

use clamm_types::{derive_position_id, ClammError, ClammResult, UserAlias};
use log::debug;
use rust_decimal::Decimal;

use super::WorkUnit;
use crate::state::{DexPositionData, DexPositionOwner, Record, StateKey};

/// Re-derivations tried before a derived position id is given up on
const MAX_DERIVE_ATTEMPTS: u32 = 16;

pub struct PositionLedger;

impl PositionLedger {
    fn position_key(pool_hash: &str, tick_lower: i32, tick_upper: i32, position_id: &str) -> StateKey {
        StateKey::Position {
            pool_hash: pool_hash.to_string(),
            tick_upper,
            tick_lower,
            position_id: position_id.to_string(),
        }
    }

    fn owner_key(owner: &UserAlias, pool_hash: &str) -> StateKey {
        StateKey::PositionOwner {
            owner: owner.clone(),
            pool_hash: pool_hash.to_string(),
        }
    }

    pub fn owner_index(unit: &WorkUnit<'_>, owner: &UserAlias, pool_hash: &str) -> ClammResult<DexPositionOwner> {
        Ok(unit
            .load(&Self::owner_key(owner, pool_hash))?
            .unwrap_or_else(|| DexPositionOwner::new(owner.clone(), pool_hash)))
    }

    /// Resolve a position the owner holds in `[tick_lower, tick_upper]`.
    ///
    /// Without an id the owner's first position in the range is used.
    pub fn fetch(
        unit: &WorkUnit<'_>,
        owner: &UserAlias,
        pool_hash: &str,
        tick_lower: i32,
        tick_upper: i32,
        position_id: Option<&str>,
    ) -> ClammResult<DexPositionData> {
        let index = Self::owner_index(unit, owner, pool_hash)?;
        let position_id = match position_id {
            Some(id) if index.contains(tick_lower, tick_upper, id) => id.to_string(),
            Some(id) => {
                return Err(ClammError::not_found(
                    "Position",
                    format!("{id} in range [{tick_lower}, {tick_upper}] owned by {owner}"),
                ))
            }
            None => index
                .position_ids(tick_lower, tick_upper)
                .first()
                .cloned()
                .ok_or_else(|| {
                    ClammError::not_found("Position", format!("range [{tick_lower}, {tick_upper}] owned by {owner}"))
                })?,
        };
        unit.load_required(&Self::position_key(pool_hash, tick_lower, tick_upper, &position_id))
    }

    /// Existing position by id, or the one derived from `unique_key`
    pub fn fetch_or_create(
        unit: &WorkUnit<'_>,
        owner: &UserAlias,
        pool_hash: &str,
        tick_lower: i32,
        tick_upper: i32,
        position_id: Option<&str>,
        unique_key: &str,
    ) -> ClammResult<DexPositionData> {
        if position_id.is_some() {
            return Self::fetch(unit, owner, pool_hash, tick_lower, tick_upper, position_id);
        }
        let index = Self::owner_index(unit, owner, pool_hash)?;
        // A derived id can already belong to someone else after a transfer
        for attempt in 0..MAX_DERIVE_ATTEMPTS {
            let seed = if attempt == 0 {
                unique_key.to_string()
            } else {
                format!("{unique_key}#{attempt}")
            };
            let derived = derive_position_id(pool_hash, tick_lower, tick_upper, owner, &seed);
            let key = Self::position_key(pool_hash, tick_lower, tick_upper, &derived);
            match unit.load::<DexPositionData>(&key)? {
                None => return Ok(DexPositionData::new(pool_hash, derived, tick_lower, tick_upper)),
                Some(existing) if index.contains(tick_lower, tick_upper, &derived) => return Ok(existing),
                Some(_) => debug!("position {derived} is held by another owner, deriving again"),
            }
        }
        Err(ClammError::conflict(format!(
            "no free position id for {owner} in range [{tick_lower}, {tick_upper}] with key {unique_key:?}"
        )))
    }

    /// Stage the position and make sure the owner's index lists it
    pub fn save(unit: &mut WorkUnit<'_>, owner: &UserAlias, position: &DexPositionData) -> ClammResult<()> {
        unit.save(position)?;
        let mut index = Self::owner_index(unit, owner, &position.pool_hash)?;
        if !index.contains(position.tick_lower, position.tick_upper, &position.position_id) {
            index.add_position(position.tick_lower, position.tick_upper, &position.position_id);
            unit.save(&index)?;
        }
        Ok(())
    }

    pub fn remove(unit: &mut WorkUnit<'_>, owner: &UserAlias, position: &DexPositionData) -> ClammResult<()> {
        unit.delete(&position.state_key());
        let mut index = Self::owner_index(unit, owner, &position.pool_hash)?;
        index.remove_position(position.tick_lower, position.tick_upper, &position.position_id);
        Self::store_index(unit, &index)
    }

    /// Save the position, or remove it once everything in it is dust.
    /// Returns true when the position was removed.
    pub fn save_or_remove_dust(
        unit: &mut WorkUnit<'_>,
        owner: &UserAlias,
        position: &DexPositionData,
        threshold: Decimal,
    ) -> ClammResult<bool> {
        if position.is_dust(threshold) {
            Self::remove(unit, owner, position)?;
            Ok(true)
        } else {
            Self::save(unit, owner, position)?;
            Ok(false)
        }
    }

    /// Move `position_id` from one owner's index to another's
    pub fn transfer(
        unit: &mut WorkUnit<'_>,
        from: &UserAlias,
        to: &UserAlias,
        pool_hash: &str,
        position_id: &str,
    ) -> ClammResult<DexPositionData> {
        require!(
            from != to,
            ClammError::validation(format!("cannot transfer position {position_id} to its current owner"))
        );

        let mut from_index = Self::owner_index(unit, from, pool_hash)?;
        let (tick_lower, tick_upper) = from_index
            .find_tick_range(position_id)
            .ok_or_else(|| ClammError::not_found("Position", format!("{position_id} owned by {from}")))?;
        let position: DexPositionData =
            unit.load_required(&Self::position_key(pool_hash, tick_lower, tick_upper, position_id))?;

        from_index.remove_position(tick_lower, tick_upper, position_id);
        Self::store_index(unit, &from_index)?;

        let mut to_index = Self::owner_index(unit, to, pool_hash)?;
        to_index.add_position(tick_lower, tick_upper, position_id);
        unit.save(&to_index)?;
        Ok(position)
    }

    /// Every owner index the user holds, across pools
    pub fn positions_of(unit: &WorkUnit<'_>, owner: &UserAlias) -> ClammResult<Vec<DexPositionOwner>> {
        unit.load_prefix(&StateKey::owner_prefix(owner))
    }

    fn store_index(unit: &mut WorkUnit<'_>, index: &DexPositionOwner) -> ClammResult<()> {
        if index.is_empty() {
            unit.delete(&index.state_key());
            Ok(())
        } else {
            unit.save(index)
        }
    }
}
