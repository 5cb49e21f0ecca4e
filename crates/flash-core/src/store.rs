//! In-memory flashcard store
//!
//! A `Store` is an immutable snapshot: groups plus the two id counters.
//! Mutations live in [`crate::gateway`] and return a new snapshot.

use crate::{Group, GroupMap, Result};

/// Groups and the next free group/card ids
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Store {
    groups: GroupMap,
    next_group_id: u64,
    next_card_id: u64,
}

impl Store {
    /// Build a store, raising the counters above every id present in `groups`
    pub fn new(groups: GroupMap, next_group_id: u64, next_card_id: u64) -> Self {
        let next_group_id = next_after(groups.values().map(|g| g.id), Some(next_group_id));
        let next_card_id = next_after(card_ids(&groups), Some(next_card_id));
        Self {
            groups,
            next_group_id,
            next_card_id,
        }
    }

    /// All groups ordered by id
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group_map(&self) -> &GroupMap {
        &self.groups
    }

    /// Get a group by ID
    pub fn group(&self, id: u64) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn next_group_id(&self) -> u64 {
        self.next_group_id
    }

    pub fn next_card_id(&self) -> u64 {
        self.next_card_id
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of cards across all groups
    pub fn card_count(&self) -> usize {
        self.groups.values().map(|g| g.cards.len()).sum()
    }

    /// Number of distinct non-empty categories across all groups
    pub fn category_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|g| g.cards.iter())
            .filter(|c| !c.category.is_empty())
            .map(|c| c.category.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }

    /// Serialize the group mapping for storage (counters are not persisted)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.groups)?)
    }

    pub(crate) fn groups_mut(&mut self) -> &mut GroupMap {
        &mut self.groups
    }

    /// Hand out the current group id and advance the counter
    ///
    /// `None` once the id space is used up; the counter is left as is.
    pub(crate) fn take_group_id(&mut self) -> Option<u64> {
        let id = self.next_group_id;
        self.next_group_id = id.checked_add(1)?;
        Some(id)
    }

    /// Hand out `count` consecutive card ids, returning the first
    pub(crate) fn take_card_ids(&mut self, count: usize) -> Option<u64> {
        let start = self.next_card_id;
        self.next_card_id = u64::try_from(count)
            .ok()
            .and_then(|count| start.checked_add(count))?;
        Some(start)
    }
}

/// One past the largest id, never below `floor`
///
/// With no ids and no floor the first id is 1. Saturates at `u64::MAX`,
/// after which `take_*` refuse to hand out more ids.
pub(crate) fn next_after(ids: impl Iterator<Item = u64>, floor: Option<u64>) -> u64 {
    let derived = ids.max().map_or(1, |max| max.saturating_add(1));
    floor.map_or(derived, |floor| derived.max(floor))
}

pub(crate) fn card_ids(groups: &GroupMap) -> impl Iterator<Item = u64> + '_ {
    groups
        .values()
        .flat_map(|g| g.cards.iter().map(|c| c.id))
}
