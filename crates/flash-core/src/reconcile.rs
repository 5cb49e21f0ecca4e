//! Merge the bundled seed with saved data into the live store
//!
//! Saved data always wins when it parses, even when it is an empty mapping.
//! Counters are re-derived on every load; the seed's own counters act as a
//! floor so a newer seed can never hand out ids a user already owns.

use crate::store::{card_ids, next_after};
use crate::{GroupMap, SeedData, Store};

/// Build the session store from the seed and the raw saved blob
pub fn reconcile(seed: &SeedData, saved: Option<&str>) -> Store {
    let seed_groups: GroupMap = seed.groups.iter().map(|g| (g.id, g.clone())).collect();

    // The seed counters must never under-report the seed's own data
    let seed_next_group = next_after(seed_groups.values().map(|g| g.id), seed.next_group_id);
    let seed_next_card = next_after(card_ids(&seed_groups), seed.next_card_id);

    let groups = saved
        .and_then(parse_saved)
        .unwrap_or(seed_groups);

    Store::new(groups, seed_next_group, seed_next_card)
}

fn parse_saved(blob: &str) -> Option<GroupMap> {
    match serde_json::from_str::<GroupMap>(blob) {
        Ok(groups) if exhausts_ids(&groups) => {
            tracing::warn!("Saved groups use the largest possible id, using seed data");
            None
        }
        Ok(groups) => {
            tracing::debug!(groups = groups.len(), "loaded saved groups");
            Some(groups)
        }
        Err(e) => {
            tracing::warn!("Failed to parse saved groups, using seed data: {}", e);
            None
        }
    }
}

/// Data holding `u64::MAX` leaves no id for the next group or card
fn exhausts_ids(groups: &GroupMap) -> bool {
    groups.keys().copied().chain(groups.values().map(|g| g.id)).any(|id| id == u64::MAX)
        || card_ids(groups).any(|id| id == u64::MAX)
}
