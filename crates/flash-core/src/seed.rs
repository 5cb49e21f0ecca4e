//! Bundled default dataset
//!
//! Shipped with the binary and used whenever storage holds no usable data.

use crate::{Error, Group, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_SEED: &str = include_str!("../seed/initial_groups.json");

/// Seed document: `{ groups: [...], nextGroupId, nextCardId }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub groups: Vec<Group>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_group_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_card_id: Option<u64>,
}

impl SeedData {
    /// The dataset compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSeed(e.to_string()))
    }

    /// Load a seed document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from `path` if given, otherwise the bundled dataset
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_seed_parses() {
        let seed = SeedData::bundled().unwrap();
        assert_eq!(seed.groups.len(), 2);
        assert_eq!(seed.next_group_id, Some(3));
        assert_eq!(seed.next_card_id, Some(203));
        assert_eq!(seed.groups[1].cards[1].id, 202);
    }

    #[test]
    fn test_counters_are_optional() {
        let seed = SeedData::from_json(r#"{"groups":[]}"#).unwrap();
        assert!(seed.groups.is_empty());
        assert_eq!(seed.next_group_id, None);
        assert_eq!(seed.next_card_id, None);
    }

    #[test]
    fn test_invalid_seed() {
        let err = SeedData::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidSeed(_)));
    }
}
