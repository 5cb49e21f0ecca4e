//! Card and group data model for flash
//!
//! Field names follow the persisted JSON layout (`easyCount` is camelCase).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Groups keyed by id; this is the exact shape written to storage
pub type GroupMap = BTreeMap<u64, Group>;

/// One question/answer unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u64,

    #[serde(default)]
    pub category: String,

    pub question: String,

    pub answer: String,

    /// Times the card was marked as recalled
    #[serde(default)]
    pub easy_count: u32,
}

impl Card {
    pub fn new(
        id: u64,
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
            easy_count: 0,
        }
    }

    /// Whether the card has been recalled at least once
    pub fn is_mastered(&self) -> bool {
        self.easy_count > 0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} [{}] {} (easy x{})",
            self.id, self.category, self.question, self.easy_count
        )
    }
}

/// A named, ordered collection of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Group {
    /// Create an empty group
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, card_id: u64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Highest card id in this group
    pub fn max_card_id(&self) -> Option<u64> {
        self.cards.iter().map(|c| c.id).max()
    }

    /// Cards recalled at least once
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }

    /// Sum of every card's recall counter
    pub fn total_easy_count(&self) -> u64 {
        self.cards.iter().map(|c| u64::from(c.easy_count)).sum()
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({} cards)", self.id, self.name, self.cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_json_layout() {
        let card = Card::new(101, "History", "Q", "A");
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["easyCount"], 0);
        assert_eq!(json["id"], 101);
        assert!(json.get("easy_count").is_none());
    }

    #[test]
    fn test_missing_easy_count_reads_as_zero() {
        let card: Card =
            serde_json::from_str(r#"{"id":1,"category":"c","question":"q","answer":"a"}"#)
                .unwrap();
        assert_eq!(card.easy_count, 0);
    }

    #[test]
    fn test_group_map_uses_string_keys() {
        let mut groups = GroupMap::new();
        groups.insert(7, Group::new(7, "Seven"));
        let json = serde_json::to_string(&groups).unwrap();
        assert!(json.starts_with(r#"{"7":"#));

        let back: GroupMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back[&7].name, "Seven");
    }

    #[test]
    fn test_group_stats() {
        let mut group = Group::new(1, "g");
        group.cards.push(Card::new(1, "a", "q1", "a1"));
        group.cards.push(Card::new(2, "a", "q2", "a2"));
        group.cards[1].easy_count = 3;

        assert_eq!(group.mastered_count(), 1);
        assert_eq!(group.total_easy_count(), 3);
        assert_eq!(group.max_card_id(), Some(2));
    }
}
