//! Study loop over one group
//!
//! The cursor only stores the group id, the category filter and a position;
//! cards are always read from the live store so recall counts stay current.

use crate::{Card, Group, Result, Session, Storage};
use serde::Serialize;
use std::collections::BTreeSet;

/// How well the current card was recalled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    /// Got it; bumps the card's recall counter
    Easy,
    /// Show it again later; no counter change
    Again,
}

/// Sorted distinct non-empty categories
pub fn categories(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .filter(|c| !c.category.is_empty())
        .map(|c| c.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Progress figures for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub cards: usize,
    pub mastered: usize,
    pub total_easy: u64,
}

impl From<&Group> for GroupStats {
    fn from(group: &Group) -> Self {
        Self {
            cards: group.cards.len(),
            mastered: group.mastered_count(),
            total_easy: group.total_easy_count(),
        }
    }
}

/// Position within a filtered view of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyCursor {
    group_id: u64,
    category: Option<String>,
    index: usize,
    flipped: bool,
}

impl StudyCursor {
    pub fn new(group_id: u64) -> Self {
        Self {
            group_id,
            category: None,
            index: 0,
            flipped: false,
        }
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Restrict to one category (`None` shows every card) and rewind
    pub fn select_category(&mut self, category: Option<String>) {
        self.category = category;
        self.index = 0;
        self.flipped = false;
    }

    /// Cards visible under the current filter, in group order
    pub fn filtered<'g>(&self, group: &'g Group) -> Vec<&'g Card> {
        group
            .cards
            .iter()
            .filter(|c| self.category.as_deref().is_none_or(|cat| c.category == cat))
            .collect()
    }

    pub fn current<'g>(&self, group: &'g Group) -> Option<&'g Card> {
        self.filtered(group).get(self.index).copied()
    }

    /// 1-based position and total, or `(0, 0)` for an empty view
    pub fn position(&self, group: &Group) -> (usize, usize) {
        let total = self.filtered(group).len();
        if total == 0 { (0, 0) } else { (self.index + 1, total) }
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move to the next card, wrapping at the end, and show its question
    pub fn advance(&mut self, group: &Group) {
        self.flipped = false;
        let total = self.filtered(group).len();
        if total > 0 {
            self.index = (self.index + 1) % total;
        }
    }

    /// Record the answer for the current card and advance
    ///
    /// Does nothing if the group is gone or the view is empty.
    pub fn answer<S: Storage>(&mut self, session: &mut Session<S>, recall: Recall) -> Result<()> {
        let Some(group) = session.store().group(self.group_id) else {
            return Ok(());
        };
        let Some(card_id) = self.current(group).map(|c| c.id) else {
            return Ok(());
        };

        if recall == Recall::Easy {
            session.mark_recalled(self.group_id, card_id)?;
        }
        if let Some(group) = session.store().group(self.group_id) {
            self.advance(group);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, SeedData};

    fn group() -> Group {
        let mut group = Group::new(1, "g");
        group.cards.push(Card::new(1, "b", "q1", "a1"));
        group.cards.push(Card::new(2, "a", "q2", "a2"));
        group.cards.push(Card::new(3, "b", "q3", "a3"));
        group.cards.push(Card::new(4, "", "q4", "a4"));
        group
    }

    #[test]
    fn test_categories_sorted_and_unique() {
        assert_eq!(categories(&group().cards), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_and_wrap() {
        let group = group();
        let mut cursor = StudyCursor::new(1);
        cursor.select_category(Some("b".to_string()));

        assert_eq!(cursor.position(&group), (1, 2));
        assert_eq!(cursor.current(&group).unwrap().id, 1);
        cursor.advance(&group);
        assert_eq!(cursor.current(&group).unwrap().id, 3);
        cursor.advance(&group);
        assert_eq!(cursor.current(&group).unwrap().id, 1);
    }

    #[test]
    fn test_empty_view() {
        let group = group();
        let mut cursor = StudyCursor::new(1);
        cursor.select_category(Some("missing".to_string()));
        assert_eq!(cursor.position(&group), (0, 0));
        assert!(cursor.current(&group).is_none());
        cursor.advance(&group);
        assert_eq!(cursor.position(&group), (0, 0));
    }

    #[test]
    fn test_advance_hides_answer() {
        let group = group();
        let mut cursor = StudyCursor::new(1);
        cursor.flip();
        assert!(cursor.is_flipped());
        cursor.advance(&group);
        assert!(!cursor.is_flipped());
    }

    #[test]
    fn test_answer_easy_marks_recalled() {
        let mut session = Session::open(
            MemoryStorage::new(),
            "k",
            &SeedData::bundled().unwrap(),
        )
        .unwrap();
        let mut cursor = StudyCursor::new(1);

        cursor.answer(&mut session, Recall::Easy).unwrap();
        cursor.answer(&mut session, Recall::Again).unwrap();

        let group = session.store().group(1).unwrap();
        assert_eq!(group.card(101).unwrap().easy_count, 1);
        assert_eq!(group.card(102).unwrap().easy_count, 0);
        assert_eq!(cursor.position(group), (1, 2));

        let stats = GroupStats::from(group);
        assert_eq!(stats.cards, 2);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.total_easy, 1);
    }
}
