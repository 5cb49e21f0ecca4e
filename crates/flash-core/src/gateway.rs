//! Store mutations
//!
//! Every operation takes the current snapshot and returns a new one. Rejected
//! input comes back as a [`ValidationError`] and leaves the caller's store
//! untouched. Counters only ever move forward, so ids are never reused even
//! after deletes.

use crate::{Card, Group, Store, ValidationError, generator};
use serde::{Deserialize, Serialize};

/// Result of an operation that validates user input
pub type Validated<T> = std::result::Result<T, ValidationError>;

/// Largest number of cards one generation request may ask for
pub const MAX_GENERATED_CARDS: usize = 50;

/// Create an empty group under the next group id
///
/// Returns the new store and the assigned id.
pub fn create_group(store: &Store, name: &str) -> Validated<(Store, u64)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyGroupName);
    }

    let mut next = store.clone();
    let id = next.take_group_id().ok_or(ValidationError::IdsExhausted)?;
    next.groups_mut().insert(id, Group::new(id, name));
    tracing::debug!(id, name, "created group");
    Ok((next, id))
}

/// Remove a group and all of its cards; absent ids are ignored
pub fn delete_group(store: &Store, id: u64) -> Store {
    let mut next = store.clone();
    if next.groups_mut().remove(&id).is_some() {
        tracing::debug!(id, "deleted group");
    }
    next
}

/// Card fields as entered by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub question: String,
    pub answer: String,
    /// Existing category picked from the group's list
    #[serde(default)]
    pub category: String,
    /// Freshly typed category; overrides `category` when non-empty
    #[serde(default)]
    pub new_category: String,
}

impl NewCard {
    /// Trimmed `(category, question, answer)`, or an error if any is empty
    pub fn resolve(&self) -> Validated<(String, String, String)> {
        let new_category = self.new_category.trim();
        let category = if new_category.is_empty() {
            self.category.trim()
        } else {
            new_category
        };
        let question = self.question.trim();
        let answer = self.answer.trim();

        if question.is_empty() || answer.is_empty() || category.is_empty() {
            return Err(ValidationError::MissingCardFields);
        }
        Ok((category.to_string(), question.to_string(), answer.to_string()))
    }
}

/// Append a card to a group under the next card id
///
/// Returns the new store and the assigned card id.
pub fn add_card(store: &Store, group_id: u64, card: &NewCard) -> Validated<(Store, u64)> {
    let (category, question, answer) = card.resolve()?;
    if store.group(group_id).is_none() {
        return Err(ValidationError::GroupNotFound(group_id));
    }

    let mut next = store.clone();
    let id = next.take_card_ids(1).ok_or(ValidationError::IdsExhausted)?;
    let group = next
        .groups_mut()
        .get_mut(&group_id)
        .ok_or(ValidationError::GroupNotFound(group_id))?;
    group.cards.push(Card::new(id, category, question, answer));
    tracing::debug!(group_id, card_id = id, "added card");
    Ok((next, id))
}

/// Increment a card's recall counter; unknown group or card is a no-op
pub fn mark_recalled(store: &Store, group_id: u64, card_id: u64) -> Store {
    let mut next = store.clone();
    let card = next
        .groups_mut()
        .get_mut(&group_id)
        .and_then(|g| g.cards.iter_mut().find(|c| c.id == card_id));
    if let Some(card) = card {
        card.easy_count = card.easy_count.saturating_add(1);
    }
    next
}

/// Where generated cards go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateTarget {
    /// Create a group; `name` overrides the default `"{topic} (generated)"`
    NewGroup { name: Option<String> },
    /// Append to an existing group (`None` when nothing was selected)
    Existing(Option<u64>),
}

impl Default for GenerateTarget {
    fn default() -> Self {
        GenerateTarget::NewGroup { name: None }
    }
}

/// A bulk generation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    #[serde(default)]
    pub detail: String,
    pub count: usize,
    #[serde(default)]
    pub target: GenerateTarget,
}

impl GenerateRequest {
    pub fn new(topic: impl Into<String>, count: usize) -> Self {
        Self {
            topic: topic.into(),
            detail: String::new(),
            count,
            target: GenerateTarget::default(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_target(mut self, target: GenerateTarget) -> Self {
        self.target = target;
        self
    }

    /// The starter set offered on an empty home screen
    pub fn demo() -> Self {
        Self::new("Starter template", 3)
            .with_detail("UI check")
            .with_target(GenerateTarget::NewGroup {
                name: Some("Starter stack (generated)".to_string()),
            })
    }

    /// Name for a new group: the override if set, else `"{topic} (generated)"`
    pub fn group_name(&self) -> String {
        if let GenerateTarget::NewGroup { name: Some(name) } = &self.target {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
        format!("{} (generated)", self.topic.trim())
    }

    /// Check the request against the current store
    pub fn validate(&self, store: &Store) -> Validated<()> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if self.count > MAX_GENERATED_CARDS {
            return Err(ValidationError::TooManyCards {
                count: self.count,
                max: MAX_GENERATED_CARDS,
            });
        }
        match self.target {
            GenerateTarget::Existing(None) => Err(ValidationError::MissingTarget),
            GenerateTarget::Existing(Some(id)) if store.group(id).is_none() => {
                Err(ValidationError::TargetNotFound(id))
            }
            _ => Ok(()),
        }
    }
}

/// Ids set aside for one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub first_card_id: u64,
    pub card_count: usize,
    /// Set for new-group requests
    pub group_id: Option<u64>,
}

/// Outcome of a generation, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub group_id: u64,
    pub group_name: String,
    pub card_count: usize,
    pub topic: String,
    pub detail: String,
}

/// Validate a request and advance the counters past the ids it will use
pub fn reserve(store: &Store, request: &GenerateRequest) -> Validated<(Store, Reservation)> {
    request.validate(store)?;

    let mut next = store.clone();
    let first_card_id = next
        .take_card_ids(request.count)
        .ok_or(ValidationError::IdsExhausted)?;
    let group_id = match request.target {
        GenerateTarget::NewGroup { .. } => {
            Some(next.take_group_id().ok_or(ValidationError::IdsExhausted)?)
        }
        GenerateTarget::Existing(_) => None,
    };
    Ok((
        next,
        Reservation {
            first_card_id,
            card_count: request.count,
            group_id,
        },
    ))
}

/// Generate cards into previously reserved ids
///
/// An existing target is looked up again since it may have been deleted
/// after the reservation was made.
pub fn place(
    store: &Store,
    request: &GenerateRequest,
    reservation: &Reservation,
) -> Validated<(Store, GenerationSummary)> {
    let fits = u64::try_from(reservation.card_count)
        .ok()
        .and_then(|count| reservation.first_card_id.checked_add(count))
        .is_some();
    if reservation.card_count > MAX_GENERATED_CARDS || !fits {
        return Err(ValidationError::IdsExhausted);
    }

    let cards = generator::generate(
        &request.topic,
        &request.detail,
        reservation.card_count,
        reservation.first_card_id,
    );
    let card_count = cards.len();
    let mut next = store.clone();

    let (group_id, group_name) = match (&request.target, reservation.group_id) {
        (GenerateTarget::Existing(None), _) => return Err(ValidationError::MissingTarget),
        (GenerateTarget::Existing(Some(id)), _) => {
            let group = next
                .groups_mut()
                .get_mut(id)
                .ok_or(ValidationError::TargetNotFound(*id))?;
            group.cards.extend(cards);
            (*id, group.name.clone())
        }
        (GenerateTarget::NewGroup { .. }, group_id) => {
            let id = match group_id {
                Some(id) => id,
                None => next.take_group_id().ok_or(ValidationError::IdsExhausted)?,
            };
            let mut group = Group::new(id, request.group_name());
            group.cards = cards;
            let name = group.name.clone();
            next.groups_mut().insert(id, group);
            (id, name)
        }
    };

    tracing::debug!(group_id, card_count, "placed generated cards");
    Ok((
        next,
        GenerationSummary {
            group_id,
            group_name,
            card_count,
            topic: request.topic.clone(),
            detail: request.detail.clone(),
        },
    ))
}

/// Reserve and place in one step
pub fn generate_cards(
    store: &Store,
    request: &GenerateRequest,
) -> Validated<(Store, GenerationSummary)> {
    let (reserved, reservation) = reserve(store, request)?;
    place(&reserved, request, &reservation)
}
