//! Live session state
//!
//! A `Session` owns the current store, the storage it is saved to, and the
//! status of card generation. Each mutation replaces the store and writes
//! the group mapping back under the session's storage key.

use crate::gateway::{self, GenerateRequest, GenerationSummary, NewCard, Reservation};
use crate::{Result, SeedData, Storage, Store, ValidationError, reconcile};
use serde::Serialize;
use std::time::Duration;

/// Phase of the most recent generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStatus::Idle => write!(f, "idle"),
            GenerationStatus::Generating => write!(f, "generating"),
            GenerationStatus::Success => write!(f, "success"),
            GenerationStatus::Error => write!(f, "error"),
        }
    }
}

/// Observable generation state
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationState {
    pub status: GenerationStatus,
    pub last_result: Option<GenerationSummary>,
    pub error: Option<String>,
    /// Tickets handed out but not yet finished
    pub pending: usize,
}

impl GenerationState {
    pub fn is_generating(&self) -> bool {
        self.pending > 0
    }

    fn fail(&mut self, err: &ValidationError) {
        self.status = if self.pending > 0 {
            GenerationStatus::Generating
        } else {
            GenerationStatus::Error
        };
        self.last_result = None;
        self.error = Some(err.to_string());
    }

    fn succeed(&mut self, summary: GenerationSummary) {
        self.status = if self.pending > 0 {
            GenerationStatus::Generating
        } else {
            GenerationStatus::Success
        };
        self.last_result = Some(summary);
        self.error = None;
    }
}

/// A generation whose ids are reserved but whose cards are not placed yet
#[derive(Debug, Clone)]
#[must_use = "a ticket does nothing until passed to Session::finish_generation"]
pub struct GenerationTicket {
    request: GenerateRequest,
    reservation: Reservation,
    delay: Duration,
}

impl GenerationTicket {
    pub fn reservation(&self) -> &Reservation {
        &self.reservation
    }

    /// Wait out the simulated generation latency
    pub async fn ready(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Store + storage + generation status
pub struct Session<S: Storage> {
    store: Store,
    storage: S,
    key: String,
    generation: GenerationState,
    latency: Duration,
}

impl<S: Storage> Session<S> {
    /// Reconcile the seed with whatever `storage` holds under `key`
    pub fn open(storage: S, key: &str, seed: &SeedData) -> Result<Self> {
        let saved = storage.get(key)?;
        let store = reconcile(seed, saved.as_deref());
        let mut session = Self {
            store,
            storage,
            key: key.to_string(),
            generation: GenerationState::default(),
            latency: Duration::ZERO,
        };
        session.persist()?;
        Ok(session)
    }

    /// Delay applied to each generation before its cards are placed
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    /// Create an empty group, returning its id
    pub fn create_group(&mut self, name: &str) -> Result<u64> {
        let (next, id) = gateway::create_group(&self.store, name)?;
        self.commit(next)?;
        Ok(id)
    }

    /// Delete a group and its cards; absent ids are ignored
    pub fn delete_group(&mut self, id: u64) -> Result<()> {
        let next = gateway::delete_group(&self.store, id);
        self.commit(next)
    }

    /// Add a card to a group, returning the card id
    pub fn add_card(&mut self, group_id: u64, card: &NewCard) -> Result<u64> {
        let (next, id) = gateway::add_card(&self.store, group_id, card)?;
        self.commit(next)?;
        Ok(id)
    }

    /// Bump a card's recall counter; unknown ids are ignored
    pub fn mark_recalled(&mut self, group_id: u64, card_id: u64) -> Result<()> {
        let next = gateway::mark_recalled(&self.store, group_id, card_id);
        self.commit(next)
    }

    /// Validate a request and reserve its ids now
    ///
    /// Reserving up front means overlapping requests get disjoint id ranges
    /// no matter which finishes first.
    pub fn begin_generation(&mut self, request: GenerateRequest) -> Result<GenerationTicket> {
        let (next, reservation) = match gateway::reserve(&self.store, &request) {
            Ok(reserved) => reserved,
            Err(e) => {
                self.generation.fail(&e);
                return Err(e.into());
            }
        };
        self.commit(next)?;

        self.generation.pending += 1;
        self.generation.status = GenerationStatus::Generating;
        self.generation.error = None;
        tracing::debug!(
            first_card_id = reservation.first_card_id,
            count = reservation.card_count,
            "generation started"
        );

        Ok(GenerationTicket {
            request,
            reservation,
            delay: self.latency,
        })
    }

    /// Place the cards for a ticket into the current store
    pub fn finish_generation(&mut self, ticket: GenerationTicket) -> Result<GenerationSummary> {
        self.generation.pending = self.generation.pending.saturating_sub(1);

        match gateway::place(&self.store, &ticket.request, &ticket.reservation) {
            Ok((next, summary)) => {
                self.commit(next)?;
                self.generation.succeed(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!("Generation could not be placed: {}", e);
                self.generation.fail(&e);
                Err(e.into())
            }
        }
    }

    /// Begin, wait, and finish one generation
    pub async fn generate(&mut self, request: GenerateRequest) -> Result<GenerationSummary> {
        let ticket = self.begin_generation(request)?;
        ticket.ready().await;
        self.finish_generation(ticket)
    }

    /// Swap in a new store and save it if the groups changed
    fn commit(&mut self, next: Store) -> Result<()> {
        let changed = next.group_map() != self.store.group_map();
        self.store = next;
        if changed {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let json = self.store.to_json()?;
        self.storage.set(&self.key, &json)
    }
}

impl<S: Storage> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("groups", &self.store.group_map().len())
            .field("next_group_id", &self.store.next_group_id())
            .field("next_card_id", &self.store.next_card_id())
            .field("generation", &self.generation.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, GenerateTarget, MemoryStorage, storage::DEFAULT_STORAGE_KEY};

    fn session() -> Session<MemoryStorage> {
        Session::open(
            MemoryStorage::new(),
            DEFAULT_STORAGE_KEY,
            &SeedData::bundled().unwrap(),
        )
        .unwrap()
    }

    fn saved(session: &Session<MemoryStorage>) -> String {
        session.storage().get(DEFAULT_STORAGE_KEY).unwrap().unwrap()
    }

    #[test]
    fn test_open_writes_seed() {
        let session = session();
        assert_eq!(saved(&session), session.store().to_json().unwrap());
    }

    #[test]
    fn test_open_prefers_saved_data() {
        let storage = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "{}");
        let session =
            Session::open(storage, DEFAULT_STORAGE_KEY, &SeedData::bundled().unwrap()).unwrap();
        assert!(session.store().is_empty());
        assert_eq!(saved(&session), "{}");
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut session = session();
        let id = session.create_group("Vocab").unwrap();
        assert!(saved(&session).contains("Vocab"));

        session.delete_group(id).unwrap();
        assert!(!saved(&session).contains("Vocab"));
    }

    #[test]
    fn test_validation_error_leaves_store_unchanged() {
        let mut session = session();
        let before = session.store().clone();
        let err = session.create_group("  ").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyGroupName)));
        assert_eq!(session.store(), &before);
    }

    #[test]
    fn test_begin_generation_reports_validation_error() {
        let mut session = session();
        let request = GenerateRequest::new("", 3);
        assert!(session.begin_generation(request).is_err());
        assert_eq!(session.generation().status, GenerationStatus::Error);
        assert_eq!(
            session.generation().error.as_deref(),
            Some("Enter a topic to generate cards")
        );
    }

    #[test]
    fn test_overlapping_tickets_get_disjoint_ids() {
        let mut session = session();
        let first = session.begin_generation(GenerateRequest::new("A", 3)).unwrap();
        let second = session.begin_generation(GenerateRequest::new("B", 2)).unwrap();
        assert_eq!(session.generation().pending, 2);
        assert_eq!(session.generation().status, GenerationStatus::Generating);

        assert_eq!(first.reservation().first_card_id, 203);
        assert_eq!(second.reservation().first_card_id, 206);
        assert_eq!(first.reservation().group_id, Some(3));
        assert_eq!(second.reservation().group_id, Some(4));

        // Finish out of order
        session.finish_generation(second).unwrap();
        assert_eq!(session.generation().status, GenerationStatus::Generating);
        session.finish_generation(first).unwrap();
        assert_eq!(session.generation().status, GenerationStatus::Success);

        let store = session.store();
        assert_eq!(store.group(3).unwrap().cards[0].id, 203);
        assert_eq!(store.group(4).unwrap().cards[0].id, 206);
        assert_eq!(store.next_card_id(), 208);
    }

    #[test]
    fn test_finish_after_target_deleted() {
        let mut session = session();
        let request =
            GenerateRequest::new("Rust", 2).with_target(GenerateTarget::Existing(Some(1)));
        let ticket = session.begin_generation(request).unwrap();
        session.delete_group(1).unwrap();
        let before = session.store().clone();

        let err = session.finish_generation(ticket).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::TargetNotFound(1))
        ));
        assert_eq!(session.store(), &before);
        assert_eq!(session.generation().status, GenerationStatus::Error);
        assert_eq!(session.generation().pending, 0);
    }
}
