//! flash-core: Core library for the flash flashcard tool
//!
//! Provides the card/group model, the seed reconciler, the store mutations,
//! the template card generator, and key-value persistence. No database,
//! no server - one JSON blob under one key.

pub mod card;
pub mod config;
pub mod error;
pub mod gateway;
pub mod generator;
pub mod reconcile;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod study;

pub use card::{Card, Group, GroupMap};
pub use config::Config;
pub use error::{Error, ValidationError};
pub use gateway::{
    GenerateRequest, GenerateTarget, GenerationSummary, MAX_GENERATED_CARDS, NewCard, Reservation,
};
pub use reconcile::reconcile;
pub use seed::SeedData;
pub use session::{GenerationState, GenerationStatus, GenerationTicket, Session};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::Store;
pub use study::{GroupStats, Recall, StudyCursor};

/// Result type for flash operations
pub type Result<T> = std::result::Result<T, Error>;
