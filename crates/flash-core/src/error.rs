//! Error types for flash

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Rejected user input.
///
/// Returned to the caller as a message; the store is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Group name must not be empty")]
    EmptyGroupName,

    #[error("Question, answer and category are all required to add a card")]
    MissingCardFields,

    #[error("Group not found: {0}")]
    GroupNotFound(u64),

    #[error("Enter a topic to generate cards")]
    EmptyTopic,

    #[error("Choose a group to add the generated cards to")]
    MissingTarget,

    #[error("The selected group could not be found: {0}")]
    TargetNotFound(u64),

    #[error("Generate at most {max} cards at a time (asked for {count})")]
    TooManyCards { count: usize, max: usize },

    #[error("No free ids left for new groups or cards")]
    IdsExhausted,
}
