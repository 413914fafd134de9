//! Error types for fairdesk.

use thiserror::Error;

/// Errors that can occur in fairdesk operations.
#[derive(Error, Debug)]
pub enum FairDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fair not found: {0}")]
    FairNotFound(String),

    #[error("Meeting not found: {0}")]
    MeetingNotFound(String),

    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error("No Gemini API key configured (set api_key in config.toml or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FairDeskError {
    fn from(e: reqwest::Error) -> Self {
        FairDeskError::Enrichment(e.to_string())
    }
}

/// Result type alias for fairdesk operations.
pub type FairDeskResult<T> = Result<T, FairDeskError>;
