//! AI enrichment of fairs and meetings.
//!
//! Both operations are thin: shape a prompt, call the backend, do minimal
//! post-processing. Failure policy belongs to the caller (see
//! [`crate::controller`]).

mod gemini;
pub mod prompts;

use async_trait::async_trait;

use crate::error::FairDeskResult;
use crate::fair::{FairEnrichment, PrepResult};

pub use gemini::GeminiClient;

/// Backend that produces fair descriptions and meeting briefs.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Web-grounded description of the named fair, with its citations.
    async fn enrich_fair(&self, name: &str) -> FairDeskResult<FairEnrichment>;

    /// Summary and suggested questions for a meeting described by `details`.
    async fn prepare_meeting_brief(&self, details: &str) -> FairDeskResult<PrepResult>;
}
