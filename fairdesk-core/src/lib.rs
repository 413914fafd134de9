//! Core of the fairdesk trade-fair planner.
//!
//! - `fair`: fairs, meetings and prep results
//! - `store`: persistence of the fair collection in a key-value slot
//! - `enrich`: AI enrichment backend (Gemini)
//! - `controller`: application state and its operations
//! - `config`: global configuration

pub mod config;
pub mod controller;
pub mod enrich;
pub mod error;
pub mod fair;
pub mod store;

pub use controller::Controller;
pub use error::{FairDeskError, FairDeskResult};
pub use fair::{FairEnrichment, GroundingSource, Meeting, MeetingStatus, PrepResult, TradeFair};
