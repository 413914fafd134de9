//! Trade fair and meeting types.
//!
//! Field names serialize as camelCase so the persisted blob stays readable
//! by the browser build, which stores the same shape under `fairs_data`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FairDeskError;

/// Date placeholder for a fair whose enrichment succeeded.
pub const DATE_PENDING: &str = "Processing…";
/// Location placeholder for a fair whose enrichment succeeded.
pub const LOCATION_PENDING: &str = "Querying…";
/// Date and location placeholder when enrichment failed.
pub const TO_BE_DETERMINED: &str = "TBD";

pub const DEFAULT_COMPANY: &str = "Unknown Company";
pub const DEFAULT_MEETING_TIME: &str = "14:00";
pub const DEFAULT_MEETING_LOCATION: &str = "Hall 4 - Stand B20";
pub const DEFAULT_PREVIOUS_TALKS: &str = "Initial LinkedIn exchange about distribution in Spain.";
pub const DEFAULT_GOALS: &str = "Close an exclusive distribution agreement.";

/// A trade-show event the user plans to attend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFair {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_sources: Option<Vec<GroundingSource>>,
}

impl TradeFair {
    /// Fair built from a successful enrichment.
    pub fn enriched(name: &str, enrichment: FairEnrichment) -> Self {
        TradeFair {
            id: new_fair_id(),
            name: name.to_string(),
            url: String::new(),
            date: DATE_PENDING.to_string(),
            location: LOCATION_PENDING.to_string(),
            description: enrichment.description,
            meetings: Vec::new(),
            grounding_sources: Some(enrichment.sources),
        }
    }

    /// Degraded fair used when enrichment failed. Still a valid record.
    pub fn fallback(name: &str) -> Self {
        TradeFair {
            id: new_fair_id(),
            name: name.to_string(),
            url: String::new(),
            date: TO_BE_DETERMINED.to_string(),
            location: TO_BE_DETERMINED.to_string(),
            description: String::new(),
            meetings: Vec::new(),
            grounding_sources: None,
        }
    }

    pub fn sources(&self) -> &[GroundingSource] {
        self.grounding_sources.as_deref().unwrap_or(&[])
    }

    pub fn meeting(&self, meeting_id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == meeting_id)
    }
}

impl fmt::Display for TradeFair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A web citation returned alongside a search-grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// A scheduled in-person contact at a fair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    /// Lookup key of the owning fair
    pub fair_id: String,
    pub contact_name: String,
    pub company: String,
    pub time: String,
    pub location: String,
    pub previous_talks: String,
    pub goals: String,
    #[serde(default)]
    pub status: MeetingStatus,
    /// Present in the stored shape but never written; prep results stay transient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<String>,
}

impl Meeting {
    /// New scheduled meeting with the fixed defaults.
    ///
    /// A missing or blank company falls back to [`DEFAULT_COMPANY`].
    pub fn new(fair_id: &str, contact_name: &str, company: Option<&str>) -> Self {
        let company = company
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COMPANY);

        Meeting {
            id: new_meeting_id(),
            fair_id: fair_id.to_string(),
            contact_name: contact_name.to_string(),
            company: company.to_string(),
            time: DEFAULT_MEETING_TIME.to_string(),
            location: DEFAULT_MEETING_LOCATION.to_string(),
            previous_talks: DEFAULT_PREVIOUS_TALKS.to_string(),
            goals: DEFAULT_GOALS.to_string(),
            status: MeetingStatus::Scheduled,
            ai_insights: None,
        }
    }

    /// One-line brief of contact, company, history and goal, as sent to the
    /// prep backend.
    pub fn prep_details(&self) -> String {
        format!(
            "Contact: {}, Company: {}. History: {}. Goal: {}",
            self.contact_name, self.company, self.previous_talks, self.goals
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MeetingStatus {
    type Err = FairDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(MeetingStatus::Scheduled),
            "completed" | "done" => Ok(MeetingStatus::Completed),
            "cancelled" | "canceled" => Ok(MeetingStatus::Cancelled),
            other => Err(FairDeskError::InvalidInput(format!(
                "Unknown meeting status '{}' (expected scheduled, completed or cancelled)",
                other
            ))),
        }
    }
}

/// What a fair enrichment call yields: the backend's free-text answer and its citations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FairEnrichment {
    pub description: String,
    pub sources: Vec<GroundingSource>,
}

/// Transient AI meeting brief. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepResult {
    pub summary: String,
    pub suggested_questions: Vec<String>,
}

fn new_fair_id() -> String {
    format!("fair-{}", uuid::Uuid::new_v4())
}

fn new_meeting_id() -> String {
    format!("mtg-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_defaults() {
        let meeting = Meeting::new("fair-1", "Jane Doe", Some("Acme Corp"));
        assert!(meeting.id.starts_with("mtg-"));
        assert_eq!(meeting.fair_id, "fair-1");
        assert_eq!(meeting.company, "Acme Corp");
        assert_eq!(meeting.time, DEFAULT_MEETING_TIME);
        assert_eq!(meeting.location, DEFAULT_MEETING_LOCATION);
        assert_eq!(meeting.goals, DEFAULT_GOALS);
        assert_eq!(meeting.status, MeetingStatus::Scheduled);
    }

    #[test]
    fn test_meeting_blank_company_uses_placeholder() {
        assert_eq!(Meeting::new("f", "Jane", None).company, DEFAULT_COMPANY);
        assert_eq!(Meeting::new("f", "Jane", Some("   ")).company, DEFAULT_COMPANY);
    }

    #[test]
    fn test_prep_details_format() {
        let meeting = Meeting::new("f", "Jane Doe", Some("Acme Corp"));
        assert_eq!(
            meeting.prep_details(),
            format!(
                "Contact: Jane Doe, Company: Acme Corp. History: {}. Goal: {}",
                DEFAULT_PREVIOUS_TALKS, DEFAULT_GOALS
            )
        );
    }

    #[test]
    fn test_fallback_fair() {
        let fair = TradeFair::fallback("Expo X");
        assert_eq!(fair.date, "TBD");
        assert_eq!(fair.location, "TBD");
        assert!(fair.description.is_empty());
        assert!(fair.grounding_sources.is_none());
        assert!(fair.sources().is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Completed".parse::<MeetingStatus>().unwrap(), MeetingStatus::Completed);
        assert_eq!("canceled".parse::<MeetingStatus>().unwrap(), MeetingStatus::Cancelled);
        assert!("postponed".parse::<MeetingStatus>().is_err());
    }

    #[test]
    fn test_reads_browser_blob_shape() {
        let json = r#"[{
            "id": "1718000000000",
            "name": "MWC Barcelona 2025",
            "url": "",
            "date": "Procesando...",
            "location": "Consultando...",
            "description": "MWC runs Feb 24-27.",
            "meetings": [{
                "id": "1718000000001",
                "fairId": "1718000000000",
                "contactName": "Jane Doe",
                "company": "Acme Corp",
                "time": "14:00 PM",
                "location": "Hall 4 - Stand B20",
                "previousTalks": "LinkedIn",
                "goals": "Distribution",
                "status": "Scheduled"
            }],
            "groundingSources": [{"title": "MWC", "uri": "https://www.mwcbarcelona.com"}]
        }]"#;

        let fairs: Vec<TradeFair> = serde_json::from_str(json).unwrap();
        assert_eq!(fairs.len(), 1);
        assert_eq!(fairs[0].meetings[0].fair_id, "1718000000000");
        assert_eq!(fairs[0].meetings[0].status, MeetingStatus::Scheduled);
        assert_eq!(fairs[0].sources().len(), 1);
    }

    #[test]
    fn test_absent_sources_not_serialized() {
        let fair = TradeFair::fallback("Expo X");
        let value = serde_json::to_value(&fair).unwrap();
        assert!(value.get("groundingSources").is_none());
        assert_eq!(value["meetings"], serde_json::json!([]));
    }
}
