pub mod add;
pub mod config;
pub mod list;
pub mod meet;
pub mod prep;
pub mod show;
pub mod status;

use anyhow::Result;
use fairdesk_core::config::FairDeskConfig;
use fairdesk_core::enrich::GeminiClient;
use fairdesk_core::store::{FairStore, FileStore};
use fairdesk_core::{Controller, Meeting, TradeFair};
use owo_colors::OwoColorize;

/// A controller wired to the on-disk store and the Gemini backend.
pub struct Session {
    pub controller: Controller,
    pub config: FairDeskConfig,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = FairDeskConfig::load()?;
        let data_path = config.data_path();
        tracing::debug!(
            data_dir = %data_path.display(),
            model = %config.model,
            "Opening session"
        );
        let store = FairStore::new(FileStore::new(data_path));
        let enricher = GeminiClient::from_config(&config)?;

        Ok(Session {
            controller: Controller::new(store, enricher),
            config,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Hint shown when AI features ran without credentials.
    pub fn print_api_key_hint(&self) {
        if !self.has_api_key() {
            println!(
                "{}",
                "   No Gemini API key configured. Set GEMINI_API_KEY or api_key in the config file."
                    .dimmed()
            );
        }
    }

    /// Find a fair by exact id, unique id prefix, or case-insensitive name.
    pub fn resolve_fair(&self, query: &str) -> Result<TradeFair> {
        let fairs = self.controller.fairs();

        if let Some(fair) = fairs.iter().find(|f| f.id == query) {
            return Ok(fair.clone());
        }

        let by_name: Vec<_> = fairs
            .iter()
            .filter(|f| f.name.eq_ignore_ascii_case(query))
            .collect();
        if let [fair] = by_name.as_slice() {
            return Ok((*fair).clone());
        }

        let by_prefix: Vec<_> = fairs.iter().filter(|f| f.id.starts_with(query)).collect();
        match (by_name.len(), by_prefix.as_slice()) {
            (0, [fair]) => Ok((*fair).clone()),
            (0, []) => {
                let available: Vec<_> = fairs.iter().map(|f| f.name.as_str()).collect();
                anyhow::bail!(
                    "Fair '{}' not found. Available: {}",
                    query,
                    if available.is_empty() { "(none)".to_string() } else { available.join(", ") }
                )
            }
            _ => anyhow::bail!("'{}' matches more than one fair. Use its id instead.", query),
        }
    }

    /// Find a meeting by exact id or unique id prefix.
    pub fn resolve_meeting(&self, query: &str) -> Result<Meeting> {
        if let Some(meeting) = self.controller.find_meeting(query) {
            return Ok(meeting);
        }

        let matches: Vec<Meeting> = self
            .controller
            .fairs()
            .into_iter()
            .flat_map(|f| f.meetings)
            .filter(|m| m.id.starts_with(query))
            .collect();

        match matches.as_slice() {
            [meeting] => Ok(meeting.clone()),
            [] => anyhow::bail!(
                "Meeting '{}' not found. See `fairdesk show <fair>` for ids.",
                query
            ),
            _ => anyhow::bail!("'{}' matches more than one meeting. Use a longer id.", query),
        }
    }
}
