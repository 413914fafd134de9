//! Global fairdesk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{FairDeskError, FairDeskResult};

static DEFAULT_DATA_PATH: &str = "~/.fairdesk";
static DEFAULT_MODEL: &str = "gemini-3-flash-preview";
static DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fallback variable for the API key when neither config.toml nor
/// `FAIRDESK_API_KEY` provides one.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Configuration at ~/.config/fairdesk/config.toml, overridable with
/// `FAIRDESK_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FairDeskConfig {
    #[serde(default = "default_data_path")]
    pub data_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request bound on backend calls. Unset means the backend decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for FairDeskConfig {
    fn default() -> Self {
        FairDeskConfig {
            data_dir: default_data_path(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl FairDeskConfig {
    pub fn config_path() -> FairDeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FairDeskError::Config("Could not determine config directory".into()))?
            .join("fairdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented-out default file first
    /// if none exists.
    pub fn load() -> FairDeskResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file, layering environment overrides on top.
    pub fn load_from(path: &Path) -> FairDeskResult<Self> {
        Self::load_layered(path, None, std::env::var(API_KEY_ENV).ok())
    }

    /// `env` replaces the process environment when given; `fallback_key` is
    /// used only if neither layer sets an API key.
    fn load_layered(
        path: &Path,
        env: Option<Map<String, String>>,
        fallback_key: Option<String>,
    ) -> FairDeskResult<Self> {
        let mut config: FairDeskConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("FAIRDESK").source(env))
            .build()
            .map_err(|e| FairDeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FairDeskError::Config(e.to_string()))?;

        if config.api_key.as_deref().is_none_or(str::is_empty) {
            config.api_key = fallback_key.filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Effective settings as TOML, with the API key masked.
    pub fn to_display_toml(&self) -> FairDeskResult<String> {
        let mut shown = self.clone();
        shown.api_key = self.api_key.as_deref().map(mask_key);
        toml::to_string_pretty(&shown).map_err(|e| FairDeskError::Serialization(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> FairDeskResult<()> {
        let contents = format!(
            "\
# fairdesk configuration

# Where fairs and meetings are stored:
# data_dir = \"{}\"

# Gemini API key (GEMINI_API_KEY is used when unset):
# api_key = \"...\"

# Model used for enrichment and meeting prep:
# model = \"{}\"

# API endpoint:
# base_url = \"{}\"

# Give up on a backend call after this many seconds (no limit by default):
# request_timeout_secs = 60
",
            DEFAULT_DATA_PATH, DEFAULT_MODEL, DEFAULT_BASE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FairDeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| FairDeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    let visible: String = key.chars().skip(len.saturating_sub(4)).collect();
    format!("****{}", visible)
}
