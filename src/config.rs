//! Runtime configuration loaded from environment variables

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::registry::{self, FieldDef, FieldRegistry};
use crate::report::DEFAULT_TITLE;
use crate::source::DEFAULT_USER_AGENT;

pub const DEFAULT_URL: &str = "https://www.goldtraders.or.th";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_URL: &str = "GOLDPRICE_URL";
const ENV_FORMAT: &str = "GOLDPRICE_FORMAT";
const ENV_TIMEOUT: &str = "GOLDPRICE_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "GOLDPRICE_USER_AGENT";
const ENV_FIELDS: &str = "GOLDPRICE_FIELDS";
const ENV_TITLE: &str = "GOLDPRICE_TITLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    /// Report format name, validated when rendering
    pub format: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// JSON file with field definitions; built-in gold fields when unset
    pub fields_file: Option<PathBuf>,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            format: "plain".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fields_file: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::Env {
                    key: ".env".to_string(),
                    reason: e.to_string(),
                })
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            config.url = url;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = format;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::Env {
                key: ENV_TIMEOUT.to_string(),
                reason: format!("{e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(path) = lookup(ENV_FIELDS).filter(|p| !p.trim().is_empty()) {
            config.fields_file = Some(PathBuf::from(path));
        }
        if let Some(title) = lookup(ENV_TITLE) {
            if title.contains(['\n', '\r']) {
                return Err(ConfigError::Env {
                    key: ENV_TITLE.to_string(),
                    reason: "title must be a single line".to_string(),
                });
            }
            config.title = title;
        }

        Ok(config)
    }

    /// The configured field registry.
    pub fn registry(&self) -> Result<FieldRegistry, ConfigError> {
        let Some(path) = &self.fields_file else {
            return Ok(registry::gold_prices()?);
        };

        info!(path = %path.display(), "loading field definitions");
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FieldsFile {
            path: path.clone(),
            source: Box::new(e),
        })?;
        let defs: Vec<FieldDef> = serde_json::from_str(&raw).map_err(|e| ConfigError::FieldsFile {
            path: path.clone(),
            source: Box::new(e),
        })?;

        Ok(FieldRegistry::from_defs(&defs)?)
    }
}
