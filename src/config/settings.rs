//! TOML-based configuration for Sluice.
//!
//! Supports a config file (sluice.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [table]
//! catalog = "main"
//! schema = "retail_gold"
//! name = "vw_sales_daily"
//!
//! [bounds]
//! min_date = "2021-01-03"
//! max_date = "2024-12-30"
//!
//! [provider]
//! kind = "conversation"
//!
//! [provider.conversation]
//! host = "${DATABRICKS_HOST}"
//! token = "${DATABRICKS_TOKEN}"
//! space_id = "${GENIE_SPACE_ID}"
//! max_polls = 3
//! poll_interval_secs = 3
//! ```

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use super::table::TableIdent;
use crate::bounds::DateBounds;

/// Matches `${VAR}` and `$VAR` references.
static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").unwrap());

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid table identifier '{0}': expected catalog.schema.table")]
    InvalidTable(String),

    #[error("Unknown provider: {0}. Supported: rules, conversation")]
    UnknownProvider(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Target fact table.
    pub table: TableSettings,

    /// Static dataset date bounds, if known up front.
    pub bounds: Option<BoundsSettings>,

    /// Which backend turns questions into SQL.
    pub provider: ProviderSettings,
}

/// Target table configuration.
///
/// The `CATALOG`, `SCHEMA` and `TABLE` environment variables override the
/// file values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TableSettings {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            catalog: "main".to_string(),
            schema: "retail_gold".to_string(),
            name: "vw_sales_daily".to_string(),
        }
    }
}

impl TableSettings {
    /// Resolve the table identifier, applying environment overrides.
    pub fn resolve(&self) -> Result<TableIdent, SettingsError> {
        let pick = |var: &str, configured: &str| -> Result<String, SettingsError> {
            match env::var(var) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => expand_env_vars(configured),
            }
        };
        TableIdent::new(
            &pick("CATALOG", &self.catalog)?,
            &pick("SCHEMA", &self.schema)?,
            &pick("TABLE", &self.name)?,
        )
    }
}

/// Static dataset bounds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BoundsSettings {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl BoundsSettings {
    pub fn to_bounds(self) -> Result<DateBounds, SettingsError> {
        DateBounds::new(self.min_date, self.max_date)
            .map_err(|e| SettingsError::InvalidConfig(e.to_string()))
    }
}

/// Provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local rule-based translator.
    #[default]
    Rules,
    /// Remote conversational query service.
    Conversation,
}

impl FromStr for ProviderKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" => Ok(ProviderKind::Rules),
            "conversation" | "genie" => Ok(ProviderKind::Conversation),
            other => Err(SettingsError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Rules => "rules",
            ProviderKind::Conversation => "conversation",
        })
    }
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub conversation: ConversationSettings,
}

/// Remote conversational service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// Workspace base URL (supports ${ENV_VAR} expansion).
    pub host: String,

    /// Bearer token (supports ${ENV_VAR} expansion).
    pub token: String,

    /// Conversation space identifier (supports ${ENV_VAR} expansion).
    pub space_id: String,

    /// Number of status polls before giving up.
    pub max_polls: u32,

    /// Delay between polls.
    pub poll_interval_secs: u64,

    /// Per-request timeout.
    pub request_timeout_secs: u64,

    /// Catalog hinted to the service.
    pub hint_catalog: String,

    /// Schemas hinted to the service.
    pub hint_schemas: Vec<String>,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            host: "${DATABRICKS_HOST}".to_string(),
            token: "${DATABRICKS_TOKEN}".to_string(),
            space_id: "${GENIE_SPACE_ID}".to_string(),
            max_polls: 3,
            poll_interval_secs: 3,
            request_timeout_secs: 30,
            hint_catalog: "main".to_string(),
            hint_schemas: vec!["retail_gold".to_string()],
        }
    }
}

impl ConversationSettings {
    /// Base URL with env vars expanded, always ending in `/`.
    pub fn resolved_host(&self) -> Result<String, SettingsError> {
        let mut host = expand_env_vars(&self.host)?;
        if host.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "provider.conversation.host is empty".to_string(),
            ));
        }
        if !host.ends_with('/') {
            host.push('/');
        }
        Ok(host)
    }

    pub fn resolved_token(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.token)
    }

    pub fn resolved_space_id(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.space_id)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SLUICE_CONFIG`
    /// 2. `./sluice.toml`
    /// 3. `~/.config/sluice/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SLUICE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sluice.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sluice").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Configured static bounds, if any.
    pub fn date_bounds(&self) -> Result<Option<DateBounds>, SettingsError> {
        self.bounds.map(BoundsSettings::to_bounds).transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut missing = None;
    let expanded = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(SettingsError::MissingEnvVar(name)),
        None => Ok(expanded.into_owned()),
    }
}
