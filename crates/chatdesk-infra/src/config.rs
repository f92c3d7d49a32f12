//! Application configuration loader for chatdesk.
//!
//! Reads `config.toml` from the data directory (`~/.chatdesk/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the file
//! is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use chatdesk_types::config::CompletionSettings;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::sqlite::pool::database_url;

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Resolved application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Exposes diagnostics (e.g. `debug_info` on the chat home).
    #[serde(default)]
    pub debug: bool,

    /// SQLite file name inside the data directory.
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Where uploaded avatars are stored. Defaults to `{data_dir}/media`.
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    /// Static web bundle served for non-API paths, if any.
    #[serde(default)]
    pub web_dir: Option<PathBuf>,

    /// Externally visible base URL, used in emailed links.
    #[serde(default)]
    pub public_url: Option<String>,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub completion: CompletionSettings,

    /// DeepSeek API key. Prefer the `DEEPSEEK_API_KEY` environment variable.
    #[serde(default, rename = "deepseek_api_key", deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,

    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            db_name: default_db_name(),
            media_dir: None,
            web_dir: None,
            public_url: None,
            mail_from: default_mail_from(),
            server: ServerSettings::default(),
            completion: CompletionSettings::default(),
            api_key: None,
            data_dir: PathBuf::new(),
        }
    }
}

fn default_db_name() -> String {
    "db.sqlite3".to_string()
}

fn default_mail_from() -> String {
    "noreply@chatdesk.local".to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .map(SecretString::from))
}

impl AppConfig {
    /// Directory holding uploaded media.
    pub fn media_dir(&self) -> PathBuf {
        self.media_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("media"))
    }

    /// sqlx URL of the database file.
    pub fn database_url(&self) -> String {
        database_url(&self.data_dir, &self.db_name)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Recognized: `DEEPSEEK_API_KEY`, `DEEPSEEK_API_BASE`, `DEBUG`, `DB_NAME`,
    /// `CHATDESK_MEDIA_DIR`, `CHATDESK_WEB_DIR`, `CHATDESK_PUBLIC_URL`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("DEEPSEEK_API_KEY") {
            self.api_key = Some(SecretString::from(key.trim().to_string()));
        }
        if let Some(base) = non_empty("DEEPSEEK_API_BASE") {
            self.completion.api_base_url = base;
        }
        if let Some(flag) = non_empty("DEBUG") {
            self.debug = parse_flag(&flag);
        }
        if let Some(name) = non_empty("DB_NAME") {
            self.db_name = name;
        }
        if let Some(dir) = non_empty("CHATDESK_MEDIA_DIR") {
            self.media_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = non_empty("CHATDESK_WEB_DIR") {
            self.web_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = non_empty("CHATDESK_PUBLIC_URL") {
            self.public_url = Some(url);
        }
    }
}

/// `true`, `1`, `yes` and `on` (any case) are truthy; everything else is false.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Load configuration from `{data_dir}/config.toml` plus the process environment.
///
/// - If the file does not exist, starts from [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and starts from the default.
/// - Environment overrides are applied last.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let mut config = read_config_file(data_dir).await;
    config.apply_env(|key| std::env::var(key).ok());
    config
}

async fn read_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig {
                data_dir: data_dir.to_path_buf(),
                ..AppConfig::default()
            };
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig {
                data_dir: data_dir.to_path_buf(),
                ..AppConfig::default()
            };
        }
    };

    let mut config = match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    };
    config.data_dir = data_dir.to_path_buf();
    config
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATDESK_DATA_DIR` environment variable
/// 2. `~/.chatdesk`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATDESK_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatdesk");
    }

    // Last resort: current directory
    PathBuf::from(".chatdesk")
}
