use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CarelogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub tools: ToolsConfig,
    pub google: GoogleConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ToolsConfig {
    /// Window for the duplicate-note guard. `0` disables the guard.
    pub duplicate_window_minutes: u32,
    pub default_since_days: u32,
    pub stream_echo_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub gmail_api_base: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub max_age_days: u32,
    pub secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_carelog_dir()
            .join("carelog.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            duplicate_window_minutes: 10,
            default_since_days: 7,
            stream_echo_delay_ms: 500,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:3000/api/google/oauth/callback".into(),
            scopes: vec!["https://www.googleapis.com/auth/gmail.readonly".into()],
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            gmail_api_base: "https://gmail.googleapis.com/gmail/v1".into(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: "gmail_tokens".into(),
            max_age_days: 30,
            secure: true,
        }
    }
}

/// Returns `~/.carelog/`
pub fn default_carelog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".carelog")
}

/// Returns the default config file path: `~/.carelog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_carelog_dir().join("config.toml")
}

impl CarelogConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CarelogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// `CARELOG_*` covers local settings; the Google and session variables keep
    /// the names the deployed site already uses.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CARELOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CARELOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("CARELOG_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid CARELOG_PORT"),
            }
        }
        if let Ok(val) = std::env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = val;
        }
        if let Ok(val) = std::env::var("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = val;
        }
        if let Ok(val) = std::env::var("GOOGLE_REDIRECT_URI") {
            self.google.redirect_uri = val;
        }
        if let Ok(val) = std::env::var("SESSION_SECRET") {
            self.session.secret = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Bind address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SessionConfig {
    pub fn max_age_secs(&self) -> u64 {
        u64::from(self.max_age_days) * 24 * 60 * 60
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
