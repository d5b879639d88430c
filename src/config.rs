//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::backend::HttpBackendConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local state: wizard progress and the server's entry snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Persist server-side entries to `entries.json` in `data_dir`
    #[serde(default = "default_snapshot_enabled")]
    pub snapshot_enabled: bool,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("moodwell").to_string_lossy().to_string())
        .unwrap_or_else(|| "./moodwell_data".to_string())
}

fn default_snapshot_enabled() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_enabled: default_snapshot_enabled(),
        }
    }
}

impl StorageConfig {
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }

    /// Snapshot file for the server's entry store, if enabled
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_enabled
            .then(|| self.data_path().join("entries.json"))
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_request_timeout() -> u64 {
    30
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the CLI sends history queries and new entries
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default = "default_backend_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_backend_timeout() -> u64 {
    5000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_ms: default_backend_timeout(),
        }
    }
}

impl From<&BackendConfig> for HttpBackendConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout_ms: config.request_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    crate::entries::DEFAULT_PAGE_SIZE
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// The signed-in user for CLI sessions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    pub id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("moodwell").join("config.toml")),
            Some(PathBuf::from("/etc/moodwell/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("MOODWELL_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(host) = var("MOODWELL_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("MOODWELL_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid MOODWELL_API_PORT: {}", port),
            }
        }

        if let Some(url) = var("MOODWELL_BACKEND_URL") {
            self.backend.base_url = url;
        }

        if let Some(id) = var("MOODWELL_USER_ID") {
            self.user.id = Some(id).filter(|id| !id.trim().is_empty());
        }

        if let Some(level) = var("MOODWELL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("MOODWELL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Moodwell Configuration
#
# Environment variables override these settings:
# - MOODWELL_DATA_DIR
# - MOODWELL_API_HOST
# - MOODWELL_API_PORT
# - MOODWELL_BACKEND_URL
# - MOODWELL_USER_ID
# - MOODWELL_LOG_LEVEL
# - MOODWELL_LOG_FORMAT

[storage]
# Directory for wizard progress and the server's entry snapshot
data_dir = "~/.local/share/moodwell"

# Persist server-side entries across restarts
snapshot_enabled = true

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins
cors_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

# Request timeout in seconds
request_timeout_secs = 30

[backend]
# Mood API used by the CLI
base_url = "http://localhost:8086"

# Per-request timeout (ms)
request_timeout_ms = 5000

[history]
# Entries fetched per history query
page_size = 50

[user]
# Signed-in user for CLI sessions
# id = "user-1"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
