//! Server configuration loading from file and environment variables.

use escola_db::DbSettings;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the credentials file.
pub const DEFAULT_CRED_PATH: &str = ".cred";

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// Create missing tables at startup. Off by default: the schema is
    /// expected to exist already.
    #[serde(default)]
    pub bootstrap_schema: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "escola_db=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "db_escola.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
            bootstrap_schema: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Gateway settings derived from this section.
    pub fn settings(&self) -> DbSettings {
        DbSettings {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The credentials file exists but could not be loaded.
    #[error("failed to load credentials file {path}: {source}")]
    Credentials {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

/// Keys the credentials file may carry for a networked store. They have no
/// meaning for a file store and are only reported.
pub const NETWORK_ONLY_KEYS: [&str; 5] =
    ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "SSL_CA_PATH"];

/// `KEY=value` pairs read from a credentials file.
///
/// The pairs are kept in memory and consulted after the process environment,
/// so a variable set in the environment always wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    vars: HashMap<String, String>,
}

impl Credentials {
    /// Reads a credentials file. Returns `Ok(None)` when the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Credentials` if the file exists but is unreadable
    /// or malformed.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let to_error = |source| ConfigError::Credentials {
            path: path.to_path_buf(),
            source,
        };

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(source) => return Err(to_error(source)),
        };

        let vars = iter
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(to_error)?;
        tracing::debug!(path = %path.display(), count = vars.len(), "read credentials file");

        Ok(Some(Self { vars }))
    }

    /// Value of `key` in the file, if present.
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Value of `key` from the process environment, falling back to the file.
    pub fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().or_else(|| self.get(key))
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Overrides are read from the process environment first and the credentials
/// file second:
/// - `ESCOLA_HOST` overrides `server.host`
/// - `ESCOLA_PORT` overrides `server.port`
/// - `DB_NAME` sets `database.path` to `<DB_NAME>.db`
/// - `ESCOLA_DB_PATH` overrides `database.path` (wins over `DB_NAME`)
/// - `ESCOLA_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `ESCOLA_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `ESCOLA_DB_BOOTSTRAP_SCHEMA` overrides `database.bootstrap_schema`
/// - `ESCOLA_LOG_LEVEL` overrides `logging.level`
/// - `ESCOLA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(
    path: Option<&str>,
    credentials: &Credentials,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| credentials.lookup(key));

    Ok(config)
}

/// Applies `DB_NAME` and `ESCOLA_*` overrides using `lookup` to read variables.
///
/// Values that fail to parse are ignored and the previous setting is kept.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(parsed) = lookup("ESCOLA_HOST").and_then(|v| v.parse().ok()) {
        config.server.host = parsed;
    }
    if let Some(parsed) = lookup("ESCOLA_PORT").and_then(|v| v.parse().ok()) {
        config.server.port = parsed;
    }
    if let Some(name) = lookup("DB_NAME").filter(|v| !v.trim().is_empty()) {
        config.database.path = format!("{}.db", name.trim());
    }
    if let Some(db_path) = lookup("ESCOLA_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(parsed) = lookup("ESCOLA_DB_BUSY_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.database.busy_timeout_ms = parsed;
    }
    if let Some(parsed) = lookup("ESCOLA_DB_POOL_MAX_SIZE").and_then(|v| v.parse().ok()) {
        config.database.pool_max_size = parsed;
    }
    if let Some(flag) = lookup("ESCOLA_DB_BOOTSTRAP_SCHEMA") {
        config.database.bootstrap_schema = is_truthy(&flag);
    }
    if let Some(level) = lookup("ESCOLA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("ESCOLA_LOG_JSON") {
        config.logging.json = is_truthy(&json);
    }
}

/// Network-only store keys that are set, in `NETWORK_ONLY_KEYS` order.
pub fn ignored_network_keys<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    NETWORK_ONLY_KEYS
        .into_iter()
        .filter(|key| lookup(*key).is_some())
        .collect()
}

fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}
