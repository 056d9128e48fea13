//! Convene Configuration
//!
//! Configuration is read from an optional TOML file and then overridden by
//! `CV_*` environment variables.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CV_CONFIG` | `convene.toml` | Path to the TOML file (optional) |
//! | `CV_HOST` | `0.0.0.0` | HTTP bind address |
//! | `CV_PORT` | `8080` | HTTP port |
//! | `CV_DATABASE_URL` | `sqlite://convene.db` | SQLite database URL |
//! | `CV_DB_MAX_CONNECTIONS` | `5` | Pool size |
//! | `CV_DB_TIMEOUT_MS` | `3000` | Per-call store timeout |
//! | `CV_JWT_SECRET` | - | HS256 signing secret (required outside dev mode) |
//! | `CV_JWT_ISSUER` | `convene` | `iss` claim |
//! | `CV_TOKEN_TTL_HOURS` | `72` | Session token lifetime |
//! | `CV_CASE_INSENSITIVE_EMAIL` | `false` | Lowercase emails at the API edge |
//! | `CV_LOG_FORMAT` | `pretty` | `pretty` or `json` |
//! | `CV_DEV_MODE` | `false` | Allow the built-in development secret |

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cv_common::LogFormat;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Secret used when `dev_mode` is on and no secret was configured.
pub const DEV_JWT_SECRET: &str = "convene-development-secret-do-not-use-in-production";

/// Minimum secret length accepted outside dev mode.
pub const MIN_SECRET_LEN: usize = 32;

/// One year
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

const DEFAULT_CONFIG_FILE: &str = "convene.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthSettings,
    pub logging: LoggingConfig,
    pub dev_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://convene.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    /// Upper bound for any single store call
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://convene.db".to_string(),
            max_connections: 5,
            timeout_ms: 3000,
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl_hours: u64,
    /// Lowercase emails in register/login before they reach the core
    pub case_insensitive_email: bool,
    pub argon2: Argon2Settings,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "convene".to_string(),
            token_ttl_hours: 72,
            case_insensitive_email: false,
            argon2: Argon2Settings::default(),
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("case_insensitive_email", &self.case_insensitive_email)
            .field("argon2", &self.argon2)
            .finish()
    }
}

impl AuthSettings {
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl_hours
            .checked_mul(3600)
            .map_or(Duration::MAX, Duration::from_secs)
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    // OWASP baseline for Argon2id
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// Load from `CV_CONFIG` (or `convene.toml` if present), apply the
    /// environment and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CV_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `CV_*` overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CV_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("CV_PORT") {
            self.server.port = parse_env("CV_PORT", &v)?;
        }
        if let Some(v) = lookup("CV_DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("CV_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("CV_DB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("CV_DB_TIMEOUT_MS") {
            self.database.timeout_ms = parse_env("CV_DB_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("CV_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = lookup("CV_JWT_ISSUER") {
            self.auth.issuer = v;
        }
        if let Some(v) = lookup("CV_TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = parse_env("CV_TOKEN_TTL_HOURS", &v)?;
        }
        if let Some(v) = lookup("CV_CASE_INSENSITIVE_EMAIL") {
            self.auth.case_insensitive_email = parse_flag("CV_CASE_INSENSITIVE_EMAIL", &v)?;
        }
        if let Some(v) = lookup("CV_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&v).ok_or_else(|| ConfigError::InvalidEnv {
                key: "CV_LOG_FORMAT".to_string(),
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("CV_DEV_MODE") {
            self.dev_mode = parse_flag("CV_DEV_MODE", &v)?;
        }
        Ok(())
    }

    /// Check invariants; in dev mode an empty secret is replaced by
    /// [`DEV_JWT_SECRET`].
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            if !self.dev_mode {
                return Err(ConfigError::Invalid(
                    "auth.jwt_secret (CV_JWT_SECRET) is required".to_string(),
                ));
            }
            warn!("No JWT secret configured, using the development secret");
            self.auth.jwt_secret = DEV_JWT_SECRET.to_string();
        }

        if !self.dev_mode && self.auth.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.auth.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_hours must be positive".to_string()));
        }
        if self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_hours must be at most {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }
        if self.database.timeout_ms == 0 {
            return Err(ConfigError::Invalid("database.timeout_ms must be positive".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be positive".to_string(),
            ));
        }

        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
