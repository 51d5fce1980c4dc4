//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use jsonwebtoken::Algorithm;
use meter_core::TariffSchedule;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub tariff: TariffConfig,
    pub retry: RetryConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

/// Per-unit prices and the daily peak window
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TariffConfig {
    pub off_peak_price: f64,
    pub peak_price: f64,
    #[serde(default = "default_peak_start_hour")]
    pub peak_start_hour: u32,
    #[serde(default = "default_peak_end_hour")]
    pub peak_end_hour: u32,
}

impl TariffConfig {
    /// Build the validated tariff schedule
    ///
    /// # Errors
    /// Returns an error if a price is not positive or the window is inverted
    pub fn schedule(&self) -> Result<TariffSchedule, ConfigError> {
        TariffSchedule::with_peak_hours(
            self.off_peak_price,
            self.peak_price,
            self.peak_start_hour,
            self.peak_end_hour,
        )
        .map_err(|e| ConfigError::InvalidValue("TARIFF", e.to_string()))
    }
}

/// Retry policy for storage transaction conflicts
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl RetryConfig {
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Administrator created at start-up when its email is not yet registered
#[derive(Clone, Deserialize)]
pub struct BootstrapAdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// Default value functions
fn default_app_name() -> String {
    "smart-meter".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_expiry() -> i64 {
    1800 // 30 minutes
}

fn default_peak_start_hour() -> u32 {
    18
}

fn default_peak_end_hour() -> u32 {
    22
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    25
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source
    ///
    /// # Errors
    /// Returns an error if required values are missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let storage: StorageBackend = vars.parse_or("STORAGE_BACKEND", StorageBackend::default)?;
        let database = match (storage, vars.get("DATABASE_URL")) {
            (_, Some(url)) => Some(DatabaseConfig {
                url,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            (StorageBackend::Postgres, None) => return Err(ConfigError::MissingVar("DATABASE_URL")),
            (StorageBackend::Memory, None) => None,
        };

        let algorithm = vars.parse_or("JWT_ALGORITHM", || Algorithm::HS256)?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::InvalidValue(
                "JWT_ALGORITHM",
                format!("{algorithm:?} is not an HMAC algorithm"),
            ));
        }

        let tariff = TariffConfig {
            off_peak_price: vars.require("TARIFF_OFF_PEAK_PRICE")?,
            peak_price: vars.require("TARIFF_PEAK_PRICE")?,
            peak_start_hour: vars.parse_or("TARIFF_PEAK_START_HOUR", default_peak_start_hour)?,
            peak_end_hour: vars.parse_or("TARIFF_PEAK_END_HOUR", default_peak_end_hour)?,
        };
        tariff.schedule()?;

        let retry = RetryConfig {
            max_attempts: vars.parse_or("TRANSACTION_MAX_ATTEMPTS", default_max_attempts)?,
            backoff_ms: vars.parse_or("TRANSACTION_RETRY_BACKOFF_MS", default_backoff_ms)?,
        };
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "TRANSACTION_MAX_ATTEMPTS",
                "must be at least 1".to_string(),
            ));
        }

        let bootstrap_admin = match (
            vars.get("BOOTSTRAP_ADMIN_EMAIL"),
            vars.get("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdminConfig {
                name: vars.get("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                email,
                password,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::MissingVar("BOOTSTRAP_ADMIN_EMAIL")),
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parse_or("APP_ENV", default_env)?,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.require("API_PORT")?,
            },
            storage,
            database,
            jwt: JwtConfig {
                secret: vars
                    .get("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                algorithm,
                access_token_expiry: vars
                    .parse_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            tariff,
            retry,
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            bootstrap_admin,
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn require<T>(&self, key: &'static str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get(key).ok_or(ConfigError::MissingVar(key))?;
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string()))
    }

    fn parse_or<T>(&self, key: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(_) => self.require(key),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
