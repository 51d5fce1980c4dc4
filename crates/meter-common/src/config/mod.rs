//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BootstrapAdminConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, RateLimitConfig, RetryConfig, ServerConfig, StorageBackend,
    TariffConfig,
};
