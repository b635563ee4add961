//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which storage adapter backs the catalog, ledger and ticket log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage adapter
    pub storage_backend: StorageBackend,

    /// Database connection URL (required for the postgres backend)
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Maintainer (admin) server port
    pub admin_port: u16,

    /// Customer (shop) server port
    pub shop_port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Directory receiving monthly CSV reports
    pub reports_dir: PathBuf,

    /// Basic auth credentials of the admin server
    pub admin_username: String,
    pub admin_password: String,

    /// Idle time after which an unused cart session is dropped
    pub session_idle_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let storage_backend = match var("STORAGE_BACKEND", "memory").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "postgres" | "postgresql" => StorageBackend::Postgres,
            _ => return Err(ConfigError::InvalidValue("STORAGE_BACKEND")),
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnv("DATABASE_URL"));
        }

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = var("HOST", "127.0.0.1");

        let admin_port = var("ADMIN_PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ADMIN_PORT"))?;

        let shop_port = var("SHOP_PORT", "8081")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SHOP_PORT"))?;

        let environment = var("ENVIRONMENT", "development");
        let reports_dir = PathBuf::from(var("REPORTS_DIR", "./relatorios_fluxo"));
        let admin_username = var("ADMIN_USERNAME", "admin");
        let admin_password = var("ADMIN_PASSWORD", "coffeeShop40");

        let session_idle_secs: u64 = var("SESSION_IDLE_SECS", "1800")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SESSION_IDLE_SECS"))?;

        Ok(Self {
            storage_backend,
            database_url,
            database_max_connections,
            host,
            admin_port,
            shop_port,
            environment,
            reports_dir,
            admin_username,
            admin_password,
            session_idle_timeout: Duration::from_secs(session_idle_secs),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
