//! Configuration module
//!
//! Env-driven application configuration shared by the API server and the
//! maintenance CLI. Binaries call `dotenvy::dotenv()` before `Config::from_env`.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;
const DEFAULT_SLIDESHOW_CACHE_TTL_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Logical storage backend name recorded on each media row.
    pub disk: String,
    /// Root directory of the local "public" disk.
    pub storage_path: String,
    /// Base URL files are served from (`{base_url}/storage/{path}`).
    pub base_url: String,
    /// Directory (relative to the disk root) new uploads are written to,
    /// and the root of the orphaned-file scan.
    pub upload_root: String,
    pub max_upload_size_bytes: usize,
    /// Per-IP fixed-window limit on the slideshow endpoint.
    pub rate_limit_per_minute: u32,
    pub slideshow_cache_ttl_secs: u64,
    pub cors_origins: Vec<String>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let cors_origins = env_or("CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            environment: env_or("ENVIRONMENT", "development"),
            server_port: parse_env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            database_url,
            db_max_connections: parse_env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: parse_env_or("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            disk: env_or("STORAGE_DISK", "public"),
            storage_path: env_or("STORAGE_PATH", "./storage/app/public"),
            base_url: env_or("BASE_URL", "http://localhost:3000"),
            upload_root: env_or("UPLOAD_ROOT", "uploads"),
            max_upload_size_bytes: parse_env_or(
                "MAX_UPLOAD_SIZE_BYTES",
                DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            ),
            rate_limit_per_minute: parse_env_or(
                "RATE_LIMIT_PER_MINUTE",
                DEFAULT_RATE_LIMIT_PER_MINUTE,
            ),
            slideshow_cache_ttl_secs: parse_env_or(
                "SLIDESHOW_CACHE_TTL_SECS",
                DEFAULT_SLIDESHOW_CACHE_TTL_SECS,
            ),
            cors_origins,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
