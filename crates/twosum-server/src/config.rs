//! Server configuration sourced from the environment

use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;
use twosum_core_pairs::DEFAULT_COLUMN;
use twosum_core_resilience::DEFAULT_FAILURE_THRESHOLD;

/// Where computed pairs are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process map, lost on restart
    Memory,
    /// External Redis instance
    Redis,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "local" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            _ => Err(anyhow!("CACHE_BACKEND must be one of: memory, redis")),
        }
    }
}

/// Configuration for the twosum API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cache_backend: CacheBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
    pub cache_ttl: Duration,
    pub breaker_threshold: usize,
    pub request_timeout: Duration,
    pub spreadsheet_column: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite:twosum.db?mode=rwc".to_string(),
            db_max_connections: 5,
            cache_backend: CacheBackend::Memory,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_db: 0,
            cache_ttl: Duration::from_secs(3600),
            breaker_threshold: DEFAULT_FAILURE_THRESHOLD,
            request_timeout: Duration::from_secs(10),
            spreadsheet_column: DEFAULT_COLUMN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from process environment, reading a `.env` file first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl_secs: u64 =
            parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?;
        let timeout_secs: u64 = parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            host: lookup("TWOSUM_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "TWOSUM_PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            cache_backend: parse_or(&lookup, "CACHE_BACKEND", defaults.cache_backend)?,
            redis_host: lookup("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: parse_or(&lookup, "REDIS_PORT", defaults.redis_port)?,
            redis_db: parse_or(&lookup, "REDIS_DB", defaults.redis_db)?,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            breaker_threshold: parse_or(
                &lookup,
                "BREAKER_THRESHOLD",
                defaults.breaker_threshold,
            )?,
            request_timeout: Duration::from_secs(timeout_secs),
            spreadsheet_column: lookup("SPREADSHEET_COLUMN")
                .unwrap_or(defaults.spreadsheet_column),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
