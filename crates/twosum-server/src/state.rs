//! Application state shared across all handlers

use crate::cache::{CacheStore, MemoryCacheStore, PairCache};
use crate::config::{CacheBackend, ServerConfig};
use crate::resolver::Resolver;
use crate::store::{ResultStore, SqliteResultStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use twosum_core_pairs::SpreadsheetIngestor;
use twosum_core_resilience::{CircuitBreaker, CircuitBreakerConfig};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Connect the configured backends and build a resolver over them
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let store = SqliteResultStore::connect(&config.database_url, config.db_max_connections)
            .await
            .context("Failed to open result database")?;
        store
            .init()
            .await
            .context("Failed to initialize result database schema")?;

        let cache_store = connect_cache(config).await?;
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: config.breaker_threshold,
        });

        let resolver = Resolver::new(
            PairCache::new(cache_store, config.cache_ttl),
            Arc::new(store),
            breaker,
            SpreadsheetIngestor::new(config.spreadsheet_column.clone()),
            config.request_timeout,
        );

        Ok(Self::new(resolver))
    }
}

async fn connect_cache(config: &ServerConfig) -> Result<Arc<dyn CacheStore>> {
    match config.cache_backend {
        CacheBackend::Memory => {
            tracing::info!("using in-process result cache");
            Ok(Arc::new(MemoryCacheStore::new()))
        }
        #[cfg(feature = "redis-cache")]
        CacheBackend::Redis => {
            let store = crate::cache::RedisCacheStore::connect(
                &config.redis_host,
                config.redis_port,
                config.redis_db,
            )
            .await
            .context("Failed to connect to redis cache")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis-cache"))]
        CacheBackend::Redis => anyhow::bail!(
            "CACHE_BACKEND=redis requires twosum-server to be built with the `redis-cache` feature"
        ),
    }
}
