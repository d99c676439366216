//! twosum Server
//!
//! HTTP API for the two-sum service. `POST /two_sum` resolves a request through
//! the result cache, a circuit-breaker guarded computation and the result
//! database; `GET /api/health` reports the breaker.
//!
//! Built with Axum, SQLx (SQLite) and an in-process or Redis cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod resolver;
pub mod server;
pub mod state;
pub mod store;

pub use cache::{CacheStore, MemoryCacheStore, PairCache};
pub use config::{CacheBackend, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorBody, StoreError};
pub use resolver::{Resolver, TwoSumRequest, TwoSumResponse};
pub use server::build_router;
pub use state::AppState;
pub use store::{NewResultRecord, ResultRecord, ResultStore, SqliteResultStore};

#[cfg(feature = "redis-cache")]
pub use cache::RedisCacheStore;

/// Start the API server
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    server::run_server(config).await
}
