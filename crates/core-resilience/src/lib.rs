//! twosum Core Resilience: Pure-logic failure guarding
//!
//! # Overview
//!
//! This crate provides the circuit breaker that guards pair computation in the
//! twosum server. It is **pure logic** with zero knowledge of HTTP, caches or
//! databases: it wraps any async operation returning a `Result` and counts
//! consecutive failures.
//!
//! ```text
//!      request ──▶ CircuitBreaker::call ──▶ operation
//!                        │
//!        open? ◀─────────┘  (threshold consecutive failures, latches)
//!          │
//!          ▼
//!   ResilienceError::CircuitOpen
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use twosum_core_resilience::{CircuitBreaker, CircuitBreakerConfig, ResilienceError};
//!
//! # async fn example() -> Result<(), ResilienceError<std::io::Error>> {
//! let breaker = CircuitBreaker::new(CircuitBreakerConfig { failure_threshold: 3 });
//!
//! let value = breaker.call(|| async {
//!     // Your potentially failing operation
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod circuit_breaker;
pub mod error;

// Re-export main types for convenience
pub use circuit_breaker::{
    BreakerSnapshot, CircuitBreaker, CircuitBreakerConfig, CircuitState,
    DEFAULT_FAILURE_THRESHOLD,
};
pub use error::ResilienceError;
