//! Circuit Breaker implementation for fault tolerance
//!
//! The breaker counts consecutive failures of the operations it guards and
//! fails fast once the count reaches the configured threshold. It has two states:
//! - Closed: Normal operation, calls pass through
//! - Open: Too many consecutive failures, calls are rejected without running
//!
//! There is no half-open probing. Once open, the breaker stays open until it is
//! dropped, which in a server means until the process restarts.

use super::error::ResilienceError;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Default number of consecutive failures before the circuit opens
pub const DEFAULT_FAILURE_THRESHOLD: usize = 3;

/// State of the circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, calls pass through normally
    Closed,
    /// Circuit is open, calls fail immediately
    Open { since: Instant },
}

impl CircuitState {
    /// Short lowercase name, suitable for logs and health payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open { .. } => "open",
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening circuit (minimum 1)
    pub failure_threshold: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

/// Point-in-time view of the breaker, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: usize,
    pub failure_threshold: usize,
}

/// Internal state of the circuit breaker
#[derive(Debug)]
struct CircuitBreakerState {
    state: CircuitState,
    consecutive_failures: usize,
}

impl CircuitBreakerState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
        }
    }
}

/// Circuit breaker guarding a fallible async operation
///
/// Cloning is cheap and clones share state, so one breaker can be handed to
/// every request handler.
///
/// # Example
/// ```no_run
/// use twosum_core_resilience::{CircuitBreaker, CircuitBreakerConfig, ResilienceError};
///
/// #[tokio::main]
/// async fn main() {
///     let breaker = CircuitBreaker::new(CircuitBreakerConfig { failure_threshold: 3 });
///
///     let result: Result<u32, ResilienceError<std::io::Error>> =
///         breaker.call(|| async { Ok(42) }).await;
///
///     assert_eq!(result.ok(), Some(42));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: Arc<CircuitBreakerConfig>,
    state: Arc<Mutex<CircuitBreakerState>>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(mut config: CircuitBreakerConfig) -> Self {
        config.failure_threshold = config.failure_threshold.max(1);
        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(CircuitBreakerState::new())),
        }
    }

    /// Create a new circuit breaker with default configuration
    pub fn new_default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }

    /// Configured failure threshold
    pub fn failure_threshold(&self) -> usize {
        self.config.failure_threshold
    }

    /// Get the current state of the circuit breaker
    pub async fn state(&self) -> CircuitState {
        self.state.lock().await.state
    }

    /// Get current consecutive failure count
    pub async fn failure_count(&self) -> usize {
        self.state.lock().await.consecutive_failures
    }

    /// Whether calls are currently being rejected
    pub async fn is_open(&self) -> bool {
        matches!(self.state().await, CircuitState::Open { .. })
    }

    /// Read state and counters under a single lock
    pub async fn snapshot(&self) -> BreakerSnapshot {
        let state = self.state.lock().await;
        BreakerSnapshot {
            state: state.state,
            consecutive_failures: state.consecutive_failures,
            failure_threshold: self.config.failure_threshold,
        }
    }

    /// Execute an operation with circuit breaker protection
    ///
    /// The operation is not invoked while the circuit is open. Any error it
    /// returns counts as a failure and is handed back unchanged inside
    /// [`ResilienceError::Operation`].
    pub async fn call<F, Fut, T, E>(&self, op: F) -> Result<T, ResilienceError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.is_open().await {
            return Err(ResilienceError::CircuitOpen);
        }

        // The lock is not held while the operation runs
        match op().await {
            Ok(result) => {
                self.on_success().await;
                Ok(result)
            }
            Err(e) => {
                self.on_failure().await;
                Err(ResilienceError::Operation(e))
            }
        }
    }

    async fn on_success(&self) {
        let mut state = self.state.lock().await;

        // A call admitted before another one tripped the circuit must not close it again
        if state.state == CircuitState::Closed {
            state.consecutive_failures = 0;
        }
    }

    async fn on_failure(&self) {
        let mut state = self.state.lock().await;

        if let CircuitState::Open { .. } = state.state {
            return;
        }

        state.consecutive_failures += 1;

        if state.consecutive_failures >= self.config.failure_threshold {
            state.state = CircuitState::Open {
                since: Instant::now(),
            };
            tracing::warn!(
                consecutive_failures = state.consecutive_failures,
                threshold = self.config.failure_threshold,
                "circuit breaker opened"
            );
        } else {
            tracing::debug!(
                consecutive_failures = state.consecutive_failures,
                threshold = self.config.failure_threshold,
                "guarded call failed"
            );
        }
    }
}
