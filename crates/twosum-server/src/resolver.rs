//! Request resolution: validation, ingestion, cache, computation and persistence
//!
//! A request moves through these stages in order:
//!
//! ```text
//! [Ingesting] -> Validating -> CacheLookup --hit--> Responding
//!                                  |
//!                                 miss -> Computing -> Persisting -> CacheFilling -> Responding
//! ```
//!
//! Only validation, computation and the breaker can fail a request. Cache and
//! store trouble is logged and the request carries on without them.

use crate::cache::PairCache;
use crate::error::{ApiError, ApiResult};
use crate::store::{NewResultRecord, ResultStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use twosum_core_pairs::{find_pair, CacheKey, PairError, PairMatch, SpreadsheetIngestor};
use twosum_core_resilience::{CircuitBreaker, ResilienceError};

pub const INVALID_ARRAY: &str = "Invalid input array";
pub const INVALID_TARGET: &str = "Target must be an integer";
pub const INVALID_SPREADSHEET: &str = "Invalid Excel file format";

/// Body of `POST /two_sum`
///
/// Fields stay as raw JSON so type errors surface as the endpoint's own
/// validation messages instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TwoSumRequest {
    #[serde(default)]
    pub nums: Option<Value>,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub filepath: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoSumResponse {
    pub indices: [usize; 2],
    pub numbers: [i64; 2],
}

impl From<PairMatch> for TwoSumResponse {
    fn from(pair: PairMatch) -> Self {
        Self {
            indices: pair.indices(),
            numbers: pair.values(),
        }
    }
}

/// Why the guarded computation failed; every variant counts against the breaker
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error(transparent)]
    Pair(#[from] PairError),

    #[error("computation timed out after {0:?}")]
    Timeout(Duration),

    #[error("computation worker failed: {0}")]
    Worker(String),
}

pub fn parse_target(raw: Option<&Value>) -> ApiResult<i64> {
    raw.and_then(Value::as_i64)
        .ok_or_else(|| ApiError::validation(INVALID_TARGET))
}

pub fn parse_nums(raw: Option<&Value>) -> ApiResult<Vec<i64>> {
    let items = raw
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::validation(INVALID_ARRAY))?;

    let nums = items
        .iter()
        .map(Value::as_i64)
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| ApiError::validation(INVALID_ARRAY))?;

    check_len(nums)
}

fn check_len(nums: Vec<i64>) -> ApiResult<Vec<i64>> {
    if nums.len() < 2 {
        return Err(ApiError::validation(INVALID_ARRAY));
    }
    Ok(nums)
}

/// Orchestrates one two-sum request against the shared cache, store and breaker
pub struct Resolver {
    cache: PairCache,
    store: Arc<dyn ResultStore>,
    breaker: CircuitBreaker,
    ingestor: SpreadsheetIngestor,
    timeout: Duration,
}

impl Resolver {
    pub fn new(
        cache: PairCache,
        store: Arc<dyn ResultStore>,
        breaker: CircuitBreaker,
        ingestor: SpreadsheetIngestor,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            breaker,
            ingestor,
            timeout,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[tracing::instrument(name = "two_sum", skip_all)]
    pub async fn resolve(&self, request: TwoSumRequest) -> ApiResult<TwoSumResponse> {
        let nums = match request.filepath.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => self.ingest(PathBuf::from(path)).await?,
            _ => parse_nums(request.nums.as_ref())?,
        };
        let target = parse_target(request.target.as_ref())?;

        tracing::debug!(len = nums.len(), target, "request validated");

        let key = CacheKey::new(&nums, target);

        if let Some(pair) = self.cached(&key, &nums, target).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(pair.into());
        }

        let pair = self.compute(nums, target).await?;
        self.persist(&pair, target).await;
        self.fill(&key, &pair).await;

        tracing::info!(
            indices = ?pair.indices(),
            numbers = ?pair.values(),
            target,
            "pair computed"
        );
        Ok(pair.into())
    }

    async fn ingest(&self, path: PathBuf) -> ApiResult<Vec<i64>> {
        tracing::debug!(path = %path.display(), "ingesting spreadsheet");

        let ingestor = self.ingestor.clone();
        let task = tokio::task::spawn_blocking(move || ingestor.read(&path));

        let nums = match timeout(self.timeout, task).await {
            Err(_) => return Err(ApiError::Timeout(self.timeout)),
            Ok(Err(join)) => return Err(ApiError::Internal(join.to_string())),
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "spreadsheet rejected");
                return Err(ApiError::validation(INVALID_SPREADSHEET));
            }
            Ok(Ok(Ok(nums))) => nums,
        };

        check_len(nums)
    }

    async fn cached(&self, key: &CacheKey, nums: &[i64], target: i64) -> Option<PairMatch> {
        match timeout(self.timeout, self.cache.lookup(key)).await {
            Ok(Ok(Some(pair))) if pair.is_solution_for(nums, target) => Some(pair),
            Ok(Ok(Some(pair))) => {
                tracing::warn!(
                    key = %key,
                    ?pair,
                    "cached pair does not solve its key, recomputing"
                );
                None
            }
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "cache lookup failed, treating as miss");
                None
            }
            Err(_) => {
                tracing::warn!(key = %key, "cache lookup timed out, treating as miss");
                None
            }
        }
    }

    async fn compute(&self, nums: Vec<i64>, target: i64) -> ApiResult<PairMatch> {
        let limit = self.timeout;

        let outcome = self
            .breaker
            .call(move || async move {
                let task = tokio::task::spawn_blocking(move || find_pair(&nums, target));
                match timeout(limit, task).await {
                    Err(_) => Err(ComputeError::Timeout(limit)),
                    Ok(Err(join)) => Err(ComputeError::Worker(join.to_string())),
                    Ok(Ok(result)) => result.map_err(ComputeError::from),
                }
            })
            .await;

        outcome.map_err(|e| match e {
            ResilienceError::CircuitOpen => ApiError::BreakerOpen,
            ResilienceError::Operation(ComputeError::Pair(PairError::NotFound)) => {
                ApiError::NotFound
            }
            ResilienceError::Operation(ComputeError::Pair(PairError::InvalidInput(_))) => {
                ApiError::validation(INVALID_ARRAY)
            }
            ResilienceError::Operation(ComputeError::Timeout(limit)) => ApiError::Timeout(limit),
            ResilienceError::Operation(ComputeError::Worker(reason)) => ApiError::Internal(reason),
        })
    }

    async fn persist(&self, pair: &PairMatch, target: i64) {
        let record = NewResultRecord {
            num1: pair.first_value,
            num2: pair.second_value,
            target,
        };

        match timeout(self.timeout, self.store.insert(record)).await {
            Ok(Ok(id)) => tracing::debug!(id, "result persisted"),
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to persist result"),
            Err(_) => tracing::warn!("persisting result timed out"),
        }
    }

    async fn fill(&self, key: &CacheKey, pair: &PairMatch) {
        match timeout(self.timeout, self.cache.fill(key, pair)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(key = %key, error = %e, "failed to cache result"),
            Err(_) => tracing::warn!(key = %key, "caching result timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: ApiError) -> String {
        err.client_message()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(Some(&json!(9))).unwrap(), 9);
        assert_eq!(parse_target(Some(&json!(-4))).unwrap(), -4);

        for bad in [json!("9"), json!(9.5), json!(null), json!([9]), json!(true)] {
            assert_eq!(message(parse_target(Some(&bad)).unwrap_err()), INVALID_TARGET);
        }
        assert_eq!(message(parse_target(None).unwrap_err()), INVALID_TARGET);
    }

    #[test]
    fn test_parse_target_rejects_out_of_range() {
        let too_big = json!(u64::MAX);
        assert!(parse_target(Some(&too_big)).is_err());
    }

    #[test]
    fn test_parse_nums() {
        assert_eq!(
            parse_nums(Some(&json!([2, 7, 11, 15]))).unwrap(),
            vec![2, 7, 11, 15]
        );

        for bad in [
            json!([1]),
            json!([]),
            json!([1, "2"]),
            json!([1, 2.5]),
            json!("1,2"),
            json!({"0": 1, "1": 2}),
        ] {
            assert_eq!(message(parse_nums(Some(&bad)).unwrap_err()), INVALID_ARRAY);
        }
        assert_eq!(message(parse_nums(None).unwrap_err()), INVALID_ARRAY);
    }

    #[test]
    fn test_response_from_pair() {
        let pair = find_pair(&[3, 2, 4], 6).unwrap();
        let response = TwoSumResponse::from(pair);

        assert_eq!(response.indices, [1, 2]);
        assert_eq!(response.numbers, [2, 4]);
    }

    #[test]
    fn test_request_fields_default_to_none() {
        let request: TwoSumRequest = serde_json::from_value(json!({"target": 3})).unwrap();
        assert!(request.nums.is_none());
        assert!(request.filepath.is_none());
        assert_eq!(request.target, Some(json!(3)));
    }
}
