//! Canonical cache keys and the cached-pair value format
//!
//! Keys encode the exact input order, so `[2, 7]` and `[7, 2]` are different
//! entries. Values are a fixed-shape JSON array
//! `[first_index, second_index, first_value, second_value]`, decoded through
//! serde into a typed tuple and never interpreted any other way.

use crate::error::CodecError;
use crate::pair_finder::PairMatch;
use std::fmt;

/// Prefix shared by every key this crate produces
pub const CACHE_KEY_PREFIX: &str = "two_sum";

/// Deterministic cache key for a `(nums, target)` request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(nums: &[i64], target: i64) -> Self {
        let joined = nums
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        CacheKey(format!("{}:{}:{}", CACHE_KEY_PREFIX, joined, target))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serialize a pair into its cache value
pub fn encode_pair(pair: &PairMatch) -> Result<String, CodecError> {
    let tuple = (
        pair.first_index,
        pair.second_index,
        pair.first_value,
        pair.second_value,
    );
    Ok(serde_json::to_string(&tuple)?)
}

/// Parse a cache value back into a pair
pub fn decode_pair(raw: &str) -> Result<PairMatch, CodecError> {
    let (first_index, second_index, first_value, second_value): (usize, usize, i64, i64) =
        serde_json::from_str(raw)?;

    if first_index >= second_index {
        return Err(CodecError::Shape(format!(
            "indices out of order: {} >= {}",
            first_index, second_index
        )));
    }

    Ok(PairMatch {
        first_index,
        second_index,
        first_value,
        second_value,
    })
}
