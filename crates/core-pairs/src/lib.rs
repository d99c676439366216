//! twosum Core Pairs: the pure logic behind the two-sum endpoint
//!
//! - [`find_pair`]: single-pass hash lookup returning the first pair of
//!   elements that sums to a target
//! - [`CacheKey`], [`encode_pair`], [`decode_pair`]: canonical cache keys and
//!   the fixed-shape value format used for cached answers
//! - [`SpreadsheetIngestor`]: reads a column of integers from a workbook
//!
//! Nothing here performs network I/O; adapters for caches and databases live
//! in `twosum-server`.

pub mod cache_key;
pub mod error;
pub mod ingest;
pub mod pair_finder;

pub use cache_key::{decode_pair, encode_pair, CacheKey, CACHE_KEY_PREFIX};
pub use error::{CodecError, IngestError, PairError};
pub use ingest::{SpreadsheetIngestor, DEFAULT_COLUMN};
pub use pair_finder::{find_pair, PairMatch};
