/*!
 * twosum - two-sum lookup service
 *
 * The `twosum` binary serves the HTTP API (`twosum serve`) and solves inputs
 * offline (`twosum solve`). The pair finder, breaker and server live in their
 * own crates and are re-exported here.
 */

pub mod config;
pub mod error;
pub mod logging;
pub mod solve;

pub use config::{LogLevel, LoggingConfig};
pub use error::{CliError, Result, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS};
pub use solve::{parse_nums_csv, solve, SolveInput, SolveOutput};

pub use twosum_core_pairs::{find_pair, PairMatch};
pub use twosum_server::{start_server, ServerConfig};
