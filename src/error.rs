/*!
 * Error types for the twosum command line
 */

use thiserror::Error;
use twosum_core_pairs::{IngestError, PairError};

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Error, Debug)]
pub enum CliError {
    /// Command line input that cannot be solved
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Spreadsheet could not be read
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Input was valid but no two elements sum to the target
    #[error("No valid pair found")]
    NoPair,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API server failed to start or stopped with an error
    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoPair => EXIT_PARTIAL,
            CliError::InvalidInput(_)
            | CliError::Ingest(_)
            | CliError::Config(_)
            | CliError::Server(_)
            | CliError::Io(_) => EXIT_FATAL,
        }
    }
}

impl From<PairError> for CliError {
    fn from(err: PairError) -> Self {
        match err {
            PairError::NotFound => CliError::NoPair,
            PairError::InvalidInput(message) => CliError::InvalidInput(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::NoPair.exit_code(), EXIT_PARTIAL);
        assert_eq!(CliError::Config("bad port".into()).exit_code(), EXIT_FATAL);
        assert_eq!(
            CliError::from(IngestError::MissingColumn {
                column: "Numbers".into()
            })
            .exit_code(),
            EXIT_FATAL
        );
    }

    #[test]
    fn test_pair_error_conversion() {
        assert!(matches!(CliError::from(PairError::NotFound), CliError::NoPair));
        assert!(matches!(
            CliError::from(PairError::InvalidInput("need at least two numbers".into())),
            CliError::InvalidInput(_)
        ));
    }
}
