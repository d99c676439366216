/*!
 * Configuration for the twosum command line
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Diagnostic output settings shared by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Path to log file (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,
}

impl LoggingConfig {
    /// Level actually applied once `verbose` is taken into account
    pub fn effective_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            self.log_level.to_tracing_level()
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_verbose_overrides_log_level() {
        let config = LoggingConfig {
            log_level: LogLevel::Error,
            log_file: None,
            verbose: true,
        };

        assert_eq!(config.effective_level(), Level::DEBUG);
    }

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(LoggingConfig::default().effective_level(), Level::INFO);
    }

    #[test]
    fn test_log_level_serde() {
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(serde_json::to_string(&LogLevel::Trace).unwrap(), "\"trace\"");
    }
}
