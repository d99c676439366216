/*!
 * Offline solving for the `twosum solve` command
 *
 * Runs the pair finder directly on numbers from the command line or from a
 * spreadsheet. No cache, database or breaker is involved.
 */

use serde::Serialize;
use std::path::PathBuf;
use twosum_core_pairs::{find_pair, PairMatch, SpreadsheetIngestor};

use crate::error::{CliError, Result};

/// Where the numbers come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveInput {
    Inline(Vec<i64>),
    Spreadsheet { path: PathBuf, column: String },
}

/// Printable outcome, same shape as the HTTP response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolveOutput {
    pub indices: [usize; 2],
    pub numbers: [i64; 2],
}

impl From<PairMatch> for SolveOutput {
    fn from(pair: PairMatch) -> Self {
        Self {
            indices: pair.indices(),
            numbers: pair.values(),
        }
    }
}

impl SolveOutput {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CliError::InvalidInput(e.to_string()))
    }

    pub fn to_text(&self) -> String {
        format!(
            "indices: {}, {}\nnumbers: {} + {}",
            self.indices[0], self.indices[1], self.numbers[0], self.numbers[1]
        )
    }
}

/// Parse a comma separated list such as `2,7,11,15`
pub fn parse_nums_csv(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<i64>()
                .map_err(|_| CliError::InvalidInput(format!("'{}' is not an integer", item)))
        })
        .collect()
}

pub fn load_numbers(input: &SolveInput) -> Result<Vec<i64>> {
    match input {
        SolveInput::Inline(nums) => Ok(nums.clone()),
        SolveInput::Spreadsheet { path, column } => {
            let nums = SpreadsheetIngestor::new(column.clone()).read(path)?;
            tracing::debug!(
                path = %path.display(),
                column,
                count = nums.len(),
                "spreadsheet loaded"
            );
            Ok(nums)
        }
    }
}

pub fn solve(input: &SolveInput, target: i64) -> Result<SolveOutput> {
    let nums = load_numbers(input)?;
    if nums.len() < 2 {
        return Err(CliError::InvalidInput(
            "at least two numbers are required".to_string(),
        ));
    }

    let pair = find_pair(&nums, target)?;
    tracing::info!(indices = ?pair.indices(), target, "pair found");
    Ok(pair.into())
}
