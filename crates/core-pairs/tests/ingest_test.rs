//! Spreadsheet ingestion against checked-in workbooks

use std::path::PathBuf;
use twosum_core_pairs::{find_pair, IngestError, SpreadsheetIngestor};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_reads_numbers_column() {
    let numbers = SpreadsheetIngestor::default()
        .read(&fixture("numbers.xlsx"))
        .unwrap();

    assert_eq!(numbers, vec![2, 7, 11, 15]);

    let pair = find_pair(&numbers, 9).unwrap();
    assert_eq!(pair.indices(), [0, 1]);
}

#[test]
fn test_mixed_cells_are_normalized() {
    let numbers = SpreadsheetIngestor::default()
        .read(&fixture("mixed_cells.xlsx"))
        .unwrap();

    // string "2" parses, the blank row is skipped, 4.0 is integral
    assert_eq!(numbers, vec![3, 2, 4, -1]);
}

#[test]
fn test_missing_column() {
    let err = SpreadsheetIngestor::default()
        .read(&fixture("no_numbers_column.xlsx"))
        .unwrap_err();

    match err {
        IngestError::MissingColumn { column } => assert_eq!(column, "Numbers"),
        other => panic!("Expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_custom_column_name() {
    let numbers = SpreadsheetIngestor::new("Values")
        .read(&fixture("no_numbers_column.xlsx"))
        .unwrap();

    assert_eq!(numbers, vec![2, 7]);
}

#[test]
fn test_non_integer_cell_reports_row() {
    let err = SpreadsheetIngestor::default()
        .read(&fixture("invalid_cell.xlsx"))
        .unwrap_err();

    match err {
        IngestError::InvalidCell { row, value } => {
            assert_eq!(row, 3);
            assert_eq!(value, "seven");
        }
        other => panic!("Expected InvalidCell, got {:?}", other),
    }
}
