//! Reading the three CSV datasets and the roster file from disk.

use std::fs::File;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use ledger_core::models::Roster;
use ledger_core::{LedgerError, Result};
use ledger_engine::normalizer::Dataset;

/// Read a CSV file into one JSON object per data row, keyed by header.
///
/// Cells are kept as strings; typing happens in the normaliser. The header
/// row is checked against `dataset` before any data row is read, so a file
/// missing a required column fails here rather than dropping every row.
pub fn load_csv_rows(path: &Path, dataset: Dataset) -> Result<Vec<Value>> {
    let file = File::open(path).map_err(|source| LedgerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |e: csv::Error| LedgerError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    dataset.check_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }

    info!("Loaded {} {} rows from {}", rows.len(), dataset, path.display());
    Ok(rows)
}

/// Read the roster: a JSON object keyed by official name.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path).map_err(|source| LedgerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let roster: Roster = serde_json::from_str(&content)?;
    debug!("Loaded roster of {} officials from {}", roster.len(), path.display());
    Ok(roster)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_load_finance_rows() {
        let file = write_temp(
            "ReportPeriod,Year,Name,Position,Raised,Spent,Loans,CashOnHand\n\
             July 2025,2025,Jane Doe,County Judge,100000,150000,,800000\n\
             July 2025,2025,John Roe,Commissioner,\"1,000\",0,0,5\n",
        );
        let rows = load_csv_rows(file.path(), Dataset::Finance).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Jane Doe");
        assert_eq!(rows[0]["Loans"], "");
        assert_eq!(rows[1]["Raised"], "1,000");
    }

    #[test]
    fn test_load_trims_header_whitespace() {
        let file = write_temp(" Vendor , Category \nGulf Paving,Construction\n");
        let rows = load_csv_rows(file.path(), Dataset::Vendors).unwrap();
        assert_eq!(rows[0]["Vendor"], "Gulf Paving");
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_temp("Lobbyist,Category\nPat Smith,Energy\n");
        let err = load_csv_rows(file.path(), Dataset::Lobbyists).unwrap_err();
        assert!(matches!(err, LedgerError::MissingColumns { .. }));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let file = write_temp("Vendor,Category\nGulf Paving,Construction,Extra\n");
        let err = load_csv_rows(file.path(), Dataset::Vendors).unwrap_err();
        assert!(matches!(err, LedgerError::Csv { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv_rows(Path::new("/nonexistent/finance.csv"), Dataset::Finance).unwrap_err();
        assert!(matches!(err, LedgerError::FileRead { .. }));
    }

    #[test]
    fn test_load_roster() {
        let file = write_temp(
            r#"{"Jane Doe": {"party": "D", "office_since": 2019, "notes": "Chair"},
                "John Roe": {"party": "R", "office_since": 2021}}"#,
        );
        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Jane Doe").unwrap().name, "Jane Doe");
        assert_eq!(roster.get("John Roe").unwrap().party, "R");
    }

    #[test]
    fn test_load_roster_bad_json() {
        let file = write_temp("not json");
        assert!(matches!(
            load_roster(file.path()).unwrap_err(),
            LedgerError::JsonParse(_)
        ));
    }
}
