//! Row normalisation for the three source datasets.
//!
//! Turns raw rows (one JSON object per row, cells as strings, numbers or
//! null) into typed records. Numeric cells that fail coercion become
//! [`Amount::MISSING`]; rows that lack a required identity field are dropped
//! and reported as a [`Diagnostic`] rather than failing the whole load.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use ledger_core::data_processors::{AmountProcessor, FieldExtractor, YearProcessor};
use ledger_core::error::{LedgerError, Result};
use ledger_core::models::{FinancialRecord, LobbyistRecord, VendorRecord};

// ── Column aliases ────────────────────────────────────────────────────────────

const OFFICIAL_NAME_KEYS: &[&str] = &["Name", "OfficialName", "official_name"];
const POSITION_KEYS: &[&str] = &["Position", "position"];
const PRECINCT_KEYS: &[&str] = &["Precinct", "precinct"];
const REPORT_PERIOD_KEYS: &[&str] = &["ReportPeriod", "report_period"];
const YEAR_KEYS: &[&str] = &["Year", "year"];
const RAISED_KEYS: &[&str] = &["Raised", "raised"];
const SPENT_KEYS: &[&str] = &["Spent", "spent"];
const LOANS_KEYS: &[&str] = &["Loans", "loans"];
const CASH_ON_HAND_KEYS: &[&str] = &["CashOnHand", "cash_on_hand"];

const LOBBYIST_NAME_KEYS: &[&str] = &["Lobbyist", "LobbyistName", "Name", "lobbyist_name"];
const CLIENT_KEYS: &[&str] = &["Client", "client"];
const CATEGORY_KEYS: &[&str] = &["Category", "category"];

const VENDOR_NAME_KEYS: &[&str] = &["Vendor", "VendorName", "Name", "vendor_name"];
const DEPARTMENT_KEYS: &[&str] = &["Department", "department"];

/// Category used when a lobbyist or vendor row leaves it blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Identifies one of the three source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Finance,
    Lobbyists,
    Vendors,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Finance => "finance",
            Dataset::Lobbyists => "lobbyists",
            Dataset::Vendors => "vendors",
        }
    }

    /// Required columns, each given as its accepted header aliases.
    fn required_columns(self) -> &'static [&'static [&'static str]] {
        match self {
            Dataset::Finance => &[OFFICIAL_NAME_KEYS, REPORT_PERIOD_KEYS, YEAR_KEYS],
            Dataset::Lobbyists => &[LOBBYIST_NAME_KEYS, CLIENT_KEYS],
            Dataset::Vendors => &[VENDOR_NAME_KEYS],
        }
    }

    /// Schema check for the loading layer: every required column must be
    /// present under at least one alias.
    pub fn check_headers<S: AsRef<str>>(self, headers: &[S]) -> Result<()> {
        let missing: Vec<String> = self
            .required_columns()
            .iter()
            .filter(|aliases| {
                !headers
                    .iter()
                    .any(|h| aliases.contains(&h.as_ref().trim()))
            })
            .map(|aliases| aliases[0].to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::MissingColumns {
                dataset: self.name().to_string(),
                columns: missing,
            })
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// A row that was excluded during normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub dataset: Dataset,
    /// Zero-based position of the row in the input sequence.
    pub row: usize,
    pub reason: String,
}

/// Records that passed validation plus diagnostics for those that did not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

/// All three normalised datasets, ready for the analytics components.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetBundle {
    pub finance: Vec<FinancialRecord>,
    pub lobbyists: Vec<LobbyistRecord>,
    pub vendors: Vec<VendorRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalise campaign-finance rows.
pub fn normalize_financial(rows: &[Value]) -> Normalized<FinancialRecord> {
    normalize_rows(Dataset::Finance, rows, financial_from_row)
}

/// Normalise lobbyist registration rows.
pub fn normalize_lobbyists(rows: &[Value]) -> Normalized<LobbyistRecord> {
    normalize_rows(Dataset::Lobbyists, rows, lobbyist_from_row)
}

/// Normalise vendor rows.
pub fn normalize_vendors(rows: &[Value]) -> Normalized<VendorRecord> {
    normalize_rows(Dataset::Vendors, rows, vendor_from_row)
}

/// Normalise all three datasets and collect their diagnostics in dataset
/// order (finance, lobbyists, vendors).
pub fn normalize_all(
    finance_rows: &[Value],
    lobbyist_rows: &[Value],
    vendor_rows: &[Value],
) -> DatasetBundle {
    let finance = normalize_financial(finance_rows);
    let lobbyists = normalize_lobbyists(lobbyist_rows);
    let vendors = normalize_vendors(vendor_rows);

    let mut diagnostics = finance.diagnostics;
    diagnostics.extend(lobbyists.diagnostics);
    diagnostics.extend(vendors.diagnostics);

    DatasetBundle {
        finance: finance.records,
        lobbyists: lobbyists.records,
        vendors: vendors.records,
        diagnostics,
    }
}

// ── Per-row validation ────────────────────────────────────────────────────────

/// Validate one finance row. `Err` carries the reason the row was dropped.
pub fn financial_from_row(row: &Value) -> std::result::Result<FinancialRecord, String> {
    let official_name = require_text(row, OFFICIAL_NAME_KEYS, "official name")?;
    let report_period = require_text(row, REPORT_PERIOD_KEYS, "report period")?;
    let year = match FieldExtractor::find_value(row, YEAR_KEYS) {
        None => return Err("missing year".to_string()),
        Some(v) => YearProcessor::parse(Some(v)).ok_or_else(|| format!("invalid year {v}"))?,
    };

    Ok(FinancialRecord {
        official_name,
        position: FieldExtractor::find_text(row, POSITION_KEYS).unwrap_or_default(),
        precinct: FieldExtractor::find_text(row, PRECINCT_KEYS),
        report_period,
        year,
        raised: AmountProcessor::coerce(FieldExtractor::find_value(row, RAISED_KEYS)),
        spent: AmountProcessor::coerce(FieldExtractor::find_value(row, SPENT_KEYS)),
        loans: AmountProcessor::coerce(FieldExtractor::find_value(row, LOANS_KEYS)),
        cash_on_hand: AmountProcessor::coerce(FieldExtractor::find_value(row, CASH_ON_HAND_KEYS)),
    })
}

/// Validate one lobbyist row.
pub fn lobbyist_from_row(row: &Value) -> std::result::Result<LobbyistRecord, String> {
    Ok(LobbyistRecord {
        lobbyist_name: require_text(row, LOBBYIST_NAME_KEYS, "lobbyist name")?,
        client: require_text(row, CLIENT_KEYS, "client")?,
        category: FieldExtractor::find_text(row, CATEGORY_KEYS)
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
    })
}

/// Validate one vendor row.
pub fn vendor_from_row(row: &Value) -> std::result::Result<VendorRecord, String> {
    Ok(VendorRecord {
        vendor_name: require_text(row, VENDOR_NAME_KEYS, "vendor name")?,
        category: FieldExtractor::find_text(row, CATEGORY_KEYS)
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        department: FieldExtractor::find_text(row, DEPARTMENT_KEYS).unwrap_or_default(),
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn require_text(row: &Value, keys: &[&str], label: &str) -> std::result::Result<String, String> {
    FieldExtractor::find_text(row, keys).ok_or_else(|| format!("missing {label}"))
}

fn normalize_rows<T>(
    dataset: Dataset,
    rows: &[Value],
    validate: impl Fn(&Value) -> std::result::Result<T, String>,
) -> Normalized<T> {
    let mut records = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let outcome = if row.is_object() {
            validate(row)
        } else {
            Err("row is not an object".to_string())
        };

        match outcome {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("Dropping {} row {}: {}", dataset, index, reason);
                diagnostics.push(Diagnostic {
                    dataset,
                    row: index,
                    reason,
                });
            }
        }
    }

    debug!(
        "Normalised {} {} rows ({} dropped)",
        records.len(),
        dataset,
        diagnostics.len()
    );

    Normalized {
        records,
        diagnostics,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
