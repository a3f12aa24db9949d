//! Record selection for browsing views: filters, selector option lists,
//! per-official history and cash-on-hand trend series.

use std::collections::BTreeSet;

use serde::Serialize;

use ledger_core::models::{Amount, FinancialRecord, Roster};

/// One point of an official's cash-on-hand series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashPoint {
    pub report_period: String,
    pub year: i32,
    pub cash_on_hand: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashTrend {
    pub official: String,
    /// In dataset order.
    pub points: Vec<CashPoint>,
}

/// Records matching `official` and `year`; `None` means "all".
pub fn filter_records(
    records: &[FinancialRecord],
    official: Option<&str>,
    year: Option<i32>,
) -> Vec<FinancialRecord> {
    records
        .iter()
        .filter(|r| official.map_or(true, |name| r.official_name == name))
        .filter(|r| year.map_or(true, |y| r.year == y))
        .cloned()
        .collect()
}

/// Distinct filer names, ascending.
pub fn official_names(records: &[FinancialRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.official_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct filing years, newest first.
pub fn report_years(records: &[FinancialRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Every filing by `official`, oldest year first. Filings within a year
/// keep dataset order.
pub fn fundraising_history(records: &[FinancialRecord], official: &str) -> Vec<FinancialRecord> {
    let mut history = filter_records(records, Some(official), None);
    history.sort_by_key(|r| r.year);
    history
}

/// Cash-on-hand series for each roster official with filings, by name.
pub fn cash_trends(records: &[FinancialRecord], roster: &Roster) -> Vec<CashTrend> {
    roster
        .names()
        .filter_map(|name| {
            let points: Vec<CashPoint> = records
                .iter()
                .filter(|r| r.official_name == name)
                .map(|r| CashPoint {
                    report_period: r.report_period.clone(),
                    year: r.year,
                    cash_on_hand: r.cash_on_hand,
                })
                .collect();
            (!points.is_empty()).then(|| CashTrend {
                official: name.to_string(),
                points,
            })
        })
        .collect()
}
