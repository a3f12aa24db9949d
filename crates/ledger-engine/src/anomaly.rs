//! Fixed-threshold anomaly rules.
//!
//! Each rule is independent and reads only normalised records (or the
//! latest-period aggregate); none consumes another rule's output.

use serde::Serialize;
use tracing::debug;

use ledger_core::calculations::FinanceCalculator;
use ledger_core::models::{FinancialRecord, Roster, VendorRecord};
use ledger_core::settings::Thresholds;

use crate::aggregator::{FinanceAggregator, PeriodAggregate};

// ── Flags ─────────────────────────────────────────────────────────────────────

/// Latest-period filing where spending exceeded fundraising.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficitFlag {
    pub official: String,
    pub position: String,
    pub raised: f64,
    pub spent: f64,
    pub deficit: f64,
}

/// Official whose lifetime spending outpaces lifetime fundraising.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendRatioFlag {
    pub official: String,
    pub ratio: f64,
    pub total_raised: f64,
    pub total_spent: f64,
}

/// Latest-period filing carrying outstanding loans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfFundingFlag {
    pub official: String,
    pub position: String,
    pub loans: f64,
}

/// A vendor category holding more than the threshold share of all vendors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationFlag {
    pub category: String,
    pub count: usize,
    pub total: usize,
    pub share: f64,
}

/// Output of every rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub deficit_spenders: Vec<DeficitFlag>,
    pub spend_ratio: Vec<SpendRatioFlag>,
    pub self_funded: Vec<SelfFundingFlag>,
    pub vendor_concentration: Option<ConcentrationFlag>,
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Officials with `spent > raised` in the latest period. Filings missing
/// either figure are not flagged.
pub fn deficit_spenders(latest: &[PeriodAggregate]) -> Vec<DeficitFlag> {
    latest
        .iter()
        .filter_map(|agg| {
            let (raised, spent) = (agg.raised.value()?, agg.spent.value()?);
            (spent > raised).then(|| DeficitFlag {
                official: agg.official.clone(),
                position: agg.position.clone(),
                raised,
                spent,
                deficit: spent - raised,
            })
        })
        .collect()
}

/// Roster officials whose lifetime spent/raised ratio exceeds
/// `threshold`. Officials who never raised anything have no ratio and are
/// never flagged.
pub fn spend_ratio_anomalies(
    records: &[FinancialRecord],
    roster: &Roster,
    threshold: f64,
) -> Vec<SpendRatioFlag> {
    FinanceAggregator::roster_lifetimes(records, roster)
        .into_iter()
        .filter_map(|life| {
            let ratio = life.ratio?;
            (ratio > threshold).then_some(SpendRatioFlag {
                official: life.official,
                ratio,
                total_raised: life.total_raised,
                total_spent: life.total_spent,
            })
        })
        .collect()
}

/// Latest-period filings with `loans > 0`, largest loan first.
pub fn self_funded(latest: &[PeriodAggregate]) -> Vec<SelfFundingFlag> {
    let mut flags: Vec<SelfFundingFlag> = latest
        .iter()
        .filter(|agg| agg.loans.is_positive())
        .map(|agg| SelfFundingFlag {
            official: agg.official.clone(),
            position: agg.position.clone(),
            loans: agg.loans.or_zero(),
        })
        .collect();
    flags.sort_by(|a, b| b.loans.total_cmp(&a.loans));
    flags
}

/// The most common vendor category, when its share exceeds `threshold`.
pub fn vendor_concentration(vendors: &[VendorRecord], threshold: f64) -> Option<ConcentrationFlag> {
    let counts = FinanceAggregator::category_counts(vendors.iter().map(|v| v.category.as_str()));
    let top = counts.into_iter().next()?;
    let share = FinanceCalculator::share(top.count, vendors.len())?;

    (share > threshold).then(|| ConcentrationFlag {
        category: top.category,
        count: top.count,
        total: vendors.len(),
        share,
    })
}

/// Run every rule.
pub fn detect_anomalies(
    records: &[FinancialRecord],
    latest: &[PeriodAggregate],
    roster: &Roster,
    vendors: &[VendorRecord],
    thresholds: &Thresholds,
) -> AnomalyReport {
    let report = AnomalyReport {
        deficit_spenders: deficit_spenders(latest),
        spend_ratio: spend_ratio_anomalies(records, roster, thresholds.spend_ratio),
        self_funded: self_funded(latest),
        vendor_concentration: vendor_concentration(vendors, thresholds.vendor_concentration),
    };
    debug!(
        "detect_anomalies: {} deficit, {} ratio, {} self-funded, concentration={}",
        report.deficit_spenders.len(),
        report.spend_ratio.len(),
        report.self_funded.len(),
        report.vendor_concentration.is_some()
    );
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
