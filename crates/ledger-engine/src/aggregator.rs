//! Per-official aggregation over report periods.
//!
//! Every reduction here is order-independent: groups are keyed by name in a
//! `BTreeMap` and floating-point sums run over sorted values, so permuting
//! the input records never changes an aggregate.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use ledger_core::calculations::FinanceCalculator;
use ledger_core::models::{Amount, AmountField, FinancialRecord, Roster};

/// How many rows the "top fundraisers" and "war chest" views show.
pub const TOP_N_DEFAULT: usize = 5;

// ── Result types ──────────────────────────────────────────────────────────────

/// One roster official's figures for a single report period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub official: String,
    pub position: String,
    pub raised: Amount,
    pub spent: Amount,
    pub loans: Amount,
    pub cash_on_hand: Amount,
    /// `max(spent - raised, 0)`; missing when either side is missing.
    pub deficit: Amount,
}

/// Totals across every period on file for one official.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifetimeAggregate {
    pub official: String,
    pub total_raised: f64,
    pub total_spent: f64,
    /// `total_spent / total_raised`; absent when nothing was raised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

/// Headline figures for one period, scoped to the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub total_raised: f64,
    pub total_spent: f64,
    pub total_cash_on_hand: f64,
    pub officials_tracked: usize,
    pub top_fundraisers: Vec<FinancialRecord>,
    pub largest_war_chests: Vec<FinancialRecord>,
}

/// Frequency of one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

// ── FinanceAggregator ─────────────────────────────────────────────────────────

/// Stateless helper grouping filings by official and period.
pub struct FinanceAggregator;

impl FinanceAggregator {
    /// The latest report period: the period of the first record, since the
    /// source lists filings newest first.
    pub fn latest_period(records: &[FinancialRecord]) -> Option<&str> {
        records.first().map(|r| r.report_period.as_str())
    }

    /// Use `configured` when set, otherwise [`Self::latest_period`].
    pub fn resolve_latest_period(
        records: &[FinancialRecord],
        configured: Option<&str>,
    ) -> Option<String> {
        configured
            .or_else(|| Self::latest_period(records))
            .map(str::to_string)
    }

    /// Figures for each roster official that filed in `period`, sorted by
    /// official name.
    ///
    /// There is normally one filing per official per period. Should the data
    /// repeat one, the amounts are summed so the result still does not depend
    /// on record order.
    pub fn period_aggregate(
        records: &[FinancialRecord],
        period: &str,
        roster: &Roster,
    ) -> Vec<PeriodAggregate> {
        let mut groups: BTreeMap<&str, Vec<&FinancialRecord>> = BTreeMap::new();
        for record in records {
            if record.report_period == period && roster.contains(&record.official_name) {
                groups
                    .entry(record.official_name.as_str())
                    .or_default()
                    .push(record);
            }
        }

        let aggregates: Vec<PeriodAggregate> = groups
            .into_iter()
            .map(|(official, filings)| {
                let raised = combine(filings.iter().map(|r| r.raised));
                let spent = combine(filings.iter().map(|r| r.spent));
                PeriodAggregate {
                    official: official.to_string(),
                    position: filings
                        .iter()
                        .map(|r| r.position.as_str())
                        .min()
                        .unwrap_or_default()
                        .to_string(),
                    raised,
                    spent,
                    loans: combine(filings.iter().map(|r| r.loans)),
                    cash_on_hand: combine(filings.iter().map(|r| r.cash_on_hand)),
                    deficit: FinanceCalculator::deficit(raised, spent),
                }
            })
            .collect();

        debug!(
            "period_aggregate: {} officials in period \"{}\"",
            aggregates.len(),
            period
        );
        aggregates
    }

    /// Sum `raised` and `spent` over every filing by `official`. Missing
    /// amounts count as zero.
    pub fn lifetime_aggregate(records: &[FinancialRecord], official: &str) -> LifetimeAggregate {
        let filings: Vec<&FinancialRecord> = records
            .iter()
            .filter(|r| r.official_name == official)
            .collect();

        let total_raised = sum_sorted(filings.iter().map(|r| r.raised.or_zero()));
        let total_spent = sum_sorted(filings.iter().map(|r| r.spent.or_zero()));

        LifetimeAggregate {
            official: official.to_string(),
            total_raised,
            total_spent,
            ratio: FinanceCalculator::spend_ratio(total_raised, total_spent),
        }
    }

    /// Lifetime aggregates for every roster official with at least one
    /// filing, sorted by name.
    pub fn roster_lifetimes(records: &[FinancialRecord], roster: &Roster) -> Vec<LifetimeAggregate> {
        roster
            .names()
            .filter(|name| records.iter().any(|r| r.official_name == *name))
            .map(|name| Self::lifetime_aggregate(records, name))
            .collect()
    }

    /// The `n` roster filings in `period` with the largest `field`.
    ///
    /// Filings with `field` missing are skipped. Ties keep input order.
    pub fn top_n(
        records: &[FinancialRecord],
        period: &str,
        roster: &Roster,
        field: AmountField,
        n: usize,
    ) -> Vec<FinancialRecord> {
        let mut candidates: Vec<(f64, &FinancialRecord)> = records
            .iter()
            .filter(|r| r.report_period == period && roster.contains(&r.official_name))
            .filter_map(|r| field.get(r).value().map(|v| (v, r)))
            .collect();

        // `sort_by` is stable, which gives the tie-break.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates
            .into_iter()
            .take(n)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Headline totals and top lists for `period`.
    pub fn period_summary(
        records: &[FinancialRecord],
        period: &str,
        roster: &Roster,
    ) -> PeriodSummary {
        let current = Self::period_aggregate(records, period, roster);
        PeriodSummary {
            period: period.to_string(),
            total_raised: sum_sorted(current.iter().map(|a| a.raised.or_zero())),
            total_spent: sum_sorted(current.iter().map(|a| a.spent.or_zero())),
            total_cash_on_hand: sum_sorted(current.iter().map(|a| a.cash_on_hand.or_zero())),
            officials_tracked: roster.len(),
            top_fundraisers: Self::top_n(records, period, roster, AmountField::Raised, TOP_N_DEFAULT),
            largest_war_chests: Self::top_n(
                records,
                period,
                roster,
                AmountField::CashOnHand,
                TOP_N_DEFAULT,
            ),
        }
    }

    /// Frequency of each label, most frequent first, ties by label.
    pub fn category_counts<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<CategoryCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for category in categories {
            *counts.entry(category).or_default() += 1;
        }

        let mut out: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        out
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Sum after sorting so the result is independent of iteration order.
fn sum_sorted(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Merge repeated filings: missing only when every filing is missing.
fn combine(amounts: impl Iterator<Item = Amount>) -> Amount {
    let present: Vec<f64> = amounts.filter_map(Amount::value).collect();
    if present.is_empty() {
        Amount::MISSING
    } else {
        Amount::new(sum_sorted(present.into_iter()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
