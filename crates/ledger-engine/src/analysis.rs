//! Top-level analysis pipeline.
//!
//! Runs every analytical component over one normalised [`DatasetBundle`]
//! and returns an [`AnalysisReport`] ready for a presentation layer. The
//! components share nothing mutable, so they run side by side via
//! `rayon::join`.

use serde::Serialize;
use tracing::{debug, info};

use ledger_core::models::{FinancialRecord, Roster};
use ledger_core::settings::EngineConfig;

use crate::aggregator::{CategoryCount, FinanceAggregator, LifetimeAggregate, PeriodAggregate, PeriodSummary};
use crate::anomaly::{detect_anomalies, AnomalyReport};
use crate::explorer::{cash_trends, official_names, report_years, CashTrend};
use crate::flow::{allocate_flows, FlowBucket, FlowEdge};
use crate::graph::{build_graph, RelationshipGraph};
use crate::normalizer::{DatasetBundle, Diagnostic};
use crate::overlap::{client_vendor_overlaps, Overlap};

// ── Public types ──────────────────────────────────────────────────────────────

/// One Stage 2 flow bucket with its display label and fixed share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketInfo {
    pub bucket: FlowBucket,
    pub label: &'static str,
    pub share: f64,
}

/// Counts describing the input that produced a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub finance_records: usize,
    pub lobbyist_records: usize,
    pub vendor_records: usize,
    pub rows_dropped: usize,
    pub officials_tracked: usize,
}

/// Every derived artifact for one dataset bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// `None` when there are no finance records and none was configured.
    pub latest_period: Option<String>,
    pub metadata: AnalysisMetadata,
    pub summary: Option<PeriodSummary>,
    pub latest: Vec<PeriodAggregate>,
    pub lifetimes: Vec<LifetimeAggregate>,
    pub cash_trends: Vec<CashTrend>,
    pub official_names: Vec<String>,
    pub report_years: Vec<i32>,
    pub lobbyist_categories: Vec<CategoryCount>,
    pub vendor_categories: Vec<CategoryCount>,
    pub overlaps: Vec<Overlap>,
    pub graph: RelationshipGraph,
    pub flow_buckets: Vec<BucketInfo>,
    pub flows: Vec<FlowEdge>,
    pub anomalies: AnomalyReport,
    pub diagnostics: Vec<Diagnostic>,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis.
///
/// 1. Resolve the latest period (configured, else first record).
/// 2. Aggregate the latest period for the roster.
/// 3. In parallel: overlaps, graph, flows, anomalies, and the browsing
///    views (lifetimes, trends, selectors, category counts).
pub fn analyze(bundle: &DatasetBundle, roster: &Roster, config: &EngineConfig) -> AnalysisReport {
    let records = bundle.finance.as_slice();
    let thresholds = &config.thresholds;

    let latest_period =
        FinanceAggregator::resolve_latest_period(records, config.latest_period.as_deref());
    let latest = latest_period
        .as_deref()
        .map(|p| FinanceAggregator::period_aggregate(records, p, roster))
        .unwrap_or_default();

    debug!(
        "analyze: latest period {:?}, {} roster officials reporting",
        latest_period,
        latest.len()
    );

    let ((overlaps, graph), ((flows, anomalies), views)) = rayon::join(
        || {
            rayon::join(
                || client_vendor_overlaps(&bundle.lobbyists, &bundle.vendors, thresholds.min_shared_tokens),
                || build_graph(&latest, roster, &bundle.lobbyists, &bundle.vendors),
            )
        },
        || {
            rayon::join(
                || {
                    rayon::join(
                        || allocate_flows(&latest, roster),
                        || detect_anomalies(records, &latest, roster, &bundle.vendors, thresholds),
                    )
                },
                || browsing_views(bundle, records, roster, latest_period.as_deref()),
            )
        },
    );

    let report = AnalysisReport {
        latest_period,
        metadata: AnalysisMetadata {
            finance_records: bundle.finance.len(),
            lobbyist_records: bundle.lobbyists.len(),
            vendor_records: bundle.vendors.len(),
            rows_dropped: bundle.diagnostics.len(),
            officials_tracked: roster.len(),
        },
        summary: views.summary,
        latest,
        lifetimes: views.lifetimes,
        cash_trends: views.cash_trends,
        official_names: views.official_names,
        report_years: views.report_years,
        lobbyist_categories: views.lobbyist_categories,
        vendor_categories: views.vendor_categories,
        overlaps,
        graph,
        flow_buckets: FlowBucket::ALL
            .iter()
            .map(|&bucket| BucketInfo {
                bucket,
                label: bucket.label(),
                share: bucket.share(),
            })
            .collect(),
        flows,
        anomalies,
        diagnostics: bundle.diagnostics.clone(),
    };

    info!(
        "Analysis complete: {} overlaps, {} graph nodes, {} flow edges, {} deficit flags",
        report.overlaps.len(),
        report.graph.node_count(),
        report.flows.len(),
        report.anomalies.deficit_spenders.len()
    );
    report
}

// ── Private helpers ───────────────────────────────────────────────────────────

struct BrowsingViews {
    summary: Option<PeriodSummary>,
    lifetimes: Vec<LifetimeAggregate>,
    cash_trends: Vec<CashTrend>,
    official_names: Vec<String>,
    report_years: Vec<i32>,
    lobbyist_categories: Vec<CategoryCount>,
    vendor_categories: Vec<CategoryCount>,
}

fn browsing_views(
    bundle: &DatasetBundle,
    records: &[FinancialRecord],
    roster: &Roster,
    latest_period: Option<&str>,
) -> BrowsingViews {
    BrowsingViews {
        summary: latest_period.map(|p| FinanceAggregator::period_summary(records, p, roster)),
        lifetimes: FinanceAggregator::roster_lifetimes(records, roster),
        cash_trends: cash_trends(records, roster),
        official_names: official_names(records),
        report_years: report_years(records),
        lobbyist_categories: FinanceAggregator::category_counts(
            bundle.lobbyists.iter().map(|l| l.category.as_str()),
        ),
        vendor_categories: FinanceAggregator::category_counts(
            bundle.vendors.iter().map(|v| v.category.as_str()),
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_all;
    use ledger_core::models::OfficialProfile;
    use serde_json::json;

    fn roster() -> Roster {
        Roster::from_profiles(["Jane Doe", "John Roe"].iter().map(|n| OfficialProfile {
            name: n.to_string(),
            party: "D".into(),
            office_since: 2019,
            notes: String::new(),
            position: None,
        }))
    }

    fn bundle() -> DatasetBundle {
        normalize_all(
            &[
                json!({"ReportPeriod": "July 2025", "Year": 2025, "Name": "Jane Doe",
                       "Position": "County Judge", "Raised": "100000", "Spent": "150000",
                       "Loans": "0", "CashOnHand": "800000"}),
                json!({"ReportPeriod": "July 2025", "Year": 2025, "Name": "John Roe",
                       "Raised": 50000, "Spent": 10000, "Loans": 20000, "CashOnHand": 100000}),
                json!({"ReportPeriod": "January 2025", "Year": 2025, "Name": "Jane Doe",
                       "Raised": 10, "Spent": 10}),
                json!({"ReportPeriod": "July 2025", "Year": 2025, "Name": ""}),
            ],
            &[
                json!({"Lobbyist": "Pat Smith", "Client": "ACME CONSULTING LLC", "Category": "Consulting"}),
            ],
            &[
                json!({"Vendor": "ACME CONSULTING SERVICES INC", "Category": "Consulting", "Department": "Budget"}),
                json!({"Vendor": "Gulf Paving", "Category": "Construction", "Department": "Engineering"}),
            ],
        )
    }

    #[test]
    fn test_analyze_end_to_end() {
        let report = analyze(&bundle(), &roster(), &EngineConfig::default());

        assert_eq!(report.latest_period.as_deref(), Some("July 2025"));
        assert_eq!(report.metadata.finance_records, 3);
        assert_eq!(report.metadata.rows_dropped, 1);
        assert_eq!(report.latest.len(), 2);
        assert_eq!(report.overlaps.len(), 1);
        // 2 officials + 1 lobbyist + 2 vendors; 3 non-official nodes x 2 officials
        assert_eq!(report.graph.node_count(), 5);
        assert_eq!(report.graph.edge_count(), 6);
        // 2 donor edges + 4 buckets each
        assert_eq!(report.flows.len(), 10);
        assert_eq!(report.flow_buckets.len(), 4);
        assert_eq!(report.anomalies.deficit_spenders.len(), 1);
        assert_eq!(report.anomalies.deficit_spenders[0].deficit, 50_000.0);
        assert_eq!(report.anomalies.self_funded.len(), 1);
        assert_eq!(report.anomalies.self_funded[0].official, "John Roe");
        assert!(report.anomalies.vendor_concentration.is_none());

        let summary = report.summary.as_ref().unwrap();
        assert_eq!(summary.total_raised, 150_000.0);
        assert_eq!(summary.total_cash_on_hand, 900_000.0);
        assert_eq!(summary.officials_tracked, 2);
    }

    #[test]
    fn test_analyze_configured_period() {
        let config = EngineConfig {
            latest_period: Some("January 2025".into()),
            ..Default::default()
        };
        let report = analyze(&bundle(), &roster(), &config);
        assert_eq!(report.latest.len(), 1);
        assert!(report.anomalies.deficit_spenders.is_empty());
    }

    #[test]
    fn test_analyze_empty_bundle() {
        let report = analyze(&DatasetBundle::default(), &Roster::new(), &EngineConfig::default());
        assert!(report.latest_period.is_none());
        assert!(report.summary.is_none());
        assert!(report.latest.is_empty());
        assert_eq!(report.graph.node_count(), 0);
        assert!(report.flows.is_empty());
    }

    #[test]
    fn test_analyze_is_deterministic_and_serializable() {
        let a = analyze(&bundle(), &roster(), &EngineConfig::default());
        let b = analyze(&bundle(), &roster(), &EngineConfig::default());
        assert_eq!(a, b);

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["latest_period"], "July 2025");
        assert!(json["graph"]["nodes"].is_array());
        assert_eq!(json["flow_buckets"][0]["label"], "Campaign Operations");
    }
}
