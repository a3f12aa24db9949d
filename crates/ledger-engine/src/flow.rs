//! Two-stage money-flow decomposition for the latest period.
//!
//! Stage 1 routes each official's `raised` from a synthetic donor source.
//! Stage 2 splits each official's `spent` over fixed category buckets. The
//! bucket proportions are an estimation method, not measured expenditure
//! data.

use serde::Serialize;
use tracing::debug;

use crate::aggregator::PeriodAggregate;
use ledger_core::models::Roster;

// ── FlowBucket ────────────────────────────────────────────────────────────────

/// Estimated expenditure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowBucket {
    CampaignOperations,
    AdvertisingMedia,
    Consulting,
    Other,
}

impl FlowBucket {
    pub const ALL: [FlowBucket; 4] = [
        FlowBucket::CampaignOperations,
        FlowBucket::AdvertisingMedia,
        FlowBucket::Consulting,
        FlowBucket::Other,
    ];

    /// Fixed proportion of spending assigned to this bucket. The four
    /// shares sum to exactly 1.0.
    pub fn share(self) -> f64 {
        match self {
            FlowBucket::CampaignOperations => 0.40,
            FlowBucket::AdvertisingMedia => 0.30,
            FlowBucket::Consulting => 0.20,
            FlowBucket::Other => 0.10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlowBucket::CampaignOperations => "Campaign Operations",
            FlowBucket::AdvertisingMedia => "Advertising & Media",
            FlowBucket::Consulting => "Consulting",
            FlowBucket::Other => "Other",
        }
    }
}

// ── Flow types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FlowNode {
    Donors,
    Official(String),
    Category(FlowBucket),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    pub source: FlowNode,
    pub target: FlowNode,
    pub value: f64,
}

// ── Allocation ────────────────────────────────────────────────────────────────

/// Allocate flows for the roster officials in `latest`.
///
/// Every official gets a Stage 1 edge, worth 0 when nothing was reported
/// raised. Stage 2 edges appear only when `spent > 0`; their values sum to
/// `spent`.
pub fn allocate_flows(latest: &[PeriodAggregate], roster: &Roster) -> Vec<FlowEdge> {
    let mut edges = Vec::new();

    for agg in latest.iter().filter(|a| roster.contains(&a.official)) {
        let official = FlowNode::Official(agg.official.clone());

        edges.push(FlowEdge {
            source: FlowNode::Donors,
            target: official.clone(),
            value: agg.raised.or_zero(),
        });

        let spent = agg.spent.or_zero();
        if spent <= 0.0 {
            continue;
        }
        edges.extend(split_spending(spent).into_iter().map(|(bucket, value)| FlowEdge {
            source: official.clone(),
            target: FlowNode::Category(bucket),
            value,
        }));
    }

    debug!("allocate_flows: {} edges", edges.len());
    edges
}

/// Split `spent` across [`FlowBucket::ALL`] by their fixed shares.
pub fn split_spending(spent: f64) -> [(FlowBucket, f64); 4] {
    FlowBucket::ALL.map(|bucket| (bucket, spent * bucket.share()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
