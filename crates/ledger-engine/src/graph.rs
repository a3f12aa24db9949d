//! Relationship graph of officials, lobbyists and vendors.
//!
//! Pure data: nodes with attributes and a size hint, undirected weighted
//! edges. Layout, colours and physics belong to whoever renders it.
//!
//! Lobbyists and vendors are linked to every official. Registrations and
//! contracts are with the governing body as a whole, so no finer-grained
//! attribution is inferred.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use ledger_core::models::{LobbyistRecord, Roster, VendorRecord};

use crate::aggregator::PeriodAggregate;

pub const OFFICIAL_BASE_SIZE: f64 = 40.0;
/// Cash on hand per extra unit of official node size.
pub const OFFICIAL_CASH_PER_SIZE_UNIT: f64 = 200_000.0;
pub const LOBBYIST_SIZE: f64 = 20.0;
pub const VENDOR_SIZE: f64 = 15.0;

pub const LOBBYIST_EDGE_WEIGHT: f64 = 1.0;
pub const VENDOR_EDGE_WEIGHT: f64 = 0.5;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Kind-specific node attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeAttributes {
    Official {
        /// Missing cash is reported as `null` but sized as zero.
        cash_on_hand: Option<f64>,
        party: String,
    },
    Lobbyist {
        client: String,
        category: String,
    },
    Vendor {
        category: String,
        department: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Unique id, namespaced by kind: `official:<name>`, `lobbyist:<name>`,
    /// `vendor:<name>`.
    pub id: String,
    pub label: String,
    /// Relative size hint for the presentation layer.
    pub size: f64,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

/// Undirected edge; `source` is always the lobbyist or vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl RelationshipGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

pub fn official_id(name: &str) -> String {
    format!("official:{name}")
}

pub fn lobbyist_id(name: &str) -> String {
    format!("lobbyist:{name}")
}

pub fn vendor_id(name: &str) -> String {
    format!("vendor:{name}")
}

/// Size hint for an official: `40 + cash_on_hand / 200000`.
pub fn official_size(cash_on_hand: Option<f64>) -> f64 {
    OFFICIAL_BASE_SIZE + cash_on_hand.unwrap_or(0.0) / OFFICIAL_CASH_PER_SIZE_UNIT
}

/// Build the graph from the latest-period aggregate.
///
/// `latest` is expected to come from
/// [`FinanceAggregator::period_aggregate`](crate::aggregator::FinanceAggregator::period_aggregate);
/// entries not on the roster are skipped. Lobbyists and vendors become one
/// node per distinct name, attributed from their first row.
pub fn build_graph(
    latest: &[PeriodAggregate],
    roster: &Roster,
    lobbyists: &[LobbyistRecord],
    vendors: &[VendorRecord],
) -> RelationshipGraph {
    let mut graph = RelationshipGraph::default();
    let mut official_ids: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for agg in latest {
        let Some(profile) = roster.get(&agg.official) else {
            continue;
        };
        let id = official_id(&agg.official);
        if !seen.insert(id.clone()) {
            continue;
        }
        let cash = agg.cash_on_hand.value();
        graph.nodes.push(GraphNode {
            id: id.clone(),
            label: agg.official.clone(),
            size: official_size(cash),
            attributes: NodeAttributes::Official {
                cash_on_hand: cash,
                party: profile.party.clone(),
            },
        });
        official_ids.push(id);
    }

    for lobbyist in lobbyists {
        let id = lobbyist_id(&lobbyist.lobbyist_name);
        if !seen.insert(id.clone()) {
            continue;
        }
        graph.nodes.push(GraphNode {
            id: id.clone(),
            label: lobbyist.lobbyist_name.clone(),
            size: LOBBYIST_SIZE,
            attributes: NodeAttributes::Lobbyist {
                client: lobbyist.client.clone(),
                category: lobbyist.category.clone(),
            },
        });
        connect_to_officials(&mut graph, &id, &official_ids, LOBBYIST_EDGE_WEIGHT, &lobbyist.category);
    }

    for vendor in vendors {
        let id = vendor_id(&vendor.vendor_name);
        if !seen.insert(id.clone()) {
            continue;
        }
        graph.nodes.push(GraphNode {
            id: id.clone(),
            label: vendor.vendor_name.clone(),
            size: VENDOR_SIZE,
            attributes: NodeAttributes::Vendor {
                category: vendor.category.clone(),
                department: vendor.department.clone(),
            },
        });
        connect_to_officials(&mut graph, &id, &official_ids, VENDOR_EDGE_WEIGHT, &vendor.category);
    }

    debug!(
        "build_graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

fn connect_to_officials(
    graph: &mut RelationshipGraph,
    source: &str,
    official_ids: &[String],
    weight: f64,
    label: &str,
) {
    graph.edges.extend(official_ids.iter().map(|target| GraphEdge {
        source: source.to_string(),
        target: target.clone(),
        weight,
        label: label.to_string(),
    }));
}

// ── Tests ─────────────────────────────────────────────────────────────────────
