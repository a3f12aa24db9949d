//! Analytics layer for County Ledger.
//!
//! Normalises raw finance, lobbyist and vendor rows, then derives the
//! aggregates, client/vendor overlaps, relationship graph, money-flow
//! allocation and anomaly flags consumed by a presentation layer.

pub mod aggregator;
pub mod analysis;
pub mod anomaly;
pub mod explorer;
pub mod flow;
pub mod graph;
pub mod normalizer;
pub mod overlap;

pub use ledger_core as core;
