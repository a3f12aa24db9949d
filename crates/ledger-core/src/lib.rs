//! Shared foundations for County Ledger.
//!
//! Holds the typed record model, raw-cell coercion, the small arithmetic
//! rules reused across the analytics engine, the error type and the
//! configuration surface (engine thresholds and CLI settings).

pub mod calculations;
pub mod data_processors;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{LedgerError, Result};
