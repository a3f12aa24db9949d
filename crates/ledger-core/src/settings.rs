use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};

// ── Thresholds ─────────────────────────────────────────────────────────────────

/// Minimum number of shared name tokens for a client/vendor overlap.
pub const MIN_SHARED_TOKENS: usize = 2;

/// Lifetime spent/raised ratio above which an official is flagged.
pub const SPEND_RATIO_THRESHOLD: f64 = 1.2;

/// Share of all vendors above which the dominant category is flagged.
pub const CONCENTRATION_THRESHOLD: f64 = 0.5;

/// Heuristic cut-offs for the overlap and anomaly rules.
///
/// None of these have a statistical derivation; they are kept tunable so a
/// caller can adjust them without touching the rules themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub min_shared_tokens: usize,
    pub spend_ratio: f64,
    pub vendor_concentration: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_shared_tokens: MIN_SHARED_TOKENS,
            spend_ratio: SPEND_RATIO_THRESHOLD,
            vendor_concentration: CONCENTRATION_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Reject values that would make a rule meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.min_shared_tokens == 0 {
            return Err(LedgerError::Config(
                "min_shared_tokens must be at least 1".to_string(),
            ));
        }
        if !self.spend_ratio.is_finite() || self.spend_ratio <= 0.0 {
            return Err(LedgerError::Config(format!(
                "spend_ratio must be a positive number, got {}",
                self.spend_ratio
            )));
        }
        if !(0.0..1.0).contains(&self.vendor_concentration) {
            return Err(LedgerError::Config(format!(
                "vendor_concentration must be in [0, 1), got {}",
                self.vendor_concentration
            )));
        }
        Ok(())
    }
}

// ── EngineConfig ───────────────────────────────────────────────────────────────

/// Engine configuration loaded from an optional JSON file.
///
/// ```json
/// { "latest_period": "July 2025", "thresholds": { "spend_ratio": 1.5 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Report period treated as "latest". When absent, the first record's
    /// period is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_period: Option<String>,
    pub thresholds: Thresholds,
}

impl EngineConfig {
    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LedgerError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.thresholds.validate()?;
        Ok(config)
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Money-in-politics analytics for a county governing body
#[derive(Parser, Debug, Clone)]
#[command(
    name = "county-ledger",
    about = "Money-in-politics analytics for a county governing body",
    version
)]
pub struct Settings {
    /// Campaign-finance CSV
    #[arg(long)]
    pub finance: PathBuf,

    /// Lobbyist registrations CSV
    #[arg(long)]
    pub lobbyists: PathBuf,

    /// County vendors CSV
    #[arg(long)]
    pub vendors: PathBuf,

    /// Roster JSON: official name -> profile
    #[arg(long)]
    pub roster: PathBuf,

    /// Engine config JSON (thresholds, latest period)
    #[arg(long, env = "COUNTY_LEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report period to treat as latest (overrides config)
    #[arg(long)]
    pub latest_period: Option<String>,

    /// Write the report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Resolve the effective engine config: the config file when given
    /// (defaults otherwise), with `--latest-period` taking precedence.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from(path)?,
            None => EngineConfig::default(),
        };
        if let Some(period) = &self.latest_period {
            config.latest_period = Some(period.clone());
        }
        Ok(config)
    }

    /// Effective log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
