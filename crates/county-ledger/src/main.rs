mod bootstrap;
mod loader;
mod output;

use anyhow::Result;
use clap::Parser;
use ledger_core::settings::Settings;
use ledger_engine::analysis::analyze;
use ledger_engine::normalizer::{normalize_all, Dataset};

use crate::output::{ReportEnvelope, Sources};

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("County Ledger v{} starting", env!("CARGO_PKG_VERSION"));

    let config = settings.engine_config()?;

    let finance_rows = loader::load_csv_rows(&settings.finance, Dataset::Finance)?;
    let lobbyist_rows = loader::load_csv_rows(&settings.lobbyists, Dataset::Lobbyists)?;
    let vendor_rows = loader::load_csv_rows(&settings.vendors, Dataset::Vendors)?;
    let roster = loader::load_roster(&settings.roster)?;

    let bundle = normalize_all(&finance_rows, &lobbyist_rows, &vendor_rows);
    if !bundle.diagnostics.is_empty() {
        tracing::warn!("{} rows dropped during normalisation", bundle.diagnostics.len());
    }

    let report = analyze(&bundle, &roster, &config);
    if report.latest_period.is_none() {
        tracing::warn!("No finance records; period views are empty");
    }

    let envelope = ReportEnvelope::new(Sources::from_settings(&settings), &report, chrono::Utc::now());
    output::write_report(&envelope, settings.output.as_deref(), settings.pretty)?;

    if let Some(path) = &settings.output {
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}
