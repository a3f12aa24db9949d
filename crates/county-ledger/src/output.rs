//! JSON report envelope and writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use ledger_core::settings::Settings;
use ledger_engine::analysis::AnalysisReport;

/// Input files a report was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sources {
    pub finance: PathBuf,
    pub lobbyists: PathBuf,
    pub vendors: PathBuf,
    pub roster: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
}

impl Sources {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            finance: settings.finance.clone(),
            lobbyists: settings.lobbyists.clone(),
            vendors: settings.vendors.clone(),
            roster: settings.roster.clone(),
            config: settings.config.clone(),
        }
    }
}

/// Top-level JSON document written by the CLI.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub sources: Sources,
    pub diagnostics_count: usize,
    pub report: &'a AnalysisReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(sources: Sources, report: &'a AnalysisReport, now: DateTime<Utc>) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            sources,
            diagnostics_count: report.diagnostics.len(),
            report,
        }
    }
}

/// Serialise `envelope` to `output`, or stdout when `None`.
pub fn write_report(envelope: &ReportEnvelope<'_>, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    json.push('\n');

    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledger_core::models::Roster;
    use ledger_core::settings::EngineConfig;
    use ledger_engine::analysis::analyze;
    use ledger_engine::normalizer::DatasetBundle;

    fn sources() -> Sources {
        Sources {
            finance: "finance.csv".into(),
            lobbyists: "lobbyists.csv".into(),
            vendors: "vendors.csv".into(),
            roster: "roster.json".into(),
            config: None,
        }
    }

    #[test]
    fn test_envelope_fields() {
        let report = analyze(&DatasetBundle::default(), &Roster::new(), &EngineConfig::default());
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 12, 30, 0).unwrap();
        let envelope = ReportEnvelope::new(sources(), &report, now);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["tool"], "county-ledger");
        assert_eq!(json["generated_at"], "2025-07-15T12:30:00Z");
        assert_eq!(json["diagnostics_count"], 0);
        assert_eq!(json["sources"]["roster"], "roster.json");
        assert!(json["sources"].get("config").is_none());
        assert!(json["report"]["latest_period"].is_null());
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let report = analyze(&DatasetBundle::default(), &Roster::new(), &EngineConfig::default());
        let envelope = ReportEnvelope::new(sources(), &report, Utc::now());

        write_report(&envelope, Some(&path), true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"tool\""));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_write_report_bad_path() {
        let report = analyze(&DatasetBundle::default(), &Roster::new(), &EngineConfig::default());
        let envelope = ReportEnvelope::new(sources(), &report, Utc::now());
        let result = write_report(&envelope, Some(Path::new("/nonexistent/dir/report.json")), false);
        assert!(result.is_err());
    }
}
