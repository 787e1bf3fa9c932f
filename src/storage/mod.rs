//! Report export.
//!
//! Writes a finished run's report to a JSON file and reads it back for
//! inspection. Runs never resume from a saved report.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::report::SimulationReport;

/// Default report file path.
pub const DEFAULT_REPORT_FILE: &str = "roulette_report.json";

/// Save a report as pretty-printed JSON.
pub fn save_report(report: &SimulationReport, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_REPORT_FILE);
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialise simulation report")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write report to {path}"))?;

    info!(
        path,
        run_id = %report.run_id,
        spins = report.total_spins,
        final_balance = %report.final_balance,
        "Report saved"
    );
    Ok(())
}

/// Load a previously exported report.
/// Returns None if the file doesn't exist.
pub fn load_report(path: &str) -> Result<Option<SimulationReport>> {
    if !Path::new(path).exists() {
        debug!(path, "No report file found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read report from {path}"))?;

    let report: SimulationReport = serde_json::from_str(&json)
        .context(format!("Failed to parse report from {path}"))?;

    debug!(path, run_id = %report.run_id, "Report loaded");
    Ok(Some(report))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
