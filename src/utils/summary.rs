//! Machine-readable run summary written alongside the reports.

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

use crate::artifacts::dispatch::RunDiagnostic;
use crate::artifacts::version::RawSystemVersion;
use crate::config::RunConfig;

/// Write `run_summary.json` into the output directory: run identity, the
/// detected release, per-extractor outcomes, and the reports touched.
pub fn create_run_summary(
    config: &RunConfig,
    raw_version: &RawSystemVersion,
    diagnostics: &[RunDiagnostic],
    touched_reports: &[String],
) -> Result<()> {
    let failed = diagnostics
        .iter()
        .filter(|d| d.outcome != crate::artifacts::dispatch::Outcome::Completed)
        .count();

    let summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "completed_at": Utc::now().to_rfc3339(),
        "input": config.input.display().to_string(),
        "output": config.output.display().to_string(),
        "dispatch_mode": config.mode.to_string(),
        "os_version": {
            "product_version": raw_version.product_version,
            "product_name": raw_version.product_name,
            "build_version": raw_version.build_version,
            "detected": config.os_version,
        },
        "extractors_run": diagnostics.len(),
        "extractors_failed": failed,
        "diagnostics": diagnostics,
        "reports": touched_reports,
    });

    let path = config.output.join("run_summary.json");
    write_summary(&path, &summary)?;
    info!("Run summary written to {}", path.display());
    Ok(())
}

fn write_summary(path: &Path, summary: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(summary).context("serializing run summary")?;
    std::fs::write(path, text)
        .with_context(|| format!("writing run summary to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::dispatch::Outcome;
    use crate::config::{DispatchMode, MacosVersion};
    use tempfile::TempDir;

    #[test]
    fn test_summary_records_outcomes_and_reports() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::new(
            dir.path(),
            dir.path(),
            MacosVersion::Catalina,
            DispatchMode::Parallel,
        );
        let raw = RawSystemVersion {
            product_version: "10.15.7".to_string(),
            product_name: Some("Mac OS X".to_string()),
            build_version: Some("19H2".to_string()),
        };
        let diagnostics = vec![
            RunDiagnostic {
                extractor: "System Version".to_string(),
                report: "System.txt".to_string(),
                outcome: Outcome::Completed,
            },
            RunDiagnostic {
                extractor: "DHCP Leases".to_string(),
                report: "Networking.txt".to_string(),
                outcome: Outcome::Failed("boom".to_string()),
            },
        ];
        let reports = vec!["Networking.txt".to_string(), "System.txt".to_string()];

        create_run_summary(&config, &raw, &diagnostics, &reports).unwrap();

        let text = std::fs::read_to_string(dir.path().join("run_summary.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["extractors_run"], 2);
        assert_eq!(parsed["extractors_failed"], 1);
        assert_eq!(parsed["os_version"]["product_version"], "10.15.7");
        assert_eq!(parsed["os_version"]["detected"], "Catalina");
        assert_eq!(parsed["reports"][1], "System.txt");
        assert!(!parsed["run_id"].as_str().unwrap().is_empty());
    }
}
