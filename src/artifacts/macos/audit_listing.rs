use anyhow::Result;
use chrono::{DateTime, Utc};
use log::error;
use walkdir::WalkDir;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::constants::{AUDIT_LOG_DIR, REPORT_LOGS};
use crate::report::ReportSection;

/// Inventory of BSM audit trail files under `/private/var/audit`.
///
/// The binary trails themselves need `praudit` to decode; this only lists
/// what exists so the analyst knows which trails to pull.
pub struct AuditListingExtractor;

impl ArtifactExtractor for AuditListingExtractor {
    fn name(&self) -> &'static str {
        "Audit Trails"
    }

    fn description(&self) -> &'static str {
        "BSM audit trail file inventory"
    }

    fn report_name(&self) -> &'static str {
        REPORT_LOGS
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let mut section = ReportSection::new(self.name());

        let dir = ctx.config.evidence_path(AUDIT_LOG_DIR);
        if !dir.is_dir() {
            section.missing(&dir);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&dir);

        let mut trails = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!("[audit] walk error under {}: {err}", dir.display());
                    section.parse_error(err);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                trails.push(entry);
            }
        }

        for trail in trails {
            section.field("Trail", trail.file_name().to_string_lossy());
            match trail.metadata() {
                Ok(meta) => {
                    section.field("Size", format!("{} bytes", meta.len()));
                    if let Ok(modified) = meta.modified() {
                        let modified: DateTime<Utc> = modified.into();
                        section.field("Modified", modified.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
                Err(err) => {
                    error!("[audit] {err}");
                    section.parse_error(err);
                }
            }
            section.blank();
        }

        ctx.append(self.report_name(), &section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DispatchMode, MacosVersion, RunConfig};
    use std::fs;
    use tempfile::TempDir;

    fn run(root: &TempDir) -> String {
        let out = root.path().join("reports");
        let config = RunConfig::new(
            root.path(),
            &out,
            MacosVersion::Catalina,
            DispatchMode::Sequential,
        );
        let ctx = RunContext::new(config).unwrap();
        AuditListingExtractor.extract(&ctx).unwrap();
        fs::read_to_string(out.join(REPORT_LOGS)).unwrap()
    }

    #[test]
    fn test_trails_listed_with_sizes() {
        let root = TempDir::new().unwrap();
        let audit = root.path().join(AUDIT_LOG_DIR);
        fs::create_dir_all(&audit).unwrap();
        fs::write(audit.join("20200126022401.20200126031530"), vec![0u8; 640]).unwrap();
        fs::write(audit.join("current"), vec![0u8; 64]).unwrap();

        let report = run(&root);
        assert!(report.contains("Trail: 20200126022401.20200126031530"));
        assert!(report.contains("Size: 640 bytes"));
        assert!(report.contains("Trail: current"));
        assert!(report.contains("Size: 64 bytes"));
        assert!(report.contains("Modified: "));
    }

    #[test]
    fn test_missing_audit_directory() {
        let root = TempDir::new().unwrap();
        let report = run(&root);
        assert!(report.contains("does not exist"));
    }
}
