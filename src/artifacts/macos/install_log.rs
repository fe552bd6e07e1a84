use anyhow::Result;
use log::error;
use std::path::Path;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::constants::{INSTALL_LOG, LOG_TAIL_LINES, REPORT_LOGS};
use crate::parsers::gzip::read_gzip_text;
use crate::report::ReportSection;

/// The installer log and its gzip-rotated generations from
/// `/private/var/log`. Each file contributes its line count, first entry
/// and a short tail.
pub struct InstallLogExtractor;

impl InstallLogExtractor {
    fn summarize(&self, section: &mut ReportSection, path: &Path, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        section.field("Log File", path.display());
        section.field("Entries", lines.len());
        if let Some(first) = lines.first() {
            section.field("First Entry", first);
        }
        if !lines.is_empty() {
            section.line("Most recent entries:");
            let tail_start = lines.len().saturating_sub(LOG_TAIL_LINES);
            for line in &lines[tail_start..] {
                section.line(&format!("  {line}"));
            }
        }
        section.blank();
    }
}

impl ArtifactExtractor for InstallLogExtractor {
    fn name(&self) -> &'static str {
        "Install Log"
    }

    fn description(&self) -> &'static str {
        "Installer daemon log including rotated generations"
    }

    fn report_name(&self) -> &'static str {
        REPORT_LOGS
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let mut section = ReportSection::new(self.name());

        // Log rotation predates every supported release, so there is no
        // version gate here.
        let current = ctx.config.evidence_path(INSTALL_LOG);
        if !current.is_file() {
            section.missing(&current);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&current);

        match std::fs::read_to_string(&current) {
            Ok(text) => self.summarize(&mut section, &current, &text),
            Err(err) => {
                error!("[install_log] could not read {}: {err}", current.display());
                section.parse_error(err);
            }
        }

        let log_dir = current.parent().unwrap_or_else(|| Path::new("."));
        let mut rotated: Vec<_> = match std::fs::read_dir(log_dir) {
            Ok(read) => read
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("install.log.") && n.ends_with(".gz"))
                })
                .collect(),
            Err(err) => {
                error!("[install_log] could not list {}: {err}", log_dir.display());
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };
        rotated.sort();

        for path in rotated {
            match read_gzip_text(&path) {
                Ok(text) => self.summarize(&mut section, &path, &text),
                Err(err) => {
                    error!("[install_log] {err:#}");
                    section.field("Log File", path.display());
                    section.parse_error(err);
                    section.blank();
                }
            }
        }

        ctx.append(self.report_name(), &section)
    }
}
