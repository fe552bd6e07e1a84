use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{INSTALL_HISTORY_PLIST, REPORT_SYSTEM};
use crate::parsers::plist::{dict_array, dict_date, dict_string, parse_plist_file};
use crate::report::ReportSection;

/// Software install receipts from `InstallHistory.plist`.
///
/// The receipt array first appeared in Mountain Lion; earlier releases get
/// an unsupported notice.
pub struct InstallHistoryExtractor;

impl ArtifactExtractor for InstallHistoryExtractor {
    fn name(&self) -> &'static str {
        "Install History"
    }

    fn description(&self) -> &'static str {
        "Software install receipts (OS updates, packages, App Store)"
    }

    fn report_name(&self) -> &'static str {
        REPORT_SYSTEM
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let mut section = ReportSection::new(self.name());
        let version = ctx.config.os_version;

        if !version.is_known() {
            section.unknown_version();
            return ctx.append(self.report_name(), &section);
        }
        if version.before(MacosVersion::MountainLion) {
            section.unsupported(version);
            return ctx.append(self.report_name(), &section);
        }

        let path = ctx.config.evidence_path(INSTALL_HISTORY_PLIST);
        if !path.is_file() {
            section.missing(&path);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&path);

        let receipts = match parse_plist_file(&path) {
            Ok(value) => match value.into_array() {
                Some(receipts) => receipts,
                None => {
                    section.parse_error("InstallHistory.plist is not an array");
                    return ctx.append(self.report_name(), &section);
                }
            },
            Err(err) => {
                error!("[install_history] {err:#}");
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };

        for receipt in &receipts {
            let Some(receipt) = receipt.as_dictionary() else {
                continue;
            };
            if let Some(name) = dict_string(receipt, "displayName") {
                section.field("Package", name);
            }
            if let Some(display_version) = dict_string(receipt, "displayVersion") {
                section.field("Version", display_version);
            }
            if let Some(date) = dict_date(receipt, "date") {
                section.field("Installed", date.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(process) = dict_string(receipt, "processName") {
                section.field("Installer Process", process);
            }
            if let Some(identifiers) = dict_array(receipt, "packageIdentifiers") {
                let joined: Vec<&str> =
                    identifiers.iter().filter_map(|v| v.as_string()).collect();
                if !joined.is_empty() {
                    section.field("Identifiers", joined.join(", "));
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
    use crate::config::{DispatchMode, RunConfig};
    use std::fs;
    use tempfile::TempDir;

    const HISTORY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<array>
  <dict>
    <key>date</key><date>2020-01-26T02:24:01Z</date>
    <key>displayName</key><string>macOS Catalina Update</string>
    <key>displayVersion</key><string>10.15.3</string>
    <key>processName</key><string>softwareupdated</string>
    <key>packageIdentifiers</key>
    <array><string>com.apple.pkg.update.os.10.15.3</string></array>
  </dict>
</array>
</plist>"#;

    fn run_with_version(version: MacosVersion) -> String {
        let root = TempDir::new().unwrap();
        let receipts = root.path().join("Library/Receipts");
        fs::create_dir_all(&receipts).unwrap();
        fs::write(receipts.join("InstallHistory.plist"), HISTORY).unwrap();

        let out = root.path().join("reports");
        let config = RunConfig::new(root.path(), &out, version, DispatchMode::Sequential);
        let ctx = RunContext::new(config).unwrap();
        InstallHistoryExtractor.extract(&ctx).unwrap();
        fs::read_to_string(out.join(REPORT_SYSTEM)).unwrap()
    }

    #[test]
    fn test_receipt_fields_extracted() {
        let report = run_with_version(MacosVersion::Catalina);
        assert!(report.contains("Package: macOS Catalina Update"));
        assert!(report.contains("Version: 10.15.3"));
        assert!(report.contains("Installed: 2020-01-26 02:24:01 UTC"));
        assert!(report.contains("Installer Process: softwareupdated"));
        assert!(report.contains("Identifiers: com.apple.pkg.update.os.10.15.3"));
    }

    #[test]
    fn test_unsupported_before_mountain_lion() {
        let report = run_with_version(MacosVersion::Lion);
        assert!(report.contains("[INFO] not supported on this OS version"));
        assert!(!report.contains("Package:"));
    }
}
