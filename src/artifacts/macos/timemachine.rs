use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{REPORT_SYSTEM, TIME_MACHINE_PLIST};
use crate::parsers::plist::{dict_array, dict_bool, dict_i64, dict_string, parse_plist_dict};
use crate::report::ReportSection;

/// Time Machine backup configuration from `com.apple.TimeMachine.plist`.
///
/// Mavericks introduced per-destination records; earlier releases only
/// carry the top-level backup toggle and exclusion list.
pub struct TimeMachineExtractor;

impl ArtifactExtractor for TimeMachineExtractor {
    fn name(&self) -> &'static str {
        "Time Machine"
    }

    fn description(&self) -> &'static str {
        "Time Machine backup destinations and exclusions"
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

        let path = ctx.config.evidence_path(TIME_MACHINE_PLIST);
        if !path.is_file() {
            section.missing(&path);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&path);

        let dict = match parse_plist_dict(&path) {
            Ok(dict) => dict,
            Err(err) => {
                error!("[timemachine] {err:#}");
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };

        if version.at_least(MacosVersion::Mavericks) {
            match dict_array(&dict, "Destinations") {
                Some(destinations) => {
                    for destination in destinations {
                        let Some(destination) = destination.as_dictionary() else {
                            continue;
                        };
                        if let Some(id) = dict_string(destination, "DestinationID") {
                            section.field("Destination ID", id);
                        }
                        if let Some(bytes) = dict_i64(destination, "BytesUsed") {
                            section.field("Bytes Used", bytes);
                        }
                        if let Some(snapshots) = dict_array(destination, "SnapshotDates") {
                            section.field("Snapshot Count", snapshots.len());
                            if let Some(latest) = snapshots
                                .iter()
                                .filter_map(|v| v.as_date())
                                .map(std::time::SystemTime::from)
                                .max()
                            {
                                let latest: chrono::DateTime<chrono::Utc> = latest.into();
                                section.field(
                                    "Latest Snapshot",
                                    latest.format("%Y-%m-%d %H:%M:%S UTC"),
                                );
                            }
                        }
                        section.blank();
                    }
                }
                None => section.parse_error("no Destinations array in plist"),
            }
        } else {
            if let Some(auto) = dict_bool(&dict, "AutoBackup") {
                section.field("Auto Backup", auto);
            }
            if let Some(skip) = dict_array(&dict, "SkipPaths") {
                for path in skip.iter().filter_map(|v| v.as_string()) {
                    section.field("Excluded Path", path);
                }
            }
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

    const TIME_MACHINE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>AutoBackup</key><true/>
  <key>SkipPaths</key>
  <array><string>/Users/analyst/Scratch</string></array>
  <key>Destinations</key>
  <array>
    <dict>
      <key>DestinationID</key><string>6F1A2B3C-0000-0000-0000-000000000000</string>
      <key>BytesUsed</key><integer>524288000</integer>
      <key>SnapshotDates</key>
      <array>
        <date>2020-01-20T10:00:00Z</date>
        <date>2020-01-26T02:24:01Z</date>
      </array>
    </dict>
  </array>
</dict>
</plist>"#;

    fn run_with_version(version: MacosVersion) -> String {
        let root = TempDir::new().unwrap();
        let prefs = root.path().join("Library/Preferences");
        fs::create_dir_all(&prefs).unwrap();
        fs::write(prefs.join("com.apple.TimeMachine.plist"), TIME_MACHINE).unwrap();

        let out = root.path().join("reports");
        let config = RunConfig::new(root.path(), &out, version, DispatchMode::Sequential);
        let ctx = RunContext::new(config).unwrap();
        TimeMachineExtractor.extract(&ctx).unwrap();
        fs::read_to_string(out.join(REPORT_SYSTEM)).unwrap()
    }

    #[test]
    fn test_mavericks_reads_destination_records() {
        let report = run_with_version(MacosVersion::Catalina);
        assert!(report.contains("Destination ID: 6F1A2B3C-0000-0000-0000-000000000000"));
        assert!(report.contains("Bytes Used: 524288000"));
        assert!(report.contains("Snapshot Count: 2"));
        assert!(report.contains("Latest Snapshot: 2020-01-26 02:24:01 UTC"));
        assert!(!report.contains("Auto Backup"));
    }

    #[test]
    fn test_older_release_reads_toggle_and_exclusions() {
        let report = run_with_version(MacosVersion::MountainLion);
        assert!(report.contains("Auto Backup: true"));
        assert!(report.contains("Excluded Path: /Users/analyst/Scratch"));
        assert!(!report.contains("Destination ID"));
    }

    #[test]
    fn test_missing_plist_writes_notice() {
        let root = TempDir::new().unwrap();
        let out = root.path().join("reports");
        let config = RunConfig::new(
            root.path(),
            &out,
            MacosVersion::Catalina,
            DispatchMode::Sequential,
        );
        let ctx = RunContext::new(config).unwrap();
        TimeMachineExtractor.extract(&ctx).unwrap();

        let report = fs::read_to_string(out.join(REPORT_SYSTEM)).unwrap();
        assert!(report.contains("does not exist"));
    }
}
