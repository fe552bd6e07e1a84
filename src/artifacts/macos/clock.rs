use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{NTP_CONF, REPORT_SYSTEM, TIMED_PLIST, TIMEZONE_AUTO_PLIST};
use crate::parsers::plist::{dict_bool, dict_f64, parse_plist_dict};
use crate::report::ReportSection;
use crate::utils::time::{format_timestamp, unix_epoch_plus};

/// System clock configuration: timezone preference plus the time daemon
/// state. High Sierra replaced `ntpd` with `timed`, so the source of the
/// sync data depends on the release.
pub struct SystemClockExtractor;

impl ArtifactExtractor for SystemClockExtractor {
    fn name(&self) -> &'static str {
        "System Clock"
    }

    fn description(&self) -> &'static str {
        "Timezone preference and network time sync configuration"
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

        let tz_path = ctx.config.evidence_path(TIMEZONE_AUTO_PLIST);
        if tz_path.is_file() {
            match parse_plist_dict(&tz_path) {
                Ok(dict) => {
                    if let Some(active) = dict_bool(&dict, "Active") {
                        section.field("Automatic Timezone", active);
                    }
                }
                Err(err) => {
                    error!("[clock] {err:#}");
                    section.parse_error(err);
                }
            }
        } else {
            section.missing(&tz_path);
        }

        if version.at_least(MacosVersion::HighSierra) {
            // timed keeps its state in a plist under /private/var/db/timed
            let timed_path = ctx.config.evidence_path(TIMED_PLIST);
            if !timed_path.is_file() {
                section.missing(&timed_path);
                return ctx.append(self.report_name(), &section);
            }
            section.set_source(&timed_path);
            match parse_plist_dict(&timed_path) {
                Ok(dict) => {
                    if let Some(last) = dict_f64(&dict, "TMLastSystemTime") {
                        section.field(
                            "Last System Time",
                            format_timestamp(unix_epoch_plus(last as i64)),
                        );
                    }
                    if let Some(sync) = dict_f64(&dict, "TMLastTimeSynchronization") {
                        section.field(
                            "Last Time Sync",
                            format_timestamp(unix_epoch_plus(sync as i64)),
                        );
                    }
                }
                Err(err) => {
                    error!("[clock] {err:#}");
                    section.parse_error(err);
                }
            }
        } else {
            let ntp_path = ctx.config.evidence_path(NTP_CONF);
            if !ntp_path.is_file() {
                section.missing(&ntp_path);
                return ctx.append(self.report_name(), &section);
            }
            section.set_source(&ntp_path);
            match std::fs::read_to_string(&ntp_path) {
                Ok(text) => {
                    for line in text.lines() {
                        if let Some(server) = line.strip_prefix("server ") {
                            section.field("NTP Server", server.trim());
                        }
                    }
                }
                Err(err) => {
                    error!("[clock] could not read {}: {err}", ntp_path.display());
                    section.parse_error(err);
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

    fn run_with_version(root: &TempDir, version: MacosVersion) -> String {
        let out = root.path().join("reports");
        let config = RunConfig::new(root.path(), &out, version, DispatchMode::Sequential);
        let ctx = RunContext::new(config).unwrap();
        SystemClockExtractor.extract(&ctx).unwrap();
        fs::read_to_string(out.join(REPORT_SYSTEM)).unwrap()
    }

    #[test]
    fn test_pre_high_sierra_reads_ntp_conf() {
        let root = TempDir::new().unwrap();
        let etc = root.path().join("private/etc");
        fs::create_dir_all(&etc).unwrap();
        fs::write(etc.join("ntp.conf"), "server time.apple.com\n").unwrap();

        let report = run_with_version(&root, MacosVersion::Sierra);
        assert!(report.contains("NTP Server: time.apple.com"));
    }

    #[test]
    fn test_high_sierra_reads_timed_state() {
        let root = TempDir::new().unwrap();
        let timed_dir = root
            .path()
            .join("private/var/db/timed/Library/Preferences");
        fs::create_dir_all(&timed_dir).unwrap();
        fs::write(
            timed_dir.join("com.apple.timed.plist"),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>TMLastSystemTime</key><real>1580003041.0</real>
  <key>TMLastTimeSynchronization</key><real>1580003041.0</real>
</dict>
</plist>"#,
        )
        .unwrap();

        let report = run_with_version(&root, MacosVersion::Mojave);
        assert!(report.contains("Last System Time: 2020-01-26 02:24:01 UTC"));
        assert!(report.contains("Last Time Sync: 2020-01-26 02:24:01 UTC"));
        assert!(!report.contains("NTP Server"));
    }

    #[test]
    fn test_missing_sources_write_notices() {
        let root = TempDir::new().unwrap();
        let report = run_with_version(&root, MacosVersion::Catalina);
        assert!(report.contains("does not exist"));
    }
}
