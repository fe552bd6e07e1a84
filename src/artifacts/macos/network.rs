use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{NETWORK_INTERFACES_PLIST, REPORT_NETWORKING};
use crate::parsers::plist::{
    data_as_hex, dict_bool, dict_data, dict_dict, dict_i64, dict_string, parse_plist_dict,
};
use crate::report::ReportSection;

/// Hardware network interface inventory from `NetworkInterfaces.plist`.
pub struct NetworkInterfacesExtractor;

impl ArtifactExtractor for NetworkInterfacesExtractor {
    fn name(&self) -> &'static str {
        "Network Interfaces"
    }

    fn description(&self) -> &'static str {
        "Hardware network interfaces seen by the system"
    }

    fn report_name(&self) -> &'static str {
        REPORT_NETWORKING
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let mut section = ReportSection::new(self.name());
        let version = ctx.config.os_version;

        if !version.is_known() {
            section.unknown_version();
            return ctx.append(self.report_name(), &section);
        }

        let path = ctx.config.evidence_path(NETWORK_INTERFACES_PLIST);
        if !path.is_file() {
            section.missing(&path);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&path);

        let dict = match parse_plist_dict(&path) {
            Ok(dict) => dict,
            Err(err) => {
                error!("[network] {err:#}");
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };

        let interfaces = match dict.get("Interfaces").and_then(|v| v.as_array()) {
            Some(interfaces) => interfaces,
            None => {
                section.parse_error("no Interfaces array in plist");
                return ctx.append(self.report_name(), &section);
            }
        };

        for entry in interfaces {
            let Some(entry) = entry.as_dictionary() else {
                continue;
            };
            if let Some(bsd) = dict_string(entry, "BSD Name") {
                section.field("BSD Name", bsd);
            }
            if let Some(info) = dict_dict(entry, "SCNetworkInterfaceInfo") {
                if let Some(name) = dict_string(info, "UserDefinedName") {
                    section.field("Name", name);
                }
            }
            if let Some(kind) = dict_i64(entry, "IOInterfaceType") {
                section.field("Interface Type", kind);
            }
            if let Some(mac) = dict_data(entry, "IOMACAddress") {
                section.field("MAC Address", data_as_hex(mac));
            }
            // IOBuiltin only appears in the High Sierra and later schema
            if version.at_least(MacosVersion::HighSierra) {
                if let Some(builtin) = dict_bool(entry, "IOBuiltin") {
                    section.field("Built-in", builtin);
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

    const INTERFACES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Interfaces</key>
  <array>
    <dict>
      <key>BSD Name</key><string>en0</string>
      <key>IOInterfaceType</key><integer>6</integer>
      <key>IOBuiltin</key><true/>
      <key>IOMACAddress</key><data>qCBmAAEC</data>
      <key>SCNetworkInterfaceInfo</key>
      <dict><key>UserDefinedName</key><string>Wi-Fi</string></dict>
    </dict>
  </array>
</dict>
</plist>"#;

    fn run_with_version(version: MacosVersion) -> String {
        let root = TempDir::new().unwrap();
        let plist_dir = root
            .path()
            .join("Library/Preferences/SystemConfiguration");
        fs::create_dir_all(&plist_dir).unwrap();
        fs::write(plist_dir.join("NetworkInterfaces.plist"), INTERFACES).unwrap();

        let out = root.path().join("reports");
        let config = RunConfig::new(root.path(), &out, version, DispatchMode::Sequential);
        let ctx = RunContext::new(config).unwrap();
        NetworkInterfacesExtractor.extract(&ctx).unwrap();
        fs::read_to_string(out.join(REPORT_NETWORKING)).unwrap()
    }

    #[test]
    fn test_high_sierra_includes_builtin_flag() {
        let report = run_with_version(MacosVersion::Mojave);
        assert!(report.contains("BSD Name: en0"));
        assert!(report.contains("Name: Wi-Fi"));
        assert!(report.contains("MAC Address: a8:20:66:00:01:02"));
        assert!(report.contains("Built-in: true"));
    }

    #[test]
    fn test_older_release_omits_builtin_flag() {
        let report = run_with_version(MacosVersion::Yosemite);
        assert!(report.contains("BSD Name: en0"));
        assert!(!report.contains("Built-in"));
    }

    #[test]
    fn test_unknown_version_writes_notice_only() {
        let report = run_with_version(MacosVersion::Unknown);
        assert!(report.contains("[WARNING] not a known OS version"));
        assert!(!report.contains("BSD Name"));
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
        NetworkInterfacesExtractor.extract(&ctx).unwrap();

        let report = fs::read_to_string(out.join(REPORT_NETWORKING)).unwrap();
        assert!(report.contains("does not exist"));
    }
}
