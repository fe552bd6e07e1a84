use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{DHCP_LEASES_DIR, REPORT_NETWORKING};
use crate::parsers::plist::{
    data_as_hex, dict_data, dict_date, dict_string, parse_plist_dict,
};
use crate::report::ReportSection;

/// Per-interface DHCP lease plists from `/private/var/db/dhcpclient/leases`.
///
/// Lease filenames encode the interface and MAC (`en0-1,a8:20:66:...`); the
/// plist inside holds the negotiated addresses and lease start time.
pub struct DhcpLeasesExtractor;

impl ArtifactExtractor for DhcpLeasesExtractor {
    fn name(&self) -> &'static str {
        "DHCP Leases"
    }

    fn description(&self) -> &'static str {
        "Negotiated DHCP leases per network interface"
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

        let dir = ctx.config.evidence_path(DHCP_LEASES_DIR);
        if !dir.is_dir() {
            section.missing(&dir);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&dir);

        let mut entries: Vec<_> = match std::fs::read_dir(&dir) {
            Ok(read) => read.filter_map(|e| e.ok()).collect(),
            Err(err) => {
                error!("[dhcp] could not list {}: {err}", dir.display());
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            section.field("Lease File", entry.file_name().to_string_lossy());

            let lease = match parse_plist_dict(&path) {
                Ok(dict) => dict,
                Err(err) => {
                    error!("[dhcp] {err:#}");
                    section.parse_error(err);
                    section.blank();
                    continue;
                }
            };

            if let Some(ip) = dict_string(&lease, "IPAddress") {
                section.field("IP Address", ip);
            }
            if let Some(start) = dict_date(&lease, "LeaseStartDate") {
                section.field("Lease Start", start.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(router) = dict_string(&lease, "RouterIPAddress") {
                section.field("Router IP", router);
            }
            if let Some(mac) = dict_data(&lease, "RouterHardwareAddress") {
                section.field("Router MAC", data_as_hex(mac));
            }
            // The associated wireless network is only recorded from Sierra on
            if version.at_least(MacosVersion::Sierra) {
                if let Some(ssid) = dict_string(&lease, "SSID") {
                    section.field("SSID", ssid);
                }
            }
            section.blank();
        }

        ctx.append(self.report_name(), &section)
    }
}
