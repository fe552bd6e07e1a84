use anyhow::Result;
use log::error;
use plist::Dictionary;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{BLUETOOTH_PLIST, REPORT_SYSTEM};
use crate::parsers::plist::{dict_array, dict_date, dict_dict, dict_string, parse_plist_dict};
use crate::report::ReportSection;

/// Paired Bluetooth devices from `com.apple.Bluetooth.plist`.
///
/// High Sierra moved the pairing records from the `DeviceCache` dictionary
/// (keyed by MAC) to a flat `PairedDevices` address list.
pub struct BluetoothExtractor;

impl BluetoothExtractor {
    fn write_device_cache(&self, section: &mut ReportSection, cache: &Dictionary) {
        let mut addresses: Vec<&String> = cache.keys().collect();
        addresses.sort();
        for address in addresses {
            let Some(device) = cache.get(address).and_then(|v| v.as_dictionary()) else {
                continue;
            };
            section.field("Device Address", address);
            if let Some(name) = dict_string(device, "Name") {
                section.field("Name", name);
            }
            if let Some(updated) = dict_date(device, "LastServicesUpdate") {
                section.field("Last Services Update", updated.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            section.blank();
        }
    }
}

impl ArtifactExtractor for BluetoothExtractor {
    fn name(&self) -> &'static str {
        "Bluetooth Devices"
    }

    fn description(&self) -> &'static str {
        "Bluetooth devices paired with the system"
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

        let path = ctx.config.evidence_path(BLUETOOTH_PLIST);
        if !path.is_file() {
            section.missing(&path);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&path);

        let dict = match parse_plist_dict(&path) {
            Ok(dict) => dict,
            Err(err) => {
                error!("[bluetooth] {err:#}");
                section.parse_error(err);
                return ctx.append(self.report_name(), &section);
            }
        };

        if version.at_least(MacosVersion::HighSierra) {
            match dict_array(&dict, "PairedDevices") {
                Some(paired) => {
                    for device in paired {
                        if let Some(address) = device.as_string() {
                            section.field("Paired Device", address);
                        }
                    }
                }
                None => section.parse_error("no PairedDevices array in plist"),
            }
        } else {
            match dict_dict(&dict, "DeviceCache") {
                Some(cache) => self.write_device_cache(&mut section, cache),
                None => section.parse_error("no DeviceCache dictionary in plist"),
            }
        }

        ctx.append(self.report_name(), &section)
    }
}
