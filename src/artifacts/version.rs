//! OS release detection from `SystemVersion.plist`.
//!
//! Detection runs once per invocation, before any other extractor, and the
//! resulting [`MacosVersion`] is the branch key every extractor observes for
//! the whole run.

use anyhow::Result;
use log::{error, info};

use super::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{REPORT_SYSTEM, SYSTEM_VERSION_PLIST, VERSION_SENTINEL};
use crate::parsers::plist::{dict_string, parse_plist_dict};
use crate::report::ReportSection;

/// Raw fields read out of `SystemVersion.plist`.
#[derive(Debug)]
pub struct RawSystemVersion {
    /// `ProductVersion`, or the `"NONE"` sentinel when absent
    pub product_version: String,
    pub product_name: Option<String>,
    pub build_version: Option<String>,
}

/// Read the raw version fields; absent file or field yields the sentinel.
pub fn detect_raw_version(input_root: &std::path::Path) -> RawSystemVersion {
    let path = input_root.join(SYSTEM_VERSION_PLIST);
    let dict = match parse_plist_dict(&path) {
        Ok(dict) => dict,
        Err(err) => {
            error!("[version] could not read {}: {err:#}", path.display());
            return RawSystemVersion {
                product_version: VERSION_SENTINEL.to_string(),
                product_name: None,
                build_version: None,
            };
        }
    };

    RawSystemVersion {
        product_version: dict_string(&dict, "ProductVersion")
            .unwrap_or_else(|| VERSION_SENTINEL.to_string()),
        product_name: dict_string(&dict, "ProductName"),
        build_version: dict_string(&dict, "ProductBuildVersion"),
    }
}

/// Detect the release tag for a run. Never fails; unrecognized or missing
/// version data yields `MacosVersion::Unknown`.
pub fn detect_version(input_root: &std::path::Path) -> MacosVersion {
    let raw = detect_raw_version(input_root);
    let version = MacosVersion::from_product_version(&raw.product_version);
    info!(
        "Detected OS version: {} (raw: {})",
        version, raw.product_version
    );
    version
}

/// Writes the raw and mapped OS version into the system report. Runs as a
/// normal extractor so the detection result is also on the record.
pub struct SystemVersionExtractor;

impl ArtifactExtractor for SystemVersionExtractor {
    fn name(&self) -> &'static str {
        "System Version"
    }

    fn description(&self) -> &'static str {
        "OS product name, version, and build from SystemVersion.plist"
    }

    fn report_name(&self) -> &'static str {
        REPORT_SYSTEM
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let mut section = ReportSection::new(self.name());
        let path = ctx.config.evidence_path(SYSTEM_VERSION_PLIST);

        if !path.is_file() {
            section.missing(&path);
            return ctx.append(self.report_name(), &section);
        }
        section.set_source(&path);

        let raw = detect_raw_version(&ctx.config.input);
        if let Some(name) = &raw.product_name {
            section.field("Product Name", name);
        }
        section.field("Product Version", &raw.product_version);
        if let Some(build) = &raw.build_version {
            section.field("Build Version", build);
        }
        section.field("Detected Release", ctx.config.os_version);
        if !ctx.config.os_version.is_known() {
            section.unknown_version();
        }

        ctx.append(self.report_name(), &section)
    }
}
