use anyhow::{Context, Result};
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{QUARANTINE_DB, REPORT_USERS_PREFIX, USER_HOMES_DIR};
use crate::parsers::sqlite::open_read_only;
use crate::report::ReportSection;
use crate::utils::time::{cocoa_epoch_plus_f64, format_timestamp};

/// Per-user download quarantine history from `QuarantineEventsV2`.
///
/// The V2 database replaced the per-user plist in Lion; Snow Leopard
/// evidence gets an unsupported notice.
pub struct QuarantineExtractor;

struct QuarantineEvent {
    identifier: String,
    timestamp: Option<f64>,
    agent: String,
    data_url: String,
    origin_url: String,
}

fn read_events(db_path: &std::path::Path) -> Result<Vec<QuarantineEvent>> {
    let conn = open_read_only(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT LSQuarantineEventIdentifier, LSQuarantineTimeStamp, \
             LSQuarantineAgentName, LSQuarantineDataURLString, \
             LSQuarantineOriginURLString \
             FROM LSQuarantineEvent ORDER BY LSQuarantineTimeStamp",
        )
        .context("preparing quarantine query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(QuarantineEvent {
                identifier: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                timestamp: row.get(1)?,
                agent: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                data_url: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                origin_url: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })
        .context("reading quarantine events")?;

    let mut events = Vec::new();
    for row in rows {
        events.push(row.context("decoding quarantine row")?);
    }
    Ok(events)
}

impl ArtifactExtractor for QuarantineExtractor {
    fn name(&self) -> &'static str {
        "Quarantine Events"
    }

    fn description(&self) -> &'static str {
        "Download quarantine history per user (Gatekeeper provenance)"
    }

    fn report_name(&self) -> &'static str {
        "Users_<account>.txt"
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let version = ctx.config.os_version;

        if !version.is_known() {
            let mut section = ReportSection::new(self.name());
            section.unknown_version();
            return ctx.append(&format!("{REPORT_USERS_PREFIX}unknown.txt"), &section);
        }
        if version.before(MacosVersion::Lion) {
            let mut section = ReportSection::new(self.name());
            section.unsupported(version);
            return ctx.append(&format!("{REPORT_USERS_PREFIX}none.txt"), &section);
        }

        let homes = ctx.config.evidence_path(USER_HOMES_DIR);
        if !homes.is_dir() {
            let mut section = ReportSection::new(self.name());
            section.missing(&homes);
            return ctx.append(&format!("{REPORT_USERS_PREFIX}none.txt"), &section);
        }

        let mut entries: Vec<_> = std::fs::read_dir(&homes)?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let home = entry.path();
            if !home.is_dir() {
                continue;
            }
            let Some(account) = home.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let report = format!("{REPORT_USERS_PREFIX}{account}.txt");

            let db_path = home.join(QUARANTINE_DB);
            let mut section = ReportSection::new(self.name());
            if !db_path.is_file() {
                section.missing(&db_path);
                ctx.append(&report, &section)?;
                continue;
            }
            section.set_source(&db_path);

            match read_events(&db_path) {
                Ok(events) => {
                    for event in events {
                        section.field("Event", event.identifier);
                        section.field(
                            "Timestamp",
                            format_timestamp(
                                event.timestamp.and_then(cocoa_epoch_plus_f64),
                            ),
                        );
                        section.field("Agent", event.agent);
                        section.field("Data URL", event.data_url);
                        section.field("Origin URL", event.origin_url);
                        section.blank();
                    }
                }
                Err(err) => {
                    error!("[quarantine] {err:#}");
                    section.parse_error(err);
                }
            }
            ctx.append(&report, &section)?;
        }

        Ok(())
    }
}
