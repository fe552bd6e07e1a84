use anyhow::Result;
use log::error;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{ITUNES_LIBRARY_XML, REPORT_USERS_PREFIX, USER_HOMES_DIR};
use crate::parsers::plist::{dict_array, dict_string, parse_plist_dict};
use crate::report::ReportSection;

/// iTunes library metadata per user home.
///
/// Catalina replaced iTunes with Music.app and retired the XML library, so
/// this handler only applies to Mojave and earlier.
pub struct ItunesPlaylistsExtractor;

impl ItunesPlaylistsExtractor {
    fn write_library(
        &self,
        ctx: &RunContext,
        account: &str,
        library: &std::path::Path,
    ) -> Result<()> {
        let mut section = ReportSection::new(self.name());
        section.set_source(library);

        match parse_plist_dict(library) {
            Ok(dict) => {
                if let Some(app_version) = dict_string(&dict, "Application Version") {
                    section.field("Application Version", app_version);
                }
                if let Some(folder) = dict_string(&dict, "Music Folder") {
                    section.field("Music Folder", folder);
                }
                if let Some(playlists) = dict_array(&dict, "Playlists") {
                    for playlist in playlists {
                        let Some(playlist) = playlist.as_dictionary() else {
                            continue;
                        };
                        if let Some(name) = dict_string(playlist, "Name") {
                            section.field("Playlist", name);
                        }
                        let items = dict_array(playlist, "Playlist Items")
                            .map(|items| items.len())
                            .unwrap_or(0);
                        section.field("Items", items);
                    }
                }
            }
            Err(err) => {
                error!("[playlists] {err:#}");
                section.parse_error(err);
            }
        }

        ctx.append(&format!("{REPORT_USERS_PREFIX}{account}.txt"), &section)
    }
}

impl ArtifactExtractor for ItunesPlaylistsExtractor {
    fn name(&self) -> &'static str {
        "iTunes Playlists"
    }

    fn description(&self) -> &'static str {
        "iTunes library and playlist metadata per user"
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
        if version.at_least(MacosVersion::Catalina) {
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

            let library = home.join(ITUNES_LIBRARY_XML);
            if !library.is_file() {
                let mut section = ReportSection::new(self.name());
                section.missing(&library);
                ctx.append(&format!("{REPORT_USERS_PREFIX}{account}.txt"), &section)?;
                continue;
            }
            self.write_library(ctx, account, &library)?;
        }

        Ok(())
    }
}
