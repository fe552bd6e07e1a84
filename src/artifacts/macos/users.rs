use anyhow::Result;
use log::error;
use plist::Dictionary;

use crate::artifacts::extractor::{ArtifactExtractor, RunContext};
use crate::config::MacosVersion;
use crate::constants::{LOCAL_USERS_DIR, REPORT_USERS_PREFIX};
use crate::parsers::plist::{
    dict_array, dict_f64, dict_i64, parse_plist_bytes, parse_plist_dict,
};
use crate::report::ReportSection;
use crate::utils::time::{format_timestamp, unix_epoch_plus};

/// Local account records from the OpenDirectory local node.
///
/// Each account is one plist under
/// `/private/var/db/dslocal/nodes/Default/users`; service accounts are
/// prefixed with `_` and skipped. Every discovered account gets its own
/// `Users_<name>.txt` report.
pub struct UserAccountsExtractor;

/// Values in these plists are arrays even when single-valued
fn first_string(dict: &Dictionary, key: &str) -> Option<String> {
    dict_array(dict, key)?
        .first()?
        .as_string()
        .map(str::to_string)
}

impl UserAccountsExtractor {
    fn write_account(
        &self,
        ctx: &RunContext,
        name: &str,
        dict: &Dictionary,
    ) -> Result<()> {
        let mut section = ReportSection::new(self.name());
        let version = ctx.config.os_version;

        section.field("Account", name);
        if let Some(real) = first_string(dict, "realname") {
            section.field("Real Name", real);
        }
        if let Some(uid) = first_string(dict, "uid") {
            section.field("UID", uid);
        }
        if let Some(gid) = first_string(dict, "gid") {
            section.field("GID", gid);
        }
        if let Some(home) = first_string(dict, "home") {
            section.field("Home", home);
        }
        if let Some(shell) = first_string(dict, "shell") {
            section.field("Shell", shell);
        }

        // accountPolicyData (an embedded binary plist) exists from Yosemite on
        if version.at_least(MacosVersion::Yosemite) {
            if let Some(policy) = dict_array(dict, "accountPolicyData")
                .and_then(|blobs| blobs.first())
                .and_then(|blob| blob.as_data())
            {
                match parse_plist_bytes(policy).map(|v| v.into_dictionary()) {
                    Ok(Some(policy)) => {
                        if let Some(created) = dict_f64(&policy, "creationTime") {
                            section.field(
                                "Account Created",
                                format_timestamp(unix_epoch_plus(created as i64)),
                            );
                        }
                        if let Some(set) = dict_f64(&policy, "passwordLastSetTime") {
                            section.field(
                                "Password Last Set",
                                format_timestamp(unix_epoch_plus(set as i64)),
                            );
                        }
                        if let Some(failed) = dict_i64(&policy, "failedLoginCount") {
                            section.field("Failed Logins", failed);
                        }
                    }
                    Ok(None) => section.parse_error("accountPolicyData is not a dictionary"),
                    Err(err) => {
                        error!("[users] {err:#}");
                        section.parse_error(err);
                    }
                }
            }
        }

        let report = format!("{REPORT_USERS_PREFIX}{name}.txt");
        ctx.append(&report, &section)
    }
}

impl ArtifactExtractor for UserAccountsExtractor {
    fn name(&self) -> &'static str {
        "User Accounts"
    }

    fn description(&self) -> &'static str {
        "Local account records from the OpenDirectory local node"
    }

    fn report_name(&self) -> &'static str {
        // One report per discovered account; this is the pattern label
        "Users_<account>.txt"
    }

    fn extract(&self, ctx: &RunContext) -> Result<()> {
        let version = ctx.config.os_version;
        let dir = ctx.config.evidence_path(LOCAL_USERS_DIR);

        if !version.is_known() {
            let mut section = ReportSection::new(self.name());
            section.unknown_version();
            return ctx.append(&format!("{REPORT_USERS_PREFIX}unknown.txt"), &section);
        }
        if !dir.is_dir() {
            let mut section = ReportSection::new(self.name());
            section.missing(&dir);
            return ctx.append(&format!("{REPORT_USERS_PREFIX}none.txt"), &section);
        }

        let mut entries: Vec<_> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('_') || path.extension().and_then(|e| e.to_str()) != Some("plist")
            {
                continue;
            }

            let dict = match parse_plist_dict(&path) {
                Ok(dict) => dict,
                Err(err) => {
                    error!("[users] {err:#}");
                    let mut section = ReportSection::new(self.name());
                    section.set_source(&path);
                    section.parse_error(err);
                    if let Err(err) =
                        ctx.append(&format!("{REPORT_USERS_PREFIX}{stem}.txt"), &section)
                    {
                        error!("[users] could not write report for {stem}: {err:#}");
                    }
                    continue;
                }
            };

            // The name field is evidence-controlled; anything that is not a
            // plain filename component falls back to the plist stem so the
            // report cannot land outside the output directory.
            let name = first_string(&dict, "name")
                .filter(|n| is_safe_account_name(n))
                .unwrap_or_else(|| stem.to_string());
            if let Err(err) = self.write_account(ctx, &name, &dict) {
                error!("[users] could not write report for {name}: {err:#}");
            }
        }

        Ok(())
    }
}

fn is_safe_account_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DispatchMode, RunConfig};
    use std::fs;
    use tempfile::TempDir;

    const USER_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>name</key><array><string>analyst</string></array>
  <key>realname</key><array><string>Case Analyst</string></array>
  <key>uid</key><array><string>501</string></array>
  <key>gid</key><array><string>20</string></array>
  <key>home</key><array><string>/Users/analyst</string></array>
  <key>shell</key><array><string>/bin/zsh</string></array>
</dict>
</plist>"#;

    fn setup(version: MacosVersion) -> (TempDir, std::path::PathBuf) {
        let root = TempDir::new().unwrap();
        let users = root.path().join(LOCAL_USERS_DIR);
        fs::create_dir_all(&users).unwrap();
        fs::write(users.join("analyst.plist"), USER_PLIST).unwrap();
        fs::write(users.join("_spotlight.plist"), USER_PLIST).unwrap();

        let out = root.path().join("reports");
        let config = RunConfig::new(root.path(), &out, version, DispatchMode::Sequential);
        let ctx = RunContext::new(config).unwrap();
        UserAccountsExtractor.extract(&ctx).unwrap();
        (root, out)
    }

    #[test]
    fn test_one_report_per_account() {
        let (_root, out) = setup(MacosVersion::Catalina);

        let report = fs::read_to_string(out.join("Users_analyst.txt")).unwrap();
        assert!(report.contains("Account: analyst"));
        assert!(report.contains("Real Name: Case Analyst"));
        assert!(report.contains("UID: 501"));
        assert!(report.contains("Home: /Users/analyst"));
        assert!(report.contains("Shell: /bin/zsh"));
    }

    #[test]
    fn test_service_accounts_skipped() {
        let (_root, out) = setup(MacosVersion::Catalina);
        assert!(!out.join("Users__spotlight.txt").exists());
    }

    #[test]
    fn test_path_separator_name_falls_back_to_file_stem() {
        let root = TempDir::new().unwrap();
        let users = root.path().join(LOCAL_USERS_DIR);
        fs::create_dir_all(&users).unwrap();
        fs::write(
            users.join("mallory.plist"),
            USER_PLIST.replace("analyst", "a/../../escaped"),
        )
        .unwrap();
        fs::write(users.join("zanalyst.plist"), USER_PLIST).unwrap();

        let out = root.path().join("reports");
        let config = RunConfig::new(
            root.path(),
            &out,
            MacosVersion::Catalina,
            DispatchMode::Sequential,
        );
        let ctx = RunContext::new(config).unwrap();
        UserAccountsExtractor.extract(&ctx).unwrap();

        // The hostile name is replaced by the plist stem and the report
        // stays inside the output directory
        let report = fs::read_to_string(out.join("Users_mallory.txt")).unwrap();
        assert!(report.contains("Account: mallory"));
        assert!(!out.join("Users_a").exists());

        // Accounts sorted after the hostile record are still extracted
        let report = fs::read_to_string(out.join("Users_analyst.txt")).unwrap();
        assert!(report.contains("Account: analyst"));
    }

    #[test]
    fn test_missing_directory_writes_notice() {
        let root = TempDir::new().unwrap();
        let out = root.path().join("reports");
        let config = RunConfig::new(
            root.path(),
            &out,
            MacosVersion::Catalina,
            DispatchMode::Sequential,
        );
        let ctx = RunContext::new(config).unwrap();
        UserAccountsExtractor.extract(&ctx).unwrap();

        let report = fs::read_to_string(out.join("Users_none.txt")).unwrap();
        assert!(report.contains("does not exist"));
    }
}
