use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::os_version::MacosVersion;

/// How extractors are driven by the dispatcher.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One extractor at a time, in registration order
    Sequential,
    /// Bounded thread pool, joined before the run completes
    Parallel,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Sequential => write!(f, "sequential"),
            DispatchMode::Parallel => write!(f, "parallel"),
        }
    }
}

/// Shared configuration for one run.
///
/// Built once after argument validation and version detection, then shared
/// by reference into every extractor. Exactly one exists per invocation and
/// nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Evidence root (mounted image or extracted filesystem)
    pub input: PathBuf,
    /// Directory all reports and the run log are written under
    pub output: PathBuf,
    /// Release tag every extractor branches on
    pub os_version: MacosVersion,
    /// Execution strategy for this run
    pub mode: DispatchMode,
}

impl RunConfig {
    pub fn new(
        input: &Path,
        output: &Path,
        os_version: MacosVersion,
        mode: DispatchMode,
    ) -> Self {
        RunConfig {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            os_version,
            mode,
        }
    }

    /// Resolve an artifact path fixed at definition time against the
    /// evidence root.
    pub fn evidence_path(&self, relative: &str) -> PathBuf {
        self.input.join(relative)
    }
}

/// Validate the input directory and create the output directory.
///
/// Called before logging is initialized or any extractor runs; a failure
/// here is fatal and surfaces as exit code 1.
pub fn validate_directories(input: &Path, output: &Path) -> Result<()> {
    if !input.is_dir() {
        return Err(anyhow!(
            "input directory {} does not exist or is not a directory",
            input.display()
        ));
    }
    std::fs::create_dir_all(output).map_err(|err| {
        anyhow!(
            "could not create output directory {}: {err}",
            output.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directories_accepts_existing_input() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let nested = output.path().join("reports");

        validate_directories(input.path(), &nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_validate_directories_rejects_missing_input() {
        let output = TempDir::new().unwrap();
        let missing = output.path().join("no-such-evidence");

        let result = validate_directories(&missing, output.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_directories_rejects_file_input() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("image.dmg");
        std::fs::write(&file, b"not a directory").unwrap();

        assert!(validate_directories(&file, dir.path()).is_err());
    }

    #[test]
    fn test_evidence_path_resolution() {
        let config = RunConfig::new(
            Path::new("/mnt/evidence"),
            Path::new("/tmp/out"),
            MacosVersion::Catalina,
            DispatchMode::Sequential,
        );
        assert_eq!(
            config.evidence_path("private/etc/ntp.conf"),
            PathBuf::from("/mnt/evidence/private/etc/ntp.conf")
        );
    }
}
