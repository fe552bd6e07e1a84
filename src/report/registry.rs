use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::debug;

use super::section::ReportSection;

/// Owns the append handles for every report file in one run.
///
/// Report files are the only mutable resource extractors share. Each
/// filename gets exactly one mutex-guarded handle, and sections are rendered
/// before the lock is taken, so a report shared by several extractors always
/// ends up as a series of whole sections regardless of dispatch order.
pub struct ReportRegistry {
    output_dir: PathBuf,
    handles: Mutex<HashMap<String, Arc<Mutex<File>>>>,
}

impl ReportRegistry {
    pub fn new(output_dir: &Path) -> Self {
        ReportRegistry {
            output_dir: output_dir.to_path_buf(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Append a rendered section to the named report, creating the file on
    /// first use. Never truncates or rewrites prior content.
    pub fn append(&self, report_name: &str, section: &ReportSection) -> Result<()> {
        let rendered = section.render();
        let handle = self.handle_for(report_name)?;
        let mut file = handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(rendered.as_bytes())
            .with_context(|| format!("failed to append to report {report_name}"))?;
        Ok(())
    }

    /// Report filenames touched so far, sorted for stable summaries
    pub fn touched_reports(&self) -> Vec<String> {
        let handles = self
            .handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = handles.keys().cloned().collect();
        names.sort();
        names
    }

    fn handle_for(&self, report_name: &str) -> Result<Arc<Mutex<File>>> {
        let mut handles = self
            .handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = handles.get(report_name) {
            return Ok(Arc::clone(handle));
        }

        let path = self.output_dir.join(report_name);
        debug!("Opening report file {}", path.display());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open report file {}", path.display()))?;
        let handle = Arc::new(Mutex::new(file));
        handles.insert(report_name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }
}
