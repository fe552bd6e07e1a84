use std::fmt::Display;
use std::path::Path;

use crate::config::MacosVersion;
use crate::constants::{BANNER_CHAR, BANNER_WIDTH};

/// One self-delimited block of report output.
///
/// An extractor fills a section in memory; the finished section is rendered
/// to a string and appended to its report file in a single write, so
/// concurrent extractors sharing a report can never interleave partial
/// sections.
#[derive(Debug)]
pub struct ReportSection {
    title: String,
    source: Option<String>,
    lines: Vec<String>,
    field_count: usize,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            source: None,
            lines: Vec::new(),
            field_count: 0,
        }
    }

    /// Echo the artifact path this section was extracted from
    pub fn set_source(&mut self, path: &Path) {
        self.source = Some(path.display().to_string());
    }

    /// Append one `name: value` field line
    pub fn field(&mut self, name: &str, value: impl Display) {
        self.lines.push(format!("{name}: {value}"));
        self.field_count += 1;
    }

    /// Append a free-form line
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Append a blank spacer line
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Notice for an absent artifact. Expected, never an error.
    pub fn missing(&mut self, path: &Path) {
        self.lines
            .push(format!("[WARNING] {} does not exist", path.display()));
    }

    /// Notice for a release the artifact predates or postdates
    pub fn unsupported(&mut self, version: MacosVersion) {
        self.lines
            .push(format!("[INFO] not supported on this OS version ({version})"));
    }

    /// Shared notice for the unrecognized-release sentinel
    pub fn unknown_version(&mut self) {
        self.lines
            .push("[WARNING] not a known OS version".to_string());
    }

    /// Notice for a parse or decode failure that was caught locally
    pub fn parse_error(&mut self, what: impl Display) {
        self.lines.push(format!("[ERROR] {what}"));
    }

    /// Number of `field()` lines written so far
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Render the section: banner with the title, optional source echo,
    /// body lines, closing banner, trailing blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&render_banner(&self.title));
        out.push('\n');
        if let Some(source) = &self.source {
            out.push_str(&format!("Source File/Directory: {source}\n"));
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&BANNER_CHAR.to_string().repeat(BANNER_WIDTH));
        out.push('\n');
        out.push('\n');
        out
    }
}

/// Banner line with the title centered in the repeated banner character
fn render_banner(title: &str) -> String {
    let label = format!(" {title} ");
    if label.len() >= BANNER_WIDTH {
        return label;
    }
    let pad = BANNER_WIDTH - label.len();
    let left = pad / 2;
    let right = pad - left;
    format!(
        "{}{}{}",
        BANNER_CHAR.to_string().repeat(left),
        label,
        BANNER_CHAR.to_string().repeat(right)
    )
}
