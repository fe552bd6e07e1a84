use anyhow::Result;

use crate::config::RunConfig;
use crate::report::{ReportRegistry, ReportSection};

/// Everything an extractor sees during a run: the immutable configuration
/// and the serialized report writers. Shared by reference into every
/// extractor; nothing here is mutated after construction.
pub struct RunContext {
    pub config: RunConfig,
    reports: ReportRegistry,
    report_override: Option<&'static str>,
}

impl RunContext {
    pub fn new(config: RunConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.output)?;
        let reports = ReportRegistry::new(&config.output);
        Ok(RunContext {
            config,
            reports,
            report_override: None,
        })
    }

    /// Context for summary mode: every section lands in `report_name`
    /// regardless of the extractor's normal target.
    pub fn with_report_override(config: RunConfig, report_name: &'static str) -> Result<Self> {
        let mut ctx = RunContext::new(config)?;
        ctx.report_override = Some(report_name);
        Ok(ctx)
    }

    /// Append a finished section to the named report (or to the summary
    /// override when one is set). The section is rendered before the file
    /// lock is taken, so the append is atomic per section.
    pub fn append(&self, report_name: &str, section: &ReportSection) -> Result<()> {
        let target = self.report_override.unwrap_or(report_name);
        self.reports.append(target, section)
    }

    pub fn reports(&self) -> &ReportRegistry {
        &self.reports
    }
}

/// The uniform contract every artifact extractor satisfies.
///
/// An extractor locates its artifact under the evidence root using paths
/// fixed at definition time, parses it with the appropriate format decoder,
/// and appends release-specific fields to its report. All expected failure
/// modes (missing artifact, unsupported release, unrecognized release,
/// malformed input) become report notices; `extract` returning `Err` means
/// an extractor bug, which the dispatcher records and skips past.
pub trait ArtifactExtractor: Send + Sync {
    /// Display name used in section banners and `--list` output
    fn name(&self) -> &'static str;

    /// One-line description for `--list` output
    fn description(&self) -> &'static str;

    /// Report filename this extractor normally appends to
    fn report_name(&self) -> &'static str;

    /// Perform the extraction and append section(s) via the context
    fn extract(&self, ctx: &RunContext) -> Result<()>;
}
