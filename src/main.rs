use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger,
};

use mactriage::artifacts::{self, detect_version, RunContext};
use mactriage::artifacts::version::detect_raw_version;
use mactriage::cli::Args;
use mactriage::config::{validate_directories, DispatchMode, RunConfig};
use mactriage::constants::REPORT_SUMMARY;
use mactriage::utils::create_run_summary;

fn main() -> Result<()> {
    let args = Args::parse();

    // Listing touches neither the evidence nor the output directory
    if args.list {
        list_extractors();
        return Ok(());
    }

    validate_directories(&args.input, &args.output)?;
    initialize_logging(&args)?;

    info!("Starting triage of {}", args.input.display());

    let os_version = detect_version(&args.input);
    let raw_version = detect_raw_version(&args.input);

    let (ctx, extractors) = build_run(&args, os_version)?;
    let diagnostics = artifacts::run_extractors(&ctx, &extractors);

    let touched = ctx.reports().touched_reports();
    create_run_summary(&ctx.config, &raw_version, &diagnostics, &touched)?;

    let failed = diagnostics
        .iter()
        .filter(|d| d.outcome != artifacts::Outcome::Completed)
        .count();
    info!(
        "Triage completed: {} extractors run, {} failed, {} reports written",
        diagnostics.len(),
        failed,
        touched.len()
    );
    Ok(())
}

/// Print one line per registered extractor and exit
fn list_extractors() {
    for extractor in artifacts::all_extractors() {
        println!(
            "{:<20} {:<18} {}",
            extractor.name(),
            extractor.report_name(),
            extractor.description()
        );
    }
}

/// Log to the terminal and to a timestamped file beside the reports
fn initialize_logging(args: &Args) -> Result<()> {
    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_path = args.output.join(format!(
        "mactriage_{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    CombinedLogger::init(vec![
        TermLogger::new(
            log_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(log_level, Config::default(), log_file),
    ])
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Build the run context and extractor set for the chosen mode.
///
/// A full run drives every extractor in parallel; summary mode drives a
/// fixed subset sequentially so the single summary report stays in order.
fn build_run(
    args: &Args,
    os_version: mactriage::config::MacosVersion,
) -> Result<(RunContext, Vec<Box<dyn artifacts::ArtifactExtractor>>)> {
    if args.summary {
        info!("Summary mode: writing all sections to {REPORT_SUMMARY}");
        let config = RunConfig::new(
            &args.input,
            &args.output,
            os_version,
            DispatchMode::Sequential,
        );
        let ctx = RunContext::with_report_override(config, REPORT_SUMMARY)?;
        Ok((ctx, artifacts::summary_extractors()))
    } else {
        let config = RunConfig::new(
            &args.input,
            &args.output,
            os_version,
            DispatchMode::Parallel,
        );
        let ctx = RunContext::new(config)?;
        Ok((ctx, artifacts::all_extractors()))
    }
}
