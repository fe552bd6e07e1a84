use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use super::extractor::{ArtifactExtractor, RunContext};
use crate::config::DispatchMode;

/// Result of driving one extractor to completion.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `extract` returned Ok; notices inside the report still count as
    /// completed
    Completed,
    /// `extract` returned Err or panicked; the message is kept for the run
    /// summary
    Failed(String),
}

/// Per-extractor record collected by the dispatcher.
#[derive(Debug, Serialize, Clone)]
pub struct RunDiagnostic {
    pub extractor: String,
    pub report: String,
    pub outcome: Outcome,
}

/// Worker pool size: available parallelism minus one, minimum one.
pub fn worker_pool_size() -> usize {
    std::cmp::max(num_cpus::get().saturating_sub(1), 1)
}

/// Drive every extractor and collect a diagnostic for each.
///
/// Both strategies join all work before returning: the run is complete only
/// once every extractor has finished or failed. An individual failure is
/// logged and recorded, never fatal to the rest of the run.
pub fn run_extractors(
    ctx: &RunContext,
    extractors: &[Box<dyn ArtifactExtractor>],
) -> Vec<RunDiagnostic> {
    match ctx.config.mode {
        DispatchMode::Sequential => extractors
            .iter()
            .map(|extractor| run_one(ctx, extractor.as_ref()))
            .collect(),
        DispatchMode::Parallel => run_parallel(ctx, extractors),
    }
}

fn run_parallel(
    ctx: &RunContext,
    extractors: &[Box<dyn ArtifactExtractor>],
) -> Vec<RunDiagnostic> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_pool_size())
        .build();
    match pool {
        Ok(pool) => pool.install(|| {
            extractors
                .par_iter()
                .map(|extractor| run_one(ctx, extractor.as_ref()))
                .collect()
        }),
        Err(err) => {
            // A pool we cannot build degrades to sequential, not to a lost run
            warn!("Failed to build worker pool, running sequentially: {err}");
            extractors
                .iter()
                .map(|extractor| run_one(ctx, extractor.as_ref()))
                .collect()
        }
    }
}

fn run_one(ctx: &RunContext, extractor: &dyn ArtifactExtractor) -> RunDiagnostic {
    info!("Extracting artifact: {}", extractor.name());

    let result = catch_unwind(AssertUnwindSafe(|| extractor.extract(ctx)));
    let outcome = match result {
        Ok(Ok(())) => Outcome::Completed,
        Ok(Err(err)) => {
            warn!("Extractor {} failed: {err:#}", extractor.name());
            Outcome::Failed(format!("{err:#}"))
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            warn!("Extractor {} panicked: {message}", extractor.name());
            Outcome::Failed(format!("panic: {message}"))
        }
    };

    RunDiagnostic {
        extractor: extractor.name().to_string(),
        report: extractor.report_name().to_string(),
        outcome,
    }
}
