//! Artifact extraction: the extractor contract, the dispatcher that drives
//! registered extractors, OS release detection, and the per-artifact
//! handlers themselves.

pub mod dispatch;
pub mod extractor;
pub mod macos;
pub mod registry;
pub mod version;

pub use dispatch::{run_extractors, Outcome, RunDiagnostic};
pub use extractor::{ArtifactExtractor, RunContext};
pub use registry::{all_extractors, summary_extractors};
pub use version::detect_version;
