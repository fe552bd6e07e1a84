//! Shared helpers: epoch timestamp conversion and the machine-readable run
//! summary.

pub mod summary;
pub mod time;

pub use summary::create_run_summary;
