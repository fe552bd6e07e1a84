//! # mactriage
//!
//! A forensic triage tool for macOS disk images. Given a mounted or extracted
//! macOS filesystem root and an output directory, mactriage walks a fixed set
//! of known artifact locations (property lists, SQLite databases, gzipped
//! logs, directory listings) and renders their contents into human-readable
//! plain-text reports.
//!
//! ## Overview
//!
//! - **Dead-box only**: the evidence root is read, never the live host
//! - **Version aware**: one OS release detection up front drives the
//!   schema branching inside every extractor
//! - **Append-only reports**: extractors append self-delimited sections to
//!   named report files; several extractors may share one report
//! - **Parallel dispatch**: full runs fan extractors out over a bounded
//!   thread pool and join before the run is declared complete
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use mactriage::artifacts::{dispatch, registry, RunContext};
//! use mactriage::artifacts::version::detect_version;
//! use mactriage::config::{DispatchMode, RunConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = Path::new("/mnt/evidence");
//! let output = Path::new("/tmp/reports");
//!
//! let version = detect_version(input);
//! let config = RunConfig::new(input, output, version, DispatchMode::Parallel);
//! let ctx = RunContext::new(config)?;
//!
//! let extractors = registry::all_extractors();
//! let diagnostics = dispatch::run_extractors(&ctx, &extractors);
//! println!("{} extractors finished", diagnostics.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Run configuration and the macOS release enumeration
//! - [`artifacts`]: Extractor contract, registry, dispatch, and the
//!   per-artifact extractors
//! - [`report`]: Report section rendering and serialized per-file writers
//! - [`parsers`]: Thin wrappers over the plist, SQLite, and gzip decoders
//! - [`utils`]: Timestamp epoch conversion and run summary generation
//! - [`constants`]: Fixed artifact paths and report names

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Run configuration and the macOS release enumeration
pub mod config;

/// Artifact extractors, registry, and dispatch
pub mod artifacts;

/// Report section rendering and serialized per-file writers
pub mod report;

/// Thin wrappers over the plist, SQLite, and gzip decoders
pub mod parsers;

/// Timestamp conversion and run summary utilities
pub mod utils;

/// Application constants: artifact paths, report names, banner layout
pub mod constants;
