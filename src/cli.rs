use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the triage tool.
///
/// The tool reads a mounted (or unpacked) macOS evidence root and writes
/// plain-text reports into the output directory. Listing registered
/// extractors touches no files at all.
#[derive(Parser, Debug)]
#[clap(name = "mactriage", about = "Forensic artifact extraction for macOS disk images")]
pub struct Args {
    /// Path to the mounted evidence root (the volume root of the image)
    #[clap(short, long)]
    pub input: PathBuf,

    /// Directory to write reports into (created if absent)
    #[clap(short, long)]
    pub output: PathBuf,

    /// List registered extractors and exit without reading the evidence
    #[clap(short, long)]
    pub list: bool,

    /// Summary mode: run a fixed subset sequentially into Summary.txt
    #[clap(short, long)]
    pub summary: bool,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}
