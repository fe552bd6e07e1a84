//! Gzip decompression for rotated log files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Decompress a gzipped text file into a string
pub fn read_gzip_text(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("could not open gzip file {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .with_context(|| format!("could not decompress {}", path.display()))?;
    Ok(text)
}
