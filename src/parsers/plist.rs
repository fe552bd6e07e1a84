//! Property list access helpers.
//!
//! All plist decoding is delegated to the `plist` crate, which handles both
//! XML and binary forms transparently. The helpers here only select values
//! out of decoded structures; extractors decide what the values mean for the
//! detected release.

use std::io::Cursor;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use plist::{Dictionary, Value};

/// Parse a plist (XML or binary) from a path
pub fn parse_plist_file(path: &Path) -> Result<Value> {
    Value::from_file(path)
        .with_context(|| format!("could not parse plist {}", path.display()))
}

/// Parse a plist embedded as raw bytes, e.g. a data blob inside another plist
pub fn parse_plist_bytes(data: &[u8]) -> Result<Value> {
    Value::from_reader(Cursor::new(data)).context("could not parse embedded plist data")
}

/// Parse a plist file that must be a dictionary at the top level
pub fn parse_plist_dict(path: &Path) -> Result<Dictionary> {
    let value = parse_plist_file(path)?;
    value
        .into_dictionary()
        .with_context(|| format!("plist {} is not a dictionary", path.display()))
}

/// String value for a key, if present and a string
pub fn dict_string(dict: &Dictionary, key: &str) -> Option<String> {
    dict.get(key)?.as_string().map(str::to_string)
}

/// Signed integer value for a key
pub fn dict_i64(dict: &Dictionary, key: &str) -> Option<i64> {
    dict.get(key)?.as_signed_integer()
}

/// Float value for a key
pub fn dict_f64(dict: &Dictionary, key: &str) -> Option<f64> {
    dict.get(key)?.as_real()
}

/// Boolean value for a key
pub fn dict_bool(dict: &Dictionary, key: &str) -> Option<bool> {
    dict.get(key)?.as_boolean()
}

/// Array value for a key
pub fn dict_array<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a Vec<Value>> {
    dict.get(key)?.as_array()
}

/// Nested dictionary value for a key
pub fn dict_dict<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a Dictionary> {
    dict.get(key)?.as_dictionary()
}

/// Data blob for a key
pub fn dict_data<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a [u8]> {
    dict.get(key)?.as_data()
}

/// Plist date for a key, converted to a UTC calendar time
pub fn dict_date(dict: &Dictionary, key: &str) -> Option<DateTime<Utc>> {
    let date = dict.get(key)?.as_date()?;
    Some(DateTime::<Utc>::from(SystemTime::from(date)))
}

/// Hex rendering for small binary fields (MAC addresses and the like)
pub fn data_as_hex(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<String>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_plist(dir: &TempDir, name: &str, xml: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, xml).unwrap();
        path
    }

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>ProductName</key><string>Mac OS X</string>
    <key>Count</key><integer>7</integer>
    <key>Active</key><true/>
    <key>Score</key><real>1.5</real>
    <key>Names</key><array><string>a</string><string>b</string></array>
    <key>When</key><date>2020-01-26T02:24:01Z</date>
</dict>
</plist>"#;

    #[test]
    fn test_dict_accessors() {
        let dir = TempDir::new().unwrap();
        let path = write_plist(&dir, "sample.plist", SAMPLE);
        let dict = parse_plist_dict(&path).unwrap();

        assert_eq!(dict_string(&dict, "ProductName").unwrap(), "Mac OS X");
        assert_eq!(dict_i64(&dict, "Count").unwrap(), 7);
        assert_eq!(dict_bool(&dict, "Active").unwrap(), true);
        assert_eq!(dict_f64(&dict, "Score").unwrap(), 1.5);
        assert_eq!(dict_array(&dict, "Names").unwrap().len(), 2);
        assert_eq!(
            dict_date(&dict, "When").unwrap().to_rfc3339(),
            "2020-01-26T02:24:01+00:00"
        );
        assert!(dict_string(&dict, "Missing").is_none());
    }

    #[test]
    fn test_malformed_plist_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let path = write_plist(&dir, "broken.plist", "<plist><dict>");
        assert!(parse_plist_file(&path).is_err());
    }

    #[test]
    fn test_data_as_hex() {
        assert_eq!(data_as_hex(&[0xa8, 0x20, 0x66, 0x00]), "a8:20:66:00");
        assert_eq!(data_as_hex(&[]), "");
    }
}
