//! Format decoders this tool delegates to, wrapped thin.
//!
//! Decoding correctness is the libraries' concern; these modules only adapt
//! the library surfaces to evidence-handling rules (read-only access,
//! errors instead of panics on malformed input).

/// Property list parsing and value selection
pub mod plist;

/// Read-only SQLite access
pub mod sqlite;

/// Gzip decompression for rotated logs
pub mod gzip;
