//! Read-only SQLite access for evidence databases.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

/// Open an evidence database read-only.
///
/// The `immutable=1` URI parameter bypasses SQLite's locking protocol, which
/// matters when the database was copied out of an image together with stale
/// `-wal`/`-shm` companions. The evidence file is never written.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let uri = format!("file:{}?immutable=1", path.display());
    Connection::open_with_flags(
        &uri,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
    .with_context(|| format!("could not open database {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_read_only_roundtrip() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("events.db");

        // Build a fixture database with a writable connection first
        let setup = Connection::open(&db_path).unwrap();
        setup
            .execute_batch(
                "CREATE TABLE event (id INTEGER PRIMARY KEY, name TEXT);
                 INSERT INTO event (name) VALUES ('download');",
            )
            .unwrap();
        drop(setup);

        let conn = open_read_only(&db_path).unwrap();
        let name: String = conn
            .query_row("SELECT name FROM event WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "download");

        // Writes must be refused on the evidence handle
        assert!(conn
            .execute("INSERT INTO event (name) VALUES ('nope')", [])
            .is_err());
    }

    #[test]
    fn test_corrupt_database_is_an_error() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("broken.db");
        std::fs::write(&db_path, b"this is not a sqlite file").unwrap();

        let conn = open_read_only(&db_path).unwrap();
        // The header is validated lazily, on first query
        let result: rusqlite::Result<i64> =
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
