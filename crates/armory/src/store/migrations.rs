//! Schema versioning for the armory store.
//!
//! The version lives in the `metadata` table. A fresh database is stamped
//! with [`CURRENT_VERSION`]; a database written by a newer build is refused
//! so its data is never misread.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Create the tables if needed and check the stored schema version.
///
/// # Errors
///
/// Returns an error if table creation fails or the database carries an
/// unreadable or newer schema version.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match schema_version(conn)? {
        None => stamp_version(conn),
        Some(version) if version > CURRENT_VERSION => Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        }),
        Some(_) => Ok(()),
    }
}

fn schema_version(conn: &Connection) -> Result<Option<i32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|value| {
            value.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("invalid schema version: {value}"),
            })
        })
        .transpose()
}

fn stamp_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, CURRENT_VERSION.to_string()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn write_version(conn: &Connection, value: &str) {
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, []).unwrap();
        }
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            [VERSION_KEY, value],
        )
        .unwrap();
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        for table in ["kv_store", "metadata"] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_fresh_database_is_stamped() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), Some(CURRENT_VERSION));
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = create_test_db();

        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");

        assert_eq!(schema_version(&conn).unwrap(), Some(CURRENT_VERSION));
    }

    #[test]
    fn test_invalid_schema_version() {
        let conn = create_test_db();
        write_version(&conn, "one");

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = create_test_db();
        write_version(&conn, &(CURRENT_VERSION + 1).to_string());

        let err = initialize_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::DatabaseMigration { .. }));
    }
}
