//! Schema loader
//!
//! Runs every `.sql` file of a directory in name order (`01_`, `02_`, ...).
//! Files must be idempotent (`IF NOT EXISTS`), so this is safe on every
//! startup.

use crate::error::StoreError;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub fn run_schema_migrations(conn: &mut Connection, schema_dir: &Path) -> Result<(), StoreError> {
    if !schema_dir.is_dir() {
        return Err(StoreError::Schema(format!(
            "Schema directory not found: {}",
            schema_dir.display()
        )));
    }

    // journal_mode returns the resulting mode as a row
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    log::info!("📊 SQLite journal mode: {}", mode);

    let entries = fs::read_dir(schema_dir)
        .map_err(|e| StoreError::Schema(format!("{}: {}", schema_dir.display(), e)))?;

    let mut sql_files: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();
    sql_files.sort();

    log::info!("🔧 Running schema migrations from: {}", schema_dir.display());

    for path in sql_files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::info!("   ├─ Executing: {}", filename);

        let sql_content = fs::read_to_string(&path)
            .map_err(|e| StoreError::Schema(format!("{}: {}", filename, e)))?;
        conn.execute_batch(&sql_content)?;

        log::info!("   └─ ✅ Success: {}", filename);
    }

    log::info!("✅ All schema migrations completed successfully");

    Ok(())
}

/// Open (creating if needed) the database at `db_path` and apply the schema.
pub fn open_database(db_path: &Path, schema_dir: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Schema(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let mut conn = Connection::open(db_path)?;
    run_schema_migrations(&mut conn, schema_dir)?;

    Ok(conn)
}
