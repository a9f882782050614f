//! SQLite sink for flattened rows
//!
//! Each batch is one transaction: the prepared upsert runs once per row and
//! the batch commits at the end. Any failing row drops the transaction, which
//! rolls the whole batch back.

use super::BatchSink;
use crate::error::SinkError;
use crate::model::FlatRow;
use crate::store::open_database;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

const INSERT_ROW_SQL: &str = r#"
    INSERT OR REPLACE INTO games (
        row_id, game_id, begin_at,
        league_id, serie_id, tier_id, tournament_id, map_id,
        team_id, team_opponent_id, player_id, player_opponent_id,
        round_id, round_outcome_id, round_win,
        kills, deaths, assists, headshots, flash_assists,
        first_kills_diff, kd_diff, adr, kast, rating
    ) VALUES (
        ?1, ?2, ?3,
        ?4, ?5, ?6, ?7, ?8,
        ?9, ?10, ?11, ?12,
        ?13, ?14, ?15,
        ?16, ?17, ?18, ?19, ?20,
        ?21, ?22, ?23, ?24, ?25
    )
"#;

/// Upsert `rows` on `conn`. Callers own the surrounding transaction.
pub fn insert_rows(conn: &Connection, rows: &[FlatRow]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_ROW_SQL)?;
    for row in rows {
        stmt.execute(params![
            row.row_id,
            row.game_id,
            row.begin_at.timestamp(),
            row.league_id,
            row.serie_id,
            row.tier_id,
            row.tournament_id,
            row.map_id,
            row.team_id,
            row.team_opponent_id,
            row.player_id,
            row.player_opponent_id,
            row.round_id,
            row.round_outcome_id,
            row.round_win,
            row.kills,
            row.deaths,
            row.assists,
            row.headshots,
            row.flash_assists,
            row.first_kills_diff,
            row.kd_diff,
            row.adr,
            row.kast,
            row.rating,
        ])?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct SqliteRowSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRowSink {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open the database file and make sure the schema exists.
    pub fn open(db_path: &Path, schema_dir: &Path) -> Result<Self, SinkError> {
        let conn = open_database(db_path, schema_dir).map_err(|e| SinkError::Database(e.to_string()))?;
        log::info!("✅ SQLite row sink initialized: {}", db_path.display());
        Ok(Self::new(conn))
    }

    fn write_batch(conn: &Mutex<Connection>, rows: &[FlatRow]) -> Result<(), SinkError> {
        let mut conn = conn
            .lock()
            .map_err(|_| SinkError::Database("connection lock poisoned".to_string()))?;

        let tx = conn.transaction()?;
        insert_rows(&tx, rows)?;
        tx.commit()?;

        Ok(())
    }
}

#[async_trait]
impl BatchSink<FlatRow> for SqliteRowSink {
    async fn save(&self, batch: Vec<FlatRow>) -> Result<(), SinkError> {
        if batch.is_empty() {
            return Ok(());
        }

        let conn = Arc::clone(&self.conn);
        let count = batch.len();
        tokio::task::spawn_blocking(move || Self::write_batch(&conn, &batch))
            .await
            .map_err(|e| SinkError::Database(format!("write task failed: {}", e)))??;

        log::debug!("✅ Flushed {} rows to SQLite", count);
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionMode;
    use crate::flatten::fixtures::valid_match;
    use crate::flatten::flatten;
    use tempfile::tempdir;

    fn schema_dir() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/sql"))
    }

    fn row_count(db_path: &Path) -> i64 {
        let conn = Connection::open(db_path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_batch_write() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let sink = SqliteRowSink::open(&db_path, schema_dir()).unwrap();

        let rows = flatten(&valid_match(1, 16), ExpansionMode::Symmetric);
        sink.save(rows).await.unwrap();

        assert_eq!(row_count(&db_path), 800);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let sink = SqliteRowSink::open(&db_path, schema_dir()).unwrap();

        sink.save(Vec::new()).await.unwrap();

        assert_eq!(row_count(&db_path), 0);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let sink = SqliteRowSink::open(&db_path, schema_dir()).unwrap();

        let rows = flatten(&valid_match(1, 16), ExpansionMode::Symmetric);
        sink.save(rows.clone()).await.unwrap();
        sink.save(rows).await.unwrap();

        assert_eq!(row_count(&db_path), 800);
    }

    #[tokio::test]
    async fn test_failing_row_rolls_back_batch() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let sink = SqliteRowSink::open(&db_path, schema_dir()).unwrap();

        let mut rows = flatten(&valid_match(1, 16), ExpansionMode::Symmetric);
        let last = rows.len() - 1;
        rows[last].round_win = 2;

        let result = sink.save(rows).await;

        assert!(matches!(result, Err(SinkError::Database(_))));
        assert_eq!(row_count(&db_path), 0);
    }
}
