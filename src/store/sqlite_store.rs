//! SQLite implementation of `MatchStore`

use super::{open_database, MatchStore};
use crate::error::StoreError;
use crate::model::CumulativeStats;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const CUMULATIVE_BEFORE_SQL: &str = r#"
    SELECT
        kills_total, deaths_total, assists_total, headshots_total, flash_assists_total,
        kills_per_round, deaths_per_round, assists_per_round, headshots_per_round,
        flash_assists_per_round,
        kills_per_game, deaths_per_game, assists_per_game, headshots_per_game,
        flash_assists_per_game, first_kills_diff_per_game, kd_diff_per_game,
        adr_per_game, kast_per_game, rating_per_game
    FROM player_cumulative
    WHERE player_id = ?1 AND begin_at < ?2
    ORDER BY begin_at DESC, game_id DESC
    LIMIT 1
"#;

/// Queries serialize on one connection.
#[derive(Clone)]
pub struct SqliteMatchStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMatchStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open the database file and make sure the schema exists.
    pub fn open(db_path: &Path, schema_dir: &Path) -> Result<Self, StoreError> {
        let conn = open_database(db_path, schema_dir)?;
        log::info!("✅ SQLite match store opened: {}", db_path.display());
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn ids(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<i64>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let ids = stmt
            .query_map(args, |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

fn cumulative_from_row(row: &Row<'_>) -> rusqlite::Result<CumulativeStats> {
    Ok(CumulativeStats {
        kills_total: row.get(0)?,
        deaths_total: row.get(1)?,
        assists_total: row.get(2)?,
        headshots_total: row.get(3)?,
        flash_assists_total: row.get(4)?,
        kills_per_round: row.get(5)?,
        deaths_per_round: row.get(6)?,
        assists_per_round: row.get(7)?,
        headshots_per_round: row.get(8)?,
        flash_assists_per_round: row.get(9)?,
        kills_per_game: row.get(10)?,
        deaths_per_game: row.get(11)?,
        assists_per_game: row.get(12)?,
        headshots_per_game: row.get(13)?,
        flash_assists_per_game: row.get(14)?,
        first_kills_diff_per_game: row.get(15)?,
        kd_diff_per_game: row.get(16)?,
        adr_per_game: row.get(17)?,
        kast_per_game: row.get(18)?,
        rating_per_game: row.get(19)?,
    })
}

impl MatchStore for SqliteMatchStore {
    fn match_ids(&self) -> Result<Vec<i64>, StoreError> {
        self.ids(
            "SELECT game_id FROM games GROUP BY game_id ORDER BY MAX(begin_at) DESC, game_id DESC",
            [],
        )
    }

    fn begin_at(&self, match_id: i64) -> Result<Option<DateTime<Utc>>, StoreError> {
        let conn = self.lock()?;
        // MIN() yields one NULL row when the match is absent
        let secs: Option<i64> = conn.query_row(
            "SELECT MIN(begin_at) FROM games WHERE game_id = ?1",
            params![match_id],
            |row| row.get(0),
        )?;
        Ok(secs.and_then(|s| DateTime::from_timestamp(s, 0)))
    }

    fn team_ids(&self, match_id: i64) -> Result<Vec<i64>, StoreError> {
        self.ids(
            "SELECT DISTINCT team_id FROM games WHERE game_id = ?1 ORDER BY team_id",
            params![match_id],
        )
    }

    fn player_ids(&self, match_id: i64, team_id: i64) -> Result<Vec<i64>, StoreError> {
        self.ids(
            "SELECT DISTINCT player_id FROM games
             WHERE game_id = ?1 AND team_id = ?2
             ORDER BY player_id",
            params![match_id, team_id],
        )
    }

    fn cumulative_before(
        &self,
        player_id: i64,
        before: DateTime<Utc>,
    ) -> Result<Option<CumulativeStats>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(CUMULATIVE_BEFORE_SQL)?;
        let stats = stmt
            .query_row(params![player_id, before.timestamp()], cumulative_from_row)
            .optional()?;
        Ok(stats)
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
