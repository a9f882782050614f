//! Read side of the analytical store
//!
//! The feature pipeline only needs a handful of lookups over the `games`
//! table and the `player_cumulative` view (see `sql/`). All calls are
//! blocking; async callers go through `spawn_blocking`.

pub mod memory;
pub mod schema;
pub mod sqlite_store;

use crate::error::StoreError;
use crate::model::CumulativeStats;
use chrono::{DateTime, Utc};

pub use memory::MemoryMatchStore;
pub use schema::{open_database, run_schema_migrations};
pub use sqlite_store::SqliteMatchStore;

pub trait MatchStore: Send + Sync {
    /// Distinct match ids, most recent start time first.
    fn match_ids(&self) -> Result<Vec<i64>, StoreError>;

    fn begin_at(&self, match_id: i64) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Distinct acting team ids of a match, ascending.
    fn team_ids(&self, match_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Distinct player ids of one team in a match, ascending.
    fn player_ids(&self, match_id: i64, team_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Latest cumulative aggregate of `player_id` strictly before `before`.
    fn cumulative_before(
        &self,
        player_id: i64,
        before: DateTime<Utc>,
    ) -> Result<Option<CumulativeStats>, StoreError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
