//! In-memory `MatchStore` for tests and offline runs.

use super::MatchStore;
use crate::error::StoreError;
use crate::model::{CumulativeStats, FlatRow};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    rows: Vec<FlatRow>,
    /// player id -> (as-of time, aggregate), any order
    history: HashMap<i64, Vec<(DateTime<Utc>, CumulativeStats)>>,
}

#[derive(Default)]
pub struct MemoryMatchStore {
    inner: Mutex<Inner>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rows(&self, rows: impl IntoIterator<Item = FlatRow>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.rows.extend(rows);
        }
    }

    pub fn add_history(&self, player_id: i64, as_of: DateTime<Utc>, stats: CumulativeStats) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.history.entry(player_id).or_default().push((as_of, stats));
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MatchStore for MemoryMatchStore {
    fn match_ids(&self) -> Result<Vec<i64>, StoreError> {
        let inner = self.lock()?;
        let mut latest: HashMap<i64, DateTime<Utc>> = HashMap::new();
        for row in &inner.rows {
            let entry = latest.entry(row.game_id).or_insert(row.begin_at);
            *entry = (*entry).max(row.begin_at);
        }

        let mut ids: Vec<(i64, DateTime<Utc>)> = latest.into_iter().collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Ok(ids.into_iter().map(|(id, _)| id).collect())
    }

    fn begin_at(&self, match_id: i64) -> Result<Option<DateTime<Utc>>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .rows
            .iter()
            .filter(|r| r.game_id == match_id)
            .map(|r| r.begin_at)
            .min())
    }

    fn team_ids(&self, match_id: i64) -> Result<Vec<i64>, StoreError> {
        let inner = self.lock()?;
        let teams: BTreeSet<i64> = inner
            .rows
            .iter()
            .filter(|r| r.game_id == match_id)
            .map(|r| r.team_id)
            .collect();
        Ok(teams.into_iter().collect())
    }

    fn player_ids(&self, match_id: i64, team_id: i64) -> Result<Vec<i64>, StoreError> {
        let inner = self.lock()?;
        let players: BTreeSet<i64> = inner
            .rows
            .iter()
            .filter(|r| r.game_id == match_id && r.team_id == team_id)
            .map(|r| r.player_id)
            .collect();
        Ok(players.into_iter().collect())
    }

    fn cumulative_before(
        &self,
        player_id: i64,
        before: DateTime<Utc>,
    ) -> Result<Option<CumulativeStats>, StoreError> {
        let inner = self.lock()?;
        let Some(entries) = inner.history.get(&player_id) else {
            return Ok(None);
        };

        Ok(entries
            .iter()
            .filter(|(as_of, _)| *as_of < before)
            .max_by_key(|(as_of, _)| *as_of)
            .map(|(_, stats)| stats.clone()))
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_history_lookup_is_strict() {
        let store = MemoryMatchStore::new();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        store.add_history(7, t0, CumulativeStats { kills_total: 1.0, ..Default::default() });
        store.add_history(
            7,
            t0 + Duration::hours(2),
            CumulativeStats { kills_total: 2.0, ..Default::default() },
        );

        assert!(store.cumulative_before(7, t0).unwrap().is_none());

        let one = store.cumulative_before(7, t0 + Duration::hours(2)).unwrap().unwrap();
        assert_eq!(one.kills_total, 1.0);

        let two = store.cumulative_before(7, t0 + Duration::hours(3)).unwrap().unwrap();
        assert_eq!(two.kills_total, 2.0);

        assert!(store.cumulative_before(8, t0 + Duration::days(1)).unwrap().is_none());
    }
}
