use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per (round, acting player, opposing player).
///
/// Maps 1:1 onto the `games` table (see `sql/01_games.sql`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    /// UUID v5 over the identity fields, stable across re-processing
    pub row_id: String,
    pub game_id: i64,
    pub begin_at: DateTime<Utc>,

    pub league_id: i64,
    pub serie_id: i64,
    pub tier_id: i64,
    pub tournament_id: i64,
    pub map_id: i64,

    pub team_id: i64,
    pub team_opponent_id: i64,
    pub player_id: i64,
    pub player_opponent_id: i64,

    pub round_id: i64,
    pub round_outcome_id: i64,
    /// 1 if `team_id` won the round, else 0
    pub round_win: i64,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub headshots: i64,
    pub flash_assists: i64,
    pub first_kills_diff: f64,
    pub kd_diff: f64,
    pub adr: f64,
    pub kast: f64,
    pub rating: f64,
}

impl FlatRow {
    /// Identity tuple; unique within one flatten call.
    pub fn identity(&self) -> (i64, i64, i64, i64, i64, i64) {
        (
            self.game_id,
            self.round_id,
            self.team_id,
            self.team_opponent_id,
            self.player_id,
            self.player_opponent_id,
        )
    }
}

/// Deterministic row id: identical inputs always hash to the same UUID.
#[allow(clippy::too_many_arguments)]
pub fn row_id(
    game_id: i64,
    league_id: i64,
    serie_id: i64,
    tournament_id: i64,
    map_id: i64,
    team_id: i64,
    team_opponent_id: i64,
    player_id: i64,
    player_opponent_id: i64,
    round_id: i64,
) -> String {
    let key = format!(
        "{}-{}-{}-{}-{}-{}-{}-{}-{}-{}",
        game_id,
        league_id,
        serie_id,
        tournament_id,
        map_id,
        team_id,
        team_opponent_id,
        player_id,
        player_opponent_id,
        round_id
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_is_stable() {
        let a = row_id(1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
        let b = row_id(1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_row_id_depends_on_direction() {
        let forward = row_id(1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
        let reverse = row_id(1, 2, 3, 4, 5, 7, 6, 9, 8, 10);
        assert_ne!(forward, reverse);
    }
}
