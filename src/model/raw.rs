//! Raw match document as delivered by the upstream feed.
//!
//! Every field defaults when absent; structural problems are the
//! validator's job, not the decoder's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdRef {
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Serie {
    pub id: i64,
    pub tier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchInfo {
    pub league: IdRef,
    pub serie: Serie,
    pub tournament: IdRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStatistic {
    pub team: IdRef,
    pub player: IdRef,
    /// Counting statistics; a fractional value fails to decode
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub headshots: i64,
    pub flash_assists: i64,
    #[serde(alias = "k_d_diff")]
    pub kd_diff: f64,
    pub first_kills_diff: f64,
    pub adr: f64,
    pub kast: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Round {
    pub round: i64,
    /// Counter-terrorists alive at round end
    pub ct: i64,
    /// Terrorists alive at round end
    pub terrorists: i64,
    pub winner_team: i64,
    pub outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMatch {
    pub id: i64,
    pub begin_at: Option<DateTime<Utc>>,
    #[serde(rename = "match")]
    pub info: MatchInfo,
    pub map: IdRef,
    pub players: Vec<PlayerStatistic>,
    pub rounds: Vec<Round>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_feed_document() {
        let json = r#"{
            "id": 42,
            "begin_at": "2024-03-01T18:00:00Z",
            "match": {
                "league": {"id": 1, "name": "ESL"},
                "serie": {"id": 2, "tier": "a"},
                "tournament": {"id": 3, "prizepool": "100000 USD"}
            },
            "map": {"id": 7, "name": "Mirage"},
            "players": [
                {"team": {"id": 10}, "player": {"id": 100, "name": "p"}, "kills": 21,
                 "deaths": 15, "k_d_diff": 6, "adr": 88.5, "kast": 74.1, "rating": 1.21}
            ],
            "rounds": [{"round": 1, "ct": 2, "terrorists": 0, "winner_team": 10, "outcome": "eliminated"}]
        }"#;

        let game: RawMatch = serde_json::from_str(json).unwrap();

        assert_eq!(game.id, 42);
        assert!(game.begin_at.is_some());
        assert_eq!(game.info.serie.tier, "a");
        assert_eq!(game.map.id, 7);
        assert_eq!(game.players[0].kd_diff, 6.0);
        assert_eq!(game.players[0].kills, 21);
        assert_eq!(game.players[0].flash_assists, 0);
        assert_eq!(game.rounds[0].winner_team, 10);
    }

    #[test]
    fn test_fractional_count_rejected() {
        let json = r#"{"id": 1, "players": [{"player": {"id": 5}, "kills": 21.7}]}"#;
        assert!(serde_json::from_str::<RawMatch>(json).is_err());

        let json = r#"{"id": 1, "players": [{"player": {"id": 5}, "adr": 21.7}]}"#;
        assert!(serde_json::from_str::<RawMatch>(json).is_ok());
    }

    #[test]
    fn test_missing_fields_default() {
        let game: RawMatch = serde_json::from_str("{}").unwrap();
        assert_eq!(game.id, 0);
        assert!(game.begin_at.is_none());
        assert!(game.players.is_empty());
    }
}
