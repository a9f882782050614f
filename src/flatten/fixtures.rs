//! Well-formed match builder for unit tests.

use crate::model::raw::{IdRef, MatchInfo, PlayerStatistic, RawMatch, Round, Serie};
use chrono::{TimeZone, Utc};

pub const TEAM_A: i64 = 1000;
pub const TEAM_B: i64 = 2000;

/// Two teams of five (`TEAM_A` players 1..=5, `TEAM_B` players 6..=10) and
/// `rounds` rounds alternating winners.
pub fn valid_match(id: i64, rounds: i64) -> RawMatch {
    let players = (1..=10)
        .map(|pid| PlayerStatistic {
            team: IdRef {
                id: if pid <= 5 { TEAM_A } else { TEAM_B },
            },
            player: IdRef { id: pid },
            kills: 10 + pid,
            deaths: 12,
            assists: 3,
            headshots: 5,
            flash_assists: 1,
            kd_diff: pid as f64 - 2.0,
            first_kills_diff: 1.0,
            adr: 70.0 + pid as f64,
            kast: 68.5,
            rating: 1.05,
        })
        .collect();

    let rounds = (1..=rounds)
        .map(|n| Round {
            round: n,
            ct: 1,
            terrorists: 2,
            winner_team: if n % 2 == 0 { TEAM_B } else { TEAM_A },
            outcome: "eliminated".to_string(),
        })
        .collect();

    RawMatch {
        id,
        begin_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()),
        info: MatchInfo {
            league: IdRef { id: 1 },
            serie: Serie {
                id: 2,
                tier: "a".to_string(),
            },
            tournament: IdRef { id: 3 },
        },
        map: IdRef { id: 7 },
        players,
        rounds,
    }
}
