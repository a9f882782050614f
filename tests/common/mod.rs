//! Shared helpers for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TEAM_A: i64 = 100;
pub const TEAM_B: i64 = 200;

pub fn schema_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("sql")
}

/// Raw feed document: players 1..=5 on `TEAM_A`, 6..=10 on `TEAM_B`,
/// `kills = 10 + player id`, alternating round winners.
pub fn raw_match(id: i64, begin_at: &str, rounds: i64) -> Value {
    let players: Vec<Value> = (1..=10)
        .map(|pid: i64| {
            json!({
                "team": { "id": if pid <= 5 { TEAM_A } else { TEAM_B } },
                "player": { "id": pid },
                "kills": 10 + pid,
                "deaths": 15,
                "assists": 4,
                "headshots": 6,
                "flash_assists": 2,
                "k_d_diff": pid - 5,
                "first_kills_diff": 0,
                "adr": 75.5,
                "kast": 70.0,
                "rating": 1.1
            })
        })
        .collect();

    let rounds: Vec<Value> = (1..=rounds)
        .map(|n| {
            json!({
                "round": n,
                "ct": 2,
                "terrorists": 1,
                "winner_team": if n % 2 == 0 { TEAM_B } else { TEAM_A },
                "outcome": if n % 3 == 0 { "defused" } else { "eliminated" }
            })
        })
        .collect();

    json!({
        "id": id,
        "begin_at": begin_at,
        "match": {
            "league": { "id": 11 },
            "serie": { "id": 22, "tier": "s" },
            "tournament": { "id": 33 }
        },
        "map": { "id": 4 },
        "players": players,
        "rounds": rounds
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Poll `check` every 20ms until it holds; panics after `timeout`.
pub async fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut check: F) {
    let deadline = tokio::time::Instant::now() + timeout;
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "condition not met in {:?}", timeout);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
