//! Structural validation of raw matches
//!
//! A match that fails any check is rejected whole; nothing downstream ever
//! sees a partially valid match.

use crate::model::{RawMatch, SIDE_SIZE};
use std::collections::{HashMap, HashSet};

/// Lowest final round number of a completed regulation match.
pub const MIN_FINAL_ROUND: i64 = 16;

/// Checks run in order and short-circuit on the first failure.
pub fn validate(game: &RawMatch) -> bool {
    has_identifiers(game) && has_two_full_teams(game) && has_complete_rounds(game)
}

fn has_identifiers(game: &RawMatch) -> bool {
    game.id != 0
        && game.begin_at.is_some()
        && game.map.id != 0
        && game.info.league.id != 0
        && game.info.serie.id != 0
        && game.info.tournament.id != 0
}

fn has_two_full_teams(game: &RawMatch) -> bool {
    let mut entries: HashMap<i64, usize> = HashMap::new();
    let mut rosters: HashMap<i64, HashSet<i64>> = HashMap::new();
    let mut all_players = HashSet::new();

    for stat in &game.players {
        if stat.team.id == 0 || stat.player.id == 0 {
            return false;
        }
        *entries.entry(stat.team.id).or_default() += 1;
        rosters.entry(stat.team.id).or_default().insert(stat.player.id);
        all_players.insert(stat.player.id);
    }

    if rosters.len() != 2 || all_players.len() != 2 * SIDE_SIZE {
        return false;
    }

    rosters.iter().all(|(team, roster)| {
        roster.len() == SIDE_SIZE && entries.get(team) == Some(&SIDE_SIZE)
    })
}

fn has_complete_rounds(game: &RawMatch) -> bool {
    let (first, last) = match (game.rounds.first(), game.rounds.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return false,
    };

    if first.round != 1 {
        return false;
    }

    let all_played = game
        .rounds
        .iter()
        .all(|r| r.round != 0 && r.ct != 0 && r.terrorists != 0 && r.winner_team != 0);

    all_played && last.round >= MIN_FINAL_ROUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::fixtures::{valid_match, TEAM_A};
    use crate::model::raw::{IdRef, PlayerStatistic};

    #[test]
    fn test_minimal_match_is_valid() {
        assert!(validate(&valid_match(1, 16)));
    }

    #[test]
    fn test_missing_identifiers_rejected() {
        let mut game = valid_match(1, 16);
        game.id = 0;
        assert!(!validate(&game));

        let mut game = valid_match(1, 16);
        game.begin_at = None;
        assert!(!validate(&game));

        let mut game = valid_match(1, 16);
        game.map.id = 0;
        assert!(!validate(&game));

        let mut game = valid_match(1, 16);
        game.info.tournament.id = 0;
        assert!(!validate(&game));
    }

    #[test]
    fn test_three_teams_rejected() {
        let mut game = valid_match(1, 16);
        game.players[9].team.id = 3000;
        assert!(!validate(&game));
    }

    #[test]
    fn test_short_roster_rejected() {
        let mut game = valid_match(1, 16);
        game.players.pop();
        assert!(!validate(&game));
    }

    #[test]
    fn test_duplicate_player_entry_rejected() {
        let mut game = valid_match(1, 16);
        let duplicate = game.players[0].clone();
        game.players.push(duplicate);
        assert!(!validate(&game));
    }

    #[test]
    fn test_six_players_on_one_team_rejected() {
        let mut game = valid_match(1, 16);
        game.players.push(PlayerStatistic {
            team: IdRef { id: TEAM_A },
            player: IdRef { id: 11 },
            ..Default::default()
        });
        assert!(!validate(&game));
    }

    #[test]
    fn test_zero_player_id_rejected() {
        let mut game = valid_match(1, 16);
        game.players[3].player.id = 0;
        assert!(!validate(&game));
    }

    #[test]
    fn test_rounds_must_start_at_one() {
        let mut game = valid_match(1, 17);
        game.rounds.remove(0);
        assert!(!validate(&game));

        let mut game = valid_match(1, 16);
        game.rounds.clear();
        assert!(!validate(&game));
    }

    #[test]
    fn test_short_match_rejected() {
        assert!(!validate(&valid_match(1, 15)));
    }

    #[test]
    fn test_round_without_winner_rejected() {
        let mut game = valid_match(1, 16);
        game.rounds[4].winner_team = 0;
        assert!(!validate(&game));

        let mut game = valid_match(1, 16);
        game.rounds[7].ct = 0;
        assert!(!validate(&game));
    }
}
