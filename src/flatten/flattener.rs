//! Combinatorial flattening of a validated match
//!
//! For every round, every team direction and every (acting, opposing)
//! player pair one `FlatRow` is emitted. Symmetric expansion of a validated
//! match therefore yields exactly `2 × 5 × 5 × rounds` rows.

use crate::config::ExpansionMode;
use crate::model::flat::row_id;
use crate::model::{FlatRow, PlayerStatistic, RawMatch, RoundOutcome, Tier};
use std::collections::BTreeMap;

/// Expand a match into its row set.
///
/// Teams are enumerated by ascending id and players keep their order in the
/// statistics list, so the output is fully deterministic. Input that did not
/// pass `validate` may produce an empty or short row set, never a panic.
pub fn flatten(game: &RawMatch, mode: ExpansionMode) -> Vec<FlatRow> {
    let Some(begin_at) = game.begin_at else {
        return Vec::new();
    };

    let mut teams: BTreeMap<i64, Vec<&PlayerStatistic>> = BTreeMap::new();
    for stat in &game.players {
        teams.entry(stat.team.id).or_default().push(stat);
    }

    let mut team_ids = teams.keys().copied();
    let (Some(team_a), Some(team_b)) = (team_ids.next(), team_ids.next()) else {
        return Vec::new();
    };

    let directions: &[(i64, i64)] = match mode {
        ExpansionMode::Symmetric => &[(team_a, team_b), (team_b, team_a)],
        ExpansionMode::SingleDirection => &[(team_a, team_b)],
    };

    let tier_id = Tier::from_label(&game.info.serie.tier).code();
    let league_id = game.info.league.id;
    let serie_id = game.info.serie.id;
    let tournament_id = game.info.tournament.id;
    let map_id = game.map.id;

    let per_round = directions
        .iter()
        .map(|(acting, opposing)| teams[acting].len() * teams[opposing].len())
        .sum::<usize>();
    let mut rows = Vec::with_capacity(per_round * game.rounds.len());

    for round in &game.rounds {
        let round_outcome_id = RoundOutcome::from_label(&round.outcome).code();

        for &(team_id, team_opponent_id) in directions {
            let round_win = i64::from(team_id == round.winner_team);

            for actor in &teams[&team_id] {
                for opponent in &teams[&team_opponent_id] {
                    rows.push(FlatRow {
                        row_id: row_id(
                            game.id,
                            league_id,
                            serie_id,
                            tournament_id,
                            map_id,
                            team_id,
                            team_opponent_id,
                            actor.player.id,
                            opponent.player.id,
                            round.round,
                        ),
                        game_id: game.id,
                        begin_at,
                        league_id,
                        serie_id,
                        tier_id,
                        tournament_id,
                        map_id,
                        team_id,
                        team_opponent_id,
                        player_id: actor.player.id,
                        player_opponent_id: opponent.player.id,
                        round_id: round.round,
                        round_outcome_id,
                        round_win,
                        kills: actor.kills,
                        deaths: actor.deaths,
                        assists: actor.assists,
                        headshots: actor.headshots,
                        flash_assists: actor.flash_assists,
                        first_kills_diff: actor.first_kills_diff,
                        kd_diff: actor.kd_diff,
                        adr: actor.adr,
                        kast: actor.kast,
                        rating: actor.rating,
                    });
                }
            }
        }
    }

    rows
}
