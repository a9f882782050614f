//! Match id → `MatchParams`

use crate::error::StoreError;
use crate::model::{MatchParams, SIDE_SIZE};
use crate::store::MatchStore;

/// Resolve the start time and ten player slots of a match.
///
/// `Ok(None)` is a permanent failure (no start time, fewer than two teams, or
/// a side with fewer than five players); the match is not worth retrying.
/// Side A is the lower team id. Extra teams and players beyond five per side
/// are ignored.
pub fn resolve(store: &dyn MatchStore, match_id: i64) -> Result<Option<MatchParams>, StoreError> {
    let Some(begin_at) = store.begin_at(match_id)? else {
        log::debug!("Match {} has no start time, dropping", match_id);
        return Ok(None);
    };

    let teams = store.team_ids(match_id)?;
    if teams.len() < 2 {
        log::debug!("Match {} has {} teams, dropping", match_id, teams.len());
        return Ok(None);
    }

    let mut player_ids = [0i64; 2 * SIDE_SIZE];
    for (side, team_id) in teams.iter().take(2).enumerate() {
        let players = store.player_ids(match_id, *team_id)?;
        if players.len() < SIDE_SIZE {
            log::debug!(
                "Match {} team {} has {} players, dropping",
                match_id,
                team_id,
                players.len()
            );
            return Ok(None);
        }

        let slots = &mut player_ids[side * SIDE_SIZE..(side + 1) * SIDE_SIZE];
        slots.copy_from_slice(&players[..SIDE_SIZE]);
    }

    Ok(Some(MatchParams {
        match_id,
        begin_at,
        player_ids,
    }))
}
