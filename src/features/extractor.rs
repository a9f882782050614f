//! `MatchParams` → `MatchFeatures`

use crate::error::StoreError;
use crate::model::{FeatureVector, MatchFeatures, MatchParams};
use crate::store::MatchStore;
use std::collections::BTreeMap;

/// Build one feature vector per cumulative statistic.
///
/// Players are visited in slot order. A player without history contributes
/// nothing, so later players shift left and the tail is zero-padded. When no
/// player has history the mapping is empty.
pub fn extract(store: &dyn MatchStore, params: &MatchParams) -> Result<MatchFeatures, StoreError> {
    let mut values: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();

    for &player_id in params.player_ids.iter().filter(|id| **id != 0) {
        let Some(stats) = store.cumulative_before(player_id, params.begin_at)? else {
            continue;
        };

        for (name, value) in stats.named_values() {
            values.entry(name).or_default().push(value);
        }
    }

    let features = values
        .into_iter()
        .map(|(name, column)| (name.to_string(), FeatureVector::from_values(&column)))
        .collect();

    Ok(MatchFeatures {
        match_id: params.match_id,
        features,
    })
}
