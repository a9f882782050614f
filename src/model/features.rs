//! Feature vectors and the per-match inputs they are computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Players per side; a feature vector holds two sides.
pub const SIDE_SIZE: usize = 5;

/// Resolved inputs for one match: start time plus ten player slots
/// (side A in `0..5`, side B in `5..10`). Unfilled slots are 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    pub match_id: i64,
    pub begin_at: DateTime<Utc>,
    pub player_ids: [i64; 2 * SIDE_SIZE],
}

/// A player's running totals and averages as of some point in time.
///
/// Column order matches the `player_cumulative` view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeStats {
    pub kills_total: f64,
    pub deaths_total: f64,
    pub assists_total: f64,
    pub headshots_total: f64,
    pub flash_assists_total: f64,

    pub kills_per_round: f64,
    pub deaths_per_round: f64,
    pub assists_per_round: f64,
    pub headshots_per_round: f64,
    pub flash_assists_per_round: f64,

    pub kills_per_game: f64,
    pub deaths_per_game: f64,
    pub assists_per_game: f64,
    pub headshots_per_game: f64,
    pub flash_assists_per_game: f64,
    pub first_kills_diff_per_game: f64,
    pub kd_diff_per_game: f64,
    pub adr_per_game: f64,
    pub kast_per_game: f64,
    pub rating_per_game: f64,
}

impl CumulativeStats {
    /// `(statistic name, value)` for every field, in view column order.
    pub fn named_values(&self) -> [(&'static str, f64); 20] {
        [
            ("kills_total", self.kills_total),
            ("deaths_total", self.deaths_total),
            ("assists_total", self.assists_total),
            ("headshots_total", self.headshots_total),
            ("flash_assists_total", self.flash_assists_total),
            ("kills_per_round", self.kills_per_round),
            ("deaths_per_round", self.deaths_per_round),
            ("assists_per_round", self.assists_per_round),
            ("headshots_per_round", self.headshots_per_round),
            ("flash_assists_per_round", self.flash_assists_per_round),
            ("kills_per_game", self.kills_per_game),
            ("deaths_per_game", self.deaths_per_game),
            ("assists_per_game", self.assists_per_game),
            ("headshots_per_game", self.headshots_per_game),
            ("flash_assists_per_game", self.flash_assists_per_game),
            ("first_kills_diff_per_game", self.first_kills_diff_per_game),
            ("kd_diff_per_game", self.kd_diff_per_game),
            ("adr_per_game", self.adr_per_game),
            ("kast_per_game", self.kast_per_game),
            ("rating_per_game", self.rating_per_game),
        ]
    }
}

/// Order statistics of one statistic across the ten players of a match.
///
/// Sorting each side independently makes the vector blind to the order in
/// which players were listed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// First five values, ascending
    pub first: [f64; SIDE_SIZE],
    /// Last five values, ascending
    pub second: [f64; SIDE_SIZE],
    pub first_mean: f64,
    pub second_mean: f64,
    /// `diffs[i][j] = first[i] - second[j]`
    pub diffs: [[f64; SIDE_SIZE]; SIDE_SIZE],
}

impl FeatureVector {
    /// Build from up to ten values; missing slots are zero, extras ignored.
    pub fn from_values(values: &[f64]) -> Self {
        let mut padded = [0.0; 2 * SIDE_SIZE];
        for (slot, value) in padded.iter_mut().zip(values) {
            *slot = *value;
        }

        let mut first = [0.0; SIDE_SIZE];
        let mut second = [0.0; SIDE_SIZE];
        first.copy_from_slice(&padded[..SIDE_SIZE]);
        second.copy_from_slice(&padded[SIDE_SIZE..]);
        first.sort_by(f64::total_cmp);
        second.sort_by(f64::total_cmp);

        let mut diffs = [[0.0; SIDE_SIZE]; SIDE_SIZE];
        for (i, row) in diffs.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = first[i] - second[j];
            }
        }

        Self {
            first,
            second,
            first_mean: first.iter().sum::<f64>() / SIDE_SIZE as f64,
            second_mean: second.iter().sum::<f64>() / SIDE_SIZE as f64,
            diffs,
        }
    }
}

/// Everything written for one match: statistic name → feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchFeatures {
    pub match_id: i64,
    pub features: BTreeMap<String, FeatureVector>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_statistics() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0, 10.0, 8.0, 6.0, 9.0, 7.0];
        let vector = FeatureVector::from_values(&values);

        assert_eq!(vector.first, [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(vector.second, [6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(vector.first_mean, 3.0);
        assert_eq!(vector.second_mean, 8.0);
        assert_eq!(vector.diffs[0][0], -5.0);
        assert_eq!(vector.diffs[4][0], -1.0);
        assert_eq!(vector.diffs[0][4], -9.0);
    }

    #[test]
    fn test_player_order_does_not_matter() {
        let a = FeatureVector::from_values(&[5.0, 1.0, 3.0, 2.0, 4.0, 10.0, 8.0, 6.0, 9.0, 7.0]);
        let b = FeatureVector::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_partial_values_are_zero_padded() {
        let vector = FeatureVector::from_values(&[3.0, 1.0, 2.0]);

        assert_eq!(vector.first, [0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(vector.second, [0.0; SIDE_SIZE]);
        assert!((vector.first_mean - 1.2).abs() < 1e-12);
        assert_eq!(vector.second_mean, 0.0);
    }

    #[test]
    fn test_named_values_cover_every_column() {
        let stats = CumulativeStats {
            kills_total: 1.0,
            rating_per_game: 2.0,
            ..Default::default()
        };
        let named = stats.named_values();

        assert_eq!(named[0], ("kills_total", 1.0));
        assert_eq!(named[19], ("rating_per_game", 2.0));
    }
}
