//! Data model: raw match documents, flattened rows, feature vectors and the
//! label enumerations shared between them.

pub mod features;
pub mod flat;
pub mod labels;
pub mod raw;

pub use features::{CumulativeStats, FeatureVector, MatchFeatures, MatchParams, SIDE_SIZE};
pub use flat::FlatRow;
pub use labels::{RoundOutcome, Tier};
pub use raw::{PlayerStatistic, RawMatch, Round};
