//! Per-match feature derivation
//!
//! `resolve` turns a match id into the ten participating player slots;
//! `extract` looks up each player's history as of the match start and folds
//! it into one `FeatureVector` per statistic.

pub mod extractor;
pub mod resolver;

pub use extractor::extract;
pub use resolver::resolve;
