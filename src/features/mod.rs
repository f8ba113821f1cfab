//! Feature extraction
//!
//! Converts a game record into a named, weighted feature vector.

pub mod catalog;
pub mod game;

pub use catalog::{Feature, FeatureCatalog, FeatureVector};
pub use game::default_catalog;
