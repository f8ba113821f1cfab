//! Retrieval model
//!
//! A single architecture: exhaustive 1-nearest-neighbor over standardized,
//! weighted feature vectors. Exact and deterministic by construction.

pub mod knn;

pub use knn::{NearestNeighborIndex, Neighbor, TrainingExample, TrainingLabel};
