//! Headline generation
//!
//! Retrieve the archived game most similar to a target and rewrite its
//! headline for the target.

pub mod generator;

pub use generator::{build_index, GeneratedHeadline, HeadlineGenerator};
