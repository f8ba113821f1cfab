//! Headline template adaptation

pub mod adapter;

pub use adapter::adapt;
