//! Named, weighted feature catalog
//!
//! Features are registered explicitly at startup; the catalog turns a game
//! record into a name-keyed vector. Downstream consumers align weights with
//! dimensions by sorting names lexicographically, so the map type here is
//! ordered.

use crate::{GameRecord, HeadlinerError, Result};
use std::collections::BTreeMap;

/// Feature vector keyed by feature name, iterated in lexicographic order
pub type FeatureVector = BTreeMap<String, f64>;

/// Scalar projection of a game record
///
/// Fails with a message when the record lacks the data the feature needs;
/// the catalog attaches the feature name on the way out.
pub type ValueFn = fn(&GameRecord) -> std::result::Result<f64, String>;

/// A named, weighted scalar function over a game record
pub struct Feature {
    pub name: String,
    pub weight: f64,
    value_fn: ValueFn,
}

/// Registration-ordered set of features
#[derive(Default)]
pub struct FeatureCatalog {
    features: Vec<Feature>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        FeatureCatalog {
            features: Vec::new(),
        }
    }

    /// Register a feature under a unique name
    pub fn register(&mut self, name: &str, weight: f64, value_fn: ValueFn) -> Result<()> {
        if self.features.iter().any(|f| f.name == name) {
            return Err(HeadlinerError::DuplicateFeature(name.to_string()));
        }
        self.features.push(Feature {
            name: name.to_string(),
            weight,
            value_fn,
        });
        Ok(())
    }

    /// Evaluate every registered feature against a game record
    ///
    /// Each feature is evaluated in isolation; the first failure is reported
    /// as a feature-evaluation error naming the feature, never swallowed.
    pub fn vectorize(&self, game: &GameRecord) -> Result<FeatureVector> {
        let mut vector = FeatureVector::new();
        for feature in &self.features {
            let value = (feature.value_fn)(game).map_err(|message| {
                HeadlinerError::FeatureEvaluation {
                    feature: feature.name.clone(),
                    message,
                }
            })?;
            vector.insert(feature.name.clone(), value);
        }
        Ok(vector)
    }

    /// Weight registered for a feature name
    pub fn weight_of(&self, name: &str) -> Option<f64> {
        self.features.iter().find(|f| f.name == name).map(|f| f.weight)
    }

    /// All feature names in lexicographic order
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.features.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
