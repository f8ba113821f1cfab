//! 1-nearest-neighbor index over weighted, standardized feature vectors
//!
//! Dimensions are ordered lexicographically by feature name so that the
//! per-dimension weights line up with the vector layout. Values are
//! standardized to zero mean and unit variance using statistics fitted from
//! the training examples; retrieval is an exhaustive scan, which is exact
//! and cheap at corpus sizes of a few hundred to a few thousand games.

use crate::features::{FeatureCatalog, FeatureVector};
use crate::{GameId, HeadlinerError, Result};

/// Label carried by each training example
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingLabel {
    pub game_id: GameId,
    pub headline: String,
}

/// One fitted data point: a feature vector plus its label
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub vector: FeatureVector,
    pub label: TrainingLabel,
}

/// Result of a nearest-neighbor query
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub label: TrainingLabel,
    pub distance: f64,
}

/// Exhaustive 1-NN index with weighted Minkowski distance
pub struct NearestNeighborIndex {
    power: f64,
    state: Option<Fitted>,
}

struct Fitted {
    /// Dimension names in lexicographic order
    names: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
    weights: Vec<f64>,
    /// Standardized vectors in insertion order, ties resolve to the earliest
    examples: Vec<(Vec<f64>, TrainingLabel)>,
}

impl Default for NearestNeighborIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl NearestNeighborIndex {
    /// Index with the standard exponent (p = 2, weighted Euclidean-like)
    pub fn new() -> Self {
        Self::with_power(2.0)
    }

    pub fn with_power(power: f64) -> Self {
        NearestNeighborIndex { power, state: None }
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Number of fitted training examples
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.examples.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fit standardization statistics and store the training examples
    ///
    /// Every example must share one dimension set, and every dimension must
    /// have a weight registered in the catalog. Needs at least two examples
    /// for meaningful variance; a zero-variance dimension standardizes with
    /// std 1 instead of dividing by zero.
    pub fn fit(&mut self, catalog: &FeatureCatalog, examples: Vec<TrainingExample>) -> Result<()> {
        if examples.len() < 2 {
            return Err(HeadlinerError::InsufficientData {
                required: 2,
                available: examples.len(),
            });
        }

        let names: Vec<String> = examples[0].vector.keys().cloned().collect();
        for example in &examples[1..] {
            if !same_dimensions(&names, &example.vector) {
                return Err(HeadlinerError::DimensionMismatch(format!(
                    "training example for game {} does not match the dimension set of the first example",
                    example.label.game_id
                )));
            }
        }

        let weights = names
            .iter()
            .map(|name| {
                catalog.weight_of(name).ok_or_else(|| {
                    HeadlinerError::DimensionMismatch(format!(
                        "no weight registered for dimension '{}'",
                        name
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let count = examples.len() as f64;
        let mut means = vec![0.0; names.len()];
        for example in &examples {
            for (i, name) in names.iter().enumerate() {
                means[i] += example.vector[name];
            }
        }
        for mean in &mut means {
            *mean /= count;
        }

        let mut stds = vec![0.0; names.len()];
        for example in &examples {
            for (i, name) in names.iter().enumerate() {
                let diff = example.vector[name] - means[i];
                stds[i] += diff * diff;
            }
        }
        for std in &mut stds {
            let variance = *std / count;
            *std = if variance == 0.0 { 1.0 } else { variance.sqrt() };
        }

        let standardized = examples
            .into_iter()
            .map(|example| {
                let vector = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (example.vector[name] - means[i]) / stds[i])
                    .collect();
                (vector, example.label)
            })
            .collect();

        self.state = Some(Fitted {
            names,
            means,
            stds,
            weights,
            examples: standardized,
        });
        Ok(())
    }

    /// Find the nearest training example to a query vector
    ///
    /// The query is standardized with the fitted statistics before the scan.
    /// Identical inputs always return the identical neighbor.
    pub fn query(&self, vector: &FeatureVector) -> Result<Neighbor> {
        let fitted = self.state.as_ref().ok_or(HeadlinerError::NotFitted)?;

        if !same_dimensions(&fitted.names, vector) {
            return Err(HeadlinerError::DimensionMismatch(format!(
                "query has dimensions [{}] but the index was fitted with [{}]",
                join_names(vector.keys()),
                fitted.names.join(", ")
            )));
        }

        let query: Vec<f64> = fitted
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| (vector[name] - fitted.means[i]) / fitted.stds[i])
            .collect();

        let mut best: Option<Neighbor> = None;
        for (example, label) in &fitted.examples {
            let distance = weighted_minkowski(&query, example, &fitted.weights, self.power);
            let closer = match &best {
                Some(current) => distance < current.distance,
                None => true,
            };
            if closer {
                best = Some(Neighbor {
                    label: label.clone(),
                    distance,
                });
            }
        }

        // fit guarantees at least two examples
        best.ok_or(HeadlinerError::NotFitted)
    }
}

/// distance = (sum_i w_i * |x_i - y_i|^p)^(1/p)
fn weighted_minkowski(x: &[f64], y: &[f64], weights: &[f64], power: f64) -> f64 {
    let sum: f64 = x
        .iter()
        .zip(y)
        .zip(weights)
        .map(|((a, b), w)| w * (a - b).abs().powf(power))
        .sum();
    sum.powf(1.0 / power)
}

fn same_dimensions(names: &[String], vector: &FeatureVector) -> bool {
    names.len() == vector.len() && names.iter().zip(vector.keys()).all(|(a, b)| a == b)
}

fn join_names<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}
