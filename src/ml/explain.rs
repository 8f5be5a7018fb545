//! Explainers
//!
//! Per-feature attribution for each model family, satisfying the additivity
//! contract: expected_value + sum(attributions) equals the model output for
//! the same row. Linear models get exact interventional SHAP values against
//! the artifact baseline; tree ensembles get path attribution over node
//! expected values.

use ndarray::{Array1, Array2, ArrayView1};

use super::artifact::{ModelParams, Tree};
use super::predictor::ModelError;

/// Attribution contract paired with a [`super::predictor::Predictor`].
pub trait Explainer: Send + Sync {
    /// One attribution vector per input row, one entry per feature column.
    fn shap_values(&self, features: &Array2<f32>) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Model output over the background baseline; the base the attributions
    /// are measured against.
    fn expected_value(&self) -> f32;
}

fn check_shape(features: &Array2<f32>, expected: usize) -> Result<(), ModelError> {
    if features.nrows() == 0 {
        return Err(ModelError::EmptyInput);
    }
    if features.ncols() != expected {
        return Err(ModelError::ShapeMismatch {
            expected,
            got: features.ncols(),
        });
    }
    Ok(())
}

// ============================================================================
// LINEAR
// ============================================================================

#[derive(Debug, Clone)]
pub struct LinearExplainer {
    weights: Array1<f32>,
    baseline: Array1<f32>,
    expected: f32,
}

impl LinearExplainer {
    pub fn new(weights: Vec<f32>, intercept: f32, baseline: Vec<f32>) -> Self {
        let weights = Array1::from_vec(weights);
        let baseline = Array1::from_vec(baseline);
        let expected = intercept + weights.dot(&baseline);
        Self {
            weights,
            baseline,
            expected,
        }
    }
}

impl Explainer for LinearExplainer {
    fn shap_values(&self, features: &Array2<f32>) -> Result<Vec<Vec<f32>>, ModelError> {
        check_shape(features, self.weights.len())?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                self.weights
                    .iter()
                    .zip(row.iter())
                    .zip(self.baseline.iter())
                    .map(|((w, x), b)| w * (x - b))
                    .collect()
            })
            .collect())
    }

    fn expected_value(&self) -> f32 {
        self.expected
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TreeExplainer {
    trees: Vec<Tree>,
    feature_count: usize,
    expected: f32,
}

impl TreeExplainer {
    pub fn new(base_score: f32, trees: Vec<Tree>, feature_count: usize) -> Self {
        // Root values are the per-tree expected outputs.
        let expected = base_score + trees.iter().map(|t| t.nodes[0].value).sum::<f32>();
        Self {
            trees,
            feature_count,
            expected,
        }
    }

    /// Attribute one tree's decision path. Each step charges the change in
    /// expected value to the feature the node split on. Split rule matches
    /// the predictor: `x[feature] < threshold` goes left, ties go right.
    fn attribute_tree(tree: &Tree, row: ArrayView1<f32>, contributions: &mut [f32]) {
        let mut index = 0;
        loop {
            let node = &tree.nodes[index];
            if node.leaf {
                return;
            }
            let next = if row[node.feature] < node.threshold {
                node.left
            } else {
                node.right
            };
            contributions[node.feature] += tree.nodes[next].value - node.value;
            index = next;
        }
    }
}

impl Explainer for TreeExplainer {
    fn shap_values(&self, features: &Array2<f32>) -> Result<Vec<Vec<f32>>, ModelError> {
        check_shape(features, self.feature_count)?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                let mut contributions = vec![0.0f32; self.feature_count];
                for tree in &self.trees {
                    Self::attribute_tree(tree, row, &mut contributions);
                }
                contributions
            })
            .collect())
    }

    fn expected_value(&self) -> f32 {
        self.expected
    }
}

// ============================================================================
// CONSTRUCTION FROM ARTIFACT PARAMETERS
// ============================================================================

/// Build the explainer paired with an artifact's predictor.
pub fn from_params(
    params: &ModelParams,
    baseline: &[f32],
    feature_count: usize,
) -> Box<dyn Explainer> {
    match params {
        ModelParams::Linear { weights, intercept } => Box::new(LinearExplainer::new(
            weights.clone(),
            *intercept,
            baseline.to_vec(),
        )),
        ModelParams::Tree { base_score, trees } => Box::new(TreeExplainer::new(
            *base_score,
            trees.clone(),
            feature_count,
        )),
    }
}
