//! Predictors
//!
//! The capability contract every registered model satisfies, plus the two
//! concrete families artifacts can describe: a linear model and a summed
//! tree ensemble. Both produce one output value per input row.

use ndarray::{Array1, Array2, ArrayView1};

use super::artifact::{ModelParams, Tree};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature matrix has {got} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("empty feature matrix")]
    EmptyInput,
}

impl ModelError {
    /// Stable error type name carried in 500 responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::ShapeMismatch { .. } => "ShapeMismatch",
            ModelError::EmptyInput => "EmptyInput",
        }
    }
}

// ============================================================================
// PREDICTOR CONTRACT
// ============================================================================

/// A trained model: fixed-width numeric input, one score per row.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError>;

    /// Number of feature columns the model was fit on.
    fn feature_count(&self) -> usize;
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
// LINEAR MODEL
// ============================================================================

#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: Array1<f32>,
    intercept: f32,
}

impl LinearModel {
    pub fn new(weights: Vec<f32>, intercept: f32) -> Self {
        Self {
            weights: Array1::from_vec(weights),
            intercept,
        }
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError> {
        check_shape(features, self.weights.len())?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| self.intercept + row.dot(&self.weights))
            .collect())
    }

    fn feature_count(&self) -> usize {
        self.weights.len()
    }
}

// ============================================================================
// TREE ENSEMBLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    base_score: f32,
    trees: Vec<Tree>,
    feature_count: usize,
}

impl TreeEnsemble {
    pub fn new(base_score: f32, trees: Vec<Tree>, feature_count: usize) -> Self {
        Self {
            base_score,
            trees,
            feature_count,
        }
    }
}

/// Walk a validated tree to its leaf. Split rule: `x[feature] < threshold`
/// goes left, ties go right. The explainer must apply the identical rule.
pub(crate) fn leaf_value(tree: &Tree, row: ArrayView1<f32>) -> f32 {
    let mut index = 0;
    loop {
        let node = &tree.nodes[index];
        if node.leaf {
            return node.value;
        }
        index = if row[node.feature] < node.threshold {
            node.left
        } else {
            node.right
        };
    }
}

impl Predictor for TreeEnsemble {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError> {
        check_shape(features, self.feature_count)?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| {
                self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| leaf_value(tree, row))
                        .sum::<f32>()
            })
            .collect())
    }

    fn feature_count(&self) -> usize {
        self.feature_count
    }
}

// ============================================================================
// CONSTRUCTION FROM ARTIFACT PARAMETERS
// ============================================================================

/// Build the concrete predictor an artifact describes.
pub fn from_params(params: &ModelParams, feature_count: usize) -> Box<dyn Predictor> {
    match params {
        ModelParams::Linear { weights, intercept } => {
            Box::new(LinearModel::new(weights.clone(), *intercept))
        }
        ModelParams::Tree { base_score, trees } => {
            Box::new(TreeEnsemble::new(*base_score, trees.clone(), feature_count))
        }
    }
}
