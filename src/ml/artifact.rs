//! Model artifacts
//!
//! On-disk form of a registry entry: one JSON file per model type carrying
//! the feature layout, background baseline and trained parameters. Artifacts
//! are validated fully at load time so the serving path never has to defend
//! against malformed parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model_type::ModelType;

/// Current artifact schema version. Bump when the layout changes.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// SCHEMA
// ============================================================================

/// Trained model parameters plus the feature layout they were fit on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub model_type: ModelType,
    /// Feature names in the exact column order the parameters expect.
    pub feature_names: Vec<String>,
    /// Per-feature background means, used as the explanation baseline.
    pub baseline: Vec<f32>,
    pub model: ModelParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ModelParams {
    Linear { weights: Vec<f32>, intercept: f32 },
    Tree { base_score: f32, trees: Vec<Tree> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Index-linked tree node. Every node carries `value`: for leaves the model
/// output, for internal nodes the expected output under that subtree (used
/// by the path-attribution explainer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    pub value: f32,
    #[serde(default)]
    pub leaf: bool,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported schema version {found}, expected {ARTIFACT_SCHEMA_VERSION}")]
    SchemaVersion { found: u32 },

    #[error("artifact declares model type '{found}', expected '{expected}'")]
    TypeMismatch { expected: ModelType, found: ModelType },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

// ============================================================================
// LOADING & VALIDATION
// ============================================================================

impl ModelArtifact {
    /// Read and fully validate the artifact for `expected` from `path`.
    pub fn load(path: &Path, expected: ModelType) -> Result<Self, ArtifactError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: display.clone(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
                path: display,
                source,
            })?;

        if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(ArtifactError::SchemaVersion {
                found: artifact.schema_version,
            });
        }
        if artifact.model_type != expected {
            return Err(ArtifactError::TypeMismatch {
                expected,
                found: artifact.model_type,
            });
        }
        artifact.validate()?;
        Ok(artifact)
    }

    /// Structural validation: layout lengths, index bounds, finite parameters.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::Invalid("empty feature list".into()));
        }
        for (i, name) in self.feature_names.iter().enumerate() {
            if self.feature_names[..i].contains(name) {
                return Err(ArtifactError::Invalid(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }
        if self.baseline.len() != n {
            return Err(ArtifactError::Invalid(format!(
                "baseline length {} does not match {} feature names",
                self.baseline.len(),
                n
            )));
        }
        if self.baseline.iter().any(|v| !v.is_finite()) {
            return Err(ArtifactError::Invalid("non-finite baseline value".into()));
        }

        match &self.model {
            ModelParams::Linear { weights, intercept } => {
                if weights.len() != n {
                    return Err(ArtifactError::Invalid(format!(
                        "weight length {} does not match {} feature names",
                        weights.len(),
                        n
                    )));
                }
                if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
                    return Err(ArtifactError::Invalid(
                        "non-finite linear parameter".into(),
                    ));
                }
            }
            ModelParams::Tree { base_score, trees } => {
                if !base_score.is_finite() {
                    return Err(ArtifactError::Invalid("non-finite base score".into()));
                }
                if trees.is_empty() {
                    return Err(ArtifactError::Invalid("tree model with no trees".into()));
                }
                for (t, tree) in trees.iter().enumerate() {
                    validate_tree(t, tree, n)?;
                }
            }
        }
        Ok(())
    }

    /// Convenience for the predict path.
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }
}

fn validate_tree(index: usize, tree: &Tree, feature_count: usize) -> Result<(), ArtifactError> {
    if tree.nodes.is_empty() {
        return Err(ArtifactError::Invalid(format!("tree {index} has no nodes")));
    }
    for (i, node) in tree.nodes.iter().enumerate() {
        if !node.value.is_finite() {
            return Err(ArtifactError::Invalid(format!(
                "tree {index} node {i} has non-finite value"
            )));
        }
        if node.leaf {
            continue;
        }
        if node.feature >= feature_count {
            return Err(ArtifactError::Invalid(format!(
                "tree {index} node {i} splits on feature {} but only {feature_count} exist",
                node.feature
            )));
        }
        if !node.threshold.is_finite() {
            return Err(ArtifactError::Invalid(format!(
                "tree {index} node {i} has non-finite threshold"
            )));
        }
        // Children must point forward; guarantees every walk terminates.
        if node.left <= i || node.right <= i {
            return Err(ArtifactError::Invalid(format!(
                "tree {index} node {i} has non-forward child link"
            )));
        }
        if node.left >= tree.nodes.len() || node.right >= tree.nodes.len() {
            return Err(ArtifactError::Invalid(format!(
                "tree {index} node {i} child index out of range"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_artifact() -> ModelArtifact {
        ModelArtifact {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            model_type: ModelType::Anomaly,
            feature_names: vec!["a".into(), "b".into()],
            baseline: vec![0.5, 1.5],
            model: ModelParams::Linear {
                weights: vec![1.0, -2.0],
                intercept: 0.25,
            },
        }
    }

    #[test]
    fn valid_linear_artifact_passes() {
        assert!(linear_artifact().validate().is_ok());
    }

    #[test]
    fn rejects_baseline_length_mismatch() {
        let mut artifact = linear_artifact();
        artifact.baseline = vec![0.5];
        assert!(matches!(
            artifact.validate(),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_weight_length_mismatch() {
        let mut artifact = linear_artifact();
        artifact.model = ModelParams::Linear {
            weights: vec![1.0],
            intercept: 0.0,
        };
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_weight() {
        let mut artifact = linear_artifact();
        artifact.model = ModelParams::Linear {
            weights: vec![f32::NAN, 1.0],
            intercept: 0.0,
        };
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_feature_names() {
        let mut artifact = linear_artifact();
        artifact.feature_names = vec!["a".into(), "a".into()];
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn rejects_backward_child_link() {
        let artifact = ModelArtifact {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            model_type: ModelType::Hotspot,
            feature_names: vec!["a".into()],
            baseline: vec![0.0],
            model: ModelParams::Tree {
                base_score: 0.0,
                trees: vec![Tree {
                    nodes: vec![TreeNode {
                        feature: 0,
                        threshold: 1.0,
                        left: 0, // points back at itself
                        right: 0,
                        value: 0.0,
                        leaf: false,
                    }],
                }],
            },
        };
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn rejects_split_on_missing_feature() {
        let artifact = ModelArtifact {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            model_type: ModelType::Hotspot,
            feature_names: vec!["a".into()],
            baseline: vec![0.0],
            model: ModelParams::Tree {
                base_score: 0.0,
                trees: vec![Tree {
                    nodes: vec![
                        TreeNode {
                            feature: 3,
                            threshold: 1.0,
                            left: 1,
                            right: 2,
                            value: 0.0,
                            leaf: false,
                        },
                        TreeNode {
                            value: 0.1,
                            leaf: true,
                            ..leaf_defaults()
                        },
                        TreeNode {
                            value: 0.2,
                            leaf: true,
                            ..leaf_defaults()
                        },
                    ],
                }],
            },
        };
        assert!(artifact.validate().is_err());
    }

    fn leaf_defaults() -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: 0.0,
            leaf: true,
        }
    }
}
