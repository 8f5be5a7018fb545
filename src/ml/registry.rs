//! Model registry
//!
//! Loads every model type's artifact once at startup and serves read-only
//! lookups thereafter. A type whose artifact is missing or invalid is simply
//! absent: logged, never fatal, never partially present. The registry is
//! shared immutably behind `Arc`, so the read path needs no locks.

use std::collections::HashMap;
use std::path::Path;

use super::artifact::{ArtifactError, ModelArtifact};
use super::explain::{self, Explainer};
use super::model_type::ModelType;
use super::predictor::{self, Predictor};

/// One fully-constructed servable model.
pub struct ModelEntry {
    pub model_type: ModelType,
    pub feature_names: Vec<String>,
    pub predictor: Box<dyn Predictor>,
    pub explainer: Box<dyn Explainer>,
}

impl ModelEntry {
    fn from_artifact(artifact: ModelArtifact) -> Self {
        let feature_count = artifact.feature_count();
        let predictor = predictor::from_params(&artifact.model, feature_count);
        let explainer = explain::from_params(&artifact.model, &artifact.baseline, feature_count);
        Self {
            model_type: artifact.model_type,
            feature_names: artifact.feature_names,
            predictor,
            explainer,
        }
    }
}

#[derive(Default)]
pub struct ModelRegistry {
    entries: HashMap<ModelType, ModelEntry>,
}

impl ModelRegistry {
    /// Attempt every model type from `model_dir`. Load failures are isolated
    /// per type; the returned registry holds whatever succeeded.
    pub fn load(model_dir: &Path) -> Self {
        let mut entries = HashMap::new();
        for model_type in ModelType::ALL {
            let path = model_dir.join(model_type.artifact_file());
            match Self::load_entry(&path, model_type) {
                Ok(entry) => {
                    tracing::info!(
                        "Loaded model '{}' ({} features) from {}",
                        model_type,
                        entry.feature_names.len(),
                        path.display()
                    );
                    entries.insert(model_type, entry);
                }
                Err(err) => {
                    tracing::error!(
                        "Model '{}' failed to load from {}: {}",
                        model_type,
                        path.display(),
                        err
                    );
                }
            }
        }
        Self { entries }
    }

    fn load_entry(path: &Path, model_type: ModelType) -> Result<ModelEntry, ArtifactError> {
        let artifact = ModelArtifact::load(path, model_type)?;
        Ok(ModelEntry::from_artifact(artifact))
    }

    pub fn get(&self, model_type: ModelType) -> Option<&ModelEntry> {
        self.entries.get(&model_type)
    }

    /// Present types in fixed declaration order, for stable health output.
    pub fn loaded_types(&self) -> Vec<ModelType> {
        ModelType::ALL
            .into_iter()
            .filter(|t| self.entries.contains_key(t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
