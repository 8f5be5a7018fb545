//! ML serving core: model types, artifacts, predictors, explainers, the
//! feature builder, the request-to-model selector and the startup-loaded
//! registry.

pub mod artifact;
pub mod explain;
pub mod features;
pub mod model_type;
pub mod predictor;
pub mod registry;
pub mod selector;

pub use artifact::{ArtifactError, ModelArtifact};
pub use explain::Explainer;
pub use features::build_features;
pub use model_type::ModelType;
pub use predictor::{ModelError, Predictor};
pub use registry::{ModelEntry, ModelRegistry};
pub use selector::select_model;
