//! Model type enumeration
//!
//! The fixed set of analysis categories the service can serve. Each type is
//! backed by its own artifact, predictor and explainer.

use serde::{Deserialize, Serialize};

/// Analysis categories served by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Hotspot,
    Prediction,
    Anomaly,
    Network,
    Correlation,
    Multivariate,
}

impl ModelType {
    /// Every servable model type, in registry load order.
    pub const ALL: [ModelType; 6] = [
        ModelType::Hotspot,
        ModelType::Prediction,
        ModelType::Anomaly,
        ModelType::Network,
        ModelType::Correlation,
        ModelType::Multivariate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Hotspot => "hotspot",
            ModelType::Prediction => "prediction",
            ModelType::Anomaly => "anomaly",
            ModelType::Network => "network",
            ModelType::Correlation => "correlation",
            ModelType::Multivariate => "multivariate",
        }
    }

    /// Artifact file name for this type under the model directory.
    pub fn artifact_file(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelType {
    type Err = UnknownModelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotspot" => Ok(ModelType::Hotspot),
            "prediction" => Ok(ModelType::Prediction),
            "anomaly" => Ok(ModelType::Anomaly),
            "network" => Ok(ModelType::Network),
            "correlation" => Ok(ModelType::Correlation),
            "multivariate" => Ok(ModelType::Multivariate),
            other => Err(UnknownModelType(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown model type: {0}")]
pub struct UnknownModelType(pub String);
