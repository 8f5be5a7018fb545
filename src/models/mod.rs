pub mod prediction;

pub use prediction::{Explanations, PredictionBody, PredictionResponse};
