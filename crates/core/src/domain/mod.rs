// Domain Layer - Inference request and result entities

pub mod features;
pub mod prediction;

// Re-exports
pub use features::{FeatureMap, FeatureVector, FEATURE_NAMES};
pub use prediction::Prediction;
