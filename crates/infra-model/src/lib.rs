// PosturePal Infrastructure - Model Adapters
// Implements: ModelAdapter

pub mod artifact;
pub mod linear_adapter;

pub use artifact::{ModelArtifact, ModelKind, ModelMetadata, StandardScaler};
pub use linear_adapter::LinearModelAdapter;
