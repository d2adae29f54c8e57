// Port Layer - Interfaces for external dependencies

pub mod model_adapter;

// Re-exports
pub use model_adapter::{mocks, AdapterError, ModelAdapter};
