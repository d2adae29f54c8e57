// Model Adapter Port
// Abstraction over a pre-trained classifier loaded once at startup

use crate::domain::{FeatureMap, Prediction};
use async_trait::async_trait;
use thiserror::Error;

/// Model adapter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Invalid value for feature {name}: {value}")]
    InvalidFeature { name: String, value: f64 },

    #[error("Model error: {0}")]
    Model(String),
}

/// Model Adapter trait
///
/// Implementations hold immutable model parameters; `predict` must not
/// mutate shared state, so one instance serves concurrent requests.
///
/// Implementations:
/// - LinearModelAdapter: JSON softmax-linear artifact (infra-model crate)
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Classify one feature mapping
    ///
    /// # Errors
    /// - AdapterError::MissingFeature if a feature the model needs is absent
    /// - AdapterError::InvalidFeature if a value cannot be used (e.g. NaN)
    /// - AdapterError::Model for any internal model failure
    async fn predict(&self, features: &FeatureMap) -> Result<Prediction, AdapterError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// The prediction a well-behaved posture model gives for an upright sitter
    pub fn good_posture_prediction() -> Prediction {
        let mut proba = BTreeMap::new();
        proba.insert("good_posture".to_string(), 0.82);
        proba.insert("slouching".to_string(), 0.11);
        proba.insert("forward_head".to_string(), 0.07);

        Prediction {
            class_id: 0,
            label: "good_posture".to_string(),
            confidence: 0.82,
            proba,
        }
    }

    /// Mock adapter that always returns the same prediction
    pub struct FixedModelAdapter {
        prediction: Prediction,
        call_count: AtomicUsize,
    }

    impl FixedModelAdapter {
        pub fn new(prediction: Prediction) -> Self {
            Self {
                prediction,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn good_posture() -> Self {
            Self::new(good_posture_prediction())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelAdapter for FixedModelAdapter {
        async fn predict(&self, _features: &FeatureMap) -> Result<Prediction, AdapterError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.prediction.clone())
        }
    }

    /// Mock behavior for a failing adapter
    #[derive(Debug, Clone)]
    pub enum FailureMode {
        /// Return the given error
        Error(AdapterError),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock adapter that always fails
    pub struct FailingModelAdapter {
        mode: FailureMode,
        call_count: AtomicUsize,
    }

    impl FailingModelAdapter {
        pub fn new(mode: FailureMode) -> Self {
            Self {
                mode,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn new_error(message: impl Into<String>) -> Self {
            Self::new(FailureMode::Error(AdapterError::Model(message.into())))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(FailureMode::Panic(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelAdapter for FailingModelAdapter {
        async fn predict(&self, _features: &FeatureMap) -> Result<Prediction, AdapterError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match &self.mode {
                FailureMode::Error(e) => Err(e.clone()),
                FailureMode::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
