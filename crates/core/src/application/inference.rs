// Inference Use Case

use crate::application::panic_guard::execute_guarded;
use crate::domain::{FeatureVector, Prediction};
use crate::error::Result;
use crate::port::ModelAdapter;
use std::sync::Arc;
use tracing::{debug, warn};

/// Inference Service
///
/// Holds the once-loaded model adapter behind an immutable shared handle.
/// Cloning is cheap and every clone talks to the same adapter.
#[derive(Clone)]
pub struct InferenceService {
    adapter: Arc<dyn ModelAdapter>,
}

impl InferenceService {
    pub fn new(adapter: Arc<dyn ModelAdapter>) -> Self {
        Self { adapter }
    }

    /// Classify one feature vector
    ///
    /// Adapter faults (errors and panics alike) come back as `AppError`;
    /// this never retries.
    pub async fn predict(&self, features: FeatureVector) -> Result<Prediction> {
        let feature_map = features.to_feature_map();
        let adapter = self.adapter.clone();

        let outcome = execute_guarded(async move { adapter.predict(&feature_map).await }).await?;

        match outcome {
            Ok(prediction) => {
                debug!(
                    class_id = prediction.class_id,
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "Prediction completed"
                );
                Ok(prediction)
            }
            Err(e) => {
                warn!(error = %e, "Model adapter rejected prediction");
                Err(e.into())
            }
        }
    }
}
