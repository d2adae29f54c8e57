// Softmax-linear ModelAdapter backed by JSON artifact files
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use posturepal_core::domain::{FeatureMap, Prediction};
use posturepal_core::port::{AdapterError, ModelAdapter};

use crate::artifact::{self, ModelArtifact, ModelMetadata};

/// Multinomial linear classifier
///
/// Parameters are read once in `load` and never mutated afterwards, so a
/// single instance can sit behind an `Arc` and serve concurrent requests.
#[derive(Debug, Clone)]
pub struct LinearModelAdapter {
    artifact: ModelArtifact,
    meta: ModelMetadata,
}

impl LinearModelAdapter {
    /// Load model parameters and metadata from disk
    ///
    /// # Arguments
    /// * `model_path` - JSON model artifact (coefficients, intercepts, scaler)
    /// * `meta_path` - JSON metadata (feature order, class labels)
    ///
    /// # Errors
    /// - AdapterError::Load if a file is unreadable, unparsable, or the two
    ///   files disagree on shape
    pub fn load(
        model_path: impl AsRef<Path>,
        meta_path: impl AsRef<Path>,
    ) -> Result<Self, AdapterError> {
        let model_path = model_path.as_ref();
        let meta_path = meta_path.as_ref();

        let artifact = ModelArtifact::from_path(model_path)?;
        let meta = ModelMetadata::from_path(meta_path)?;
        let adapter = Self::from_parts(artifact, meta)?;

        info!(
            model_path = %model_path.display(),
            meta_path = %meta_path.display(),
            features = adapter.meta.features.len(),
            labels = ?adapter.meta.labels,
            "Model loaded"
        );

        Ok(adapter)
    }

    /// Build from already-parsed parts
    pub fn from_parts(artifact: ModelArtifact, meta: ModelMetadata) -> Result<Self, AdapterError> {
        artifact::validate(&artifact, &meta)?;
        Ok(Self { artifact, meta })
    }

    pub fn labels(&self) -> &[String] {
        &self.meta.labels
    }

    pub fn features(&self) -> &[String] {
        &self.meta.features
    }

    /// Gather inputs in training order, then standardize
    fn input_vector(&self, features: &FeatureMap) -> Result<Vec<f64>, AdapterError> {
        let mut x = Vec::with_capacity(self.meta.features.len());

        for name in &self.meta.features {
            let value = *features
                .get(name)
                .ok_or_else(|| AdapterError::MissingFeature(name.clone()))?;
            if !value.is_finite() {
                return Err(AdapterError::InvalidFeature {
                    name: name.clone(),
                    value,
                });
            }
            x.push(value);
        }

        if let Some(scaler) = &self.artifact.scaler {
            for ((v, mean), scale) in x.iter_mut().zip(&scaler.mean).zip(&scaler.scale) {
                *v = (*v - mean) / scale;
            }
        }

        Ok(x)
    }

    fn classify(&self, features: &FeatureMap) -> Result<Prediction, AdapterError> {
        let x = self.input_vector(features)?;

        let logits: Vec<f64> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, b)| row.iter().zip(&x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect();

        let probs = softmax(&logits)?;

        // Ties resolve to the lowest class index
        let (class_idx, confidence) = probs.iter().copied().enumerate().fold(
            (0, f64::NEG_INFINITY),
            |best, (i, p)| if p > best.1 { (i, p) } else { best },
        );

        let proba: BTreeMap<String, f64> = self
            .meta
            .labels
            .iter()
            .cloned()
            .zip(probs.iter().copied())
            .collect();

        Ok(Prediction {
            class_id: class_idx as u32,
            label: self.meta.labels[class_idx].clone(),
            confidence,
            proba,
        })
    }
}

/// Numerically stable softmax (max-subtracted)
fn softmax(logits: &[f64]) -> Result<Vec<f64>, AdapterError> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(AdapterError::Model(format!(
            "logits are not finite: {:?}",
            logits
        )));
    }

    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();

    Ok(exps.into_iter().map(|e| e / total).collect())
}

#[async_trait]
impl ModelAdapter for LinearModelAdapter {
    async fn predict(&self, features: &FeatureMap) -> Result<Prediction, AdapterError> {
        self.classify(features)
    }
}
