// On-disk model artifact and metadata formats (JSON)

use posturepal_core::port::AdapterError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    SoftmaxLinear,
}

/// Per-feature standardization applied before the linear layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Trained model parameters
///
/// `coefficients` has one row per class and one column per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub kind: ModelKind,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

/// Feature order and class labels the artifact was trained with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub features: Vec<String>,
    pub labels: Vec<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, AdapterError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AdapterError::Load(format!("cannot read {} {}: {}", what, path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        AdapterError::Load(format!("cannot parse {} {}: {}", what, path.display(), e))
    })
}

impl ModelArtifact {
    pub fn from_path(path: &Path) -> Result<Self, AdapterError> {
        read_json(path, "model artifact")
    }
}

impl ModelMetadata {
    pub fn from_path(path: &Path) -> Result<Self, AdapterError> {
        read_json(path, "model metadata")
    }
}

/// Check that artifact and metadata describe the same model
pub fn validate(artifact: &ModelArtifact, meta: &ModelMetadata) -> Result<(), AdapterError> {
    let n_features = meta.features.len();
    let n_classes = meta.labels.len();

    if n_features == 0 {
        return Err(AdapterError::Load("metadata lists no features".to_string()));
    }
    if n_classes == 0 {
        return Err(AdapterError::Load("metadata lists no labels".to_string()));
    }
    if artifact.coefficients.len() != n_classes {
        return Err(AdapterError::Load(format!(
            "coefficient rows ({}) do not match label count ({})",
            artifact.coefficients.len(),
            n_classes
        )));
    }
    if artifact.intercepts.len() != n_classes {
        return Err(AdapterError::Load(format!(
            "intercepts ({}) do not match label count ({})",
            artifact.intercepts.len(),
            n_classes
        )));
    }
    for (i, row) in artifact.coefficients.iter().enumerate() {
        if row.len() != n_features {
            return Err(AdapterError::Load(format!(
                "coefficient row {} has {} columns, expected {}",
                i,
                row.len(),
                n_features
            )));
        }
    }

    if let Some(scaler) = &artifact.scaler {
        if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
            return Err(AdapterError::Load(format!(
                "scaler length (mean {}, scale {}) does not match feature count ({})",
                scaler.mean.len(),
                scaler.scale.len(),
                n_features
            )));
        }
        if scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(AdapterError::Load("scaler has a zero scale".to_string()));
        }
    }

    let has_non_finite = artifact
        .coefficients
        .iter()
        .flatten()
        .chain(artifact.intercepts.iter())
        .chain(
            artifact
                .scaler
                .iter()
                .flat_map(|s| s.mean.iter().chain(s.scale.iter())),
        )
        .any(|v| !v.is_finite());
    if has_non_finite {
        return Err(AdapterError::Load(
            "model parameters contain non-finite values".to_string(),
        ));
    }

    Ok(())
}
