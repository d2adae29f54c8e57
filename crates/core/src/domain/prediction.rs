// Prediction - classifier output for one Feature Vector

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classifier output returned to callers unchanged.
///
/// `confidence` is expected in [0, 1] but not enforced. `proba` maps class
/// label to probability; a BTreeMap keeps serialization order stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_id: u32,
    pub label: String,
    pub confidence: f64,
    pub proba: BTreeMap<String, f64>,
}
