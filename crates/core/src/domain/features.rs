// Feature Vector - the six posture measurements of one inference request

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names in their canonical order.
pub const FEATURE_NAMES: [&str; 6] = [
    "torso_angle",
    "neck_angle",
    "shoulder_tilt",
    "hip_tilt",
    "head_forward_z",
    "head_to_shoulder",
];

/// Mapping from feature name to value, as consumed by a `ModelAdapter`.
pub type FeatureMap = BTreeMap<String, f64>;

/// Posture geometry for one inference request.
///
/// Angles are in degrees; offsets are unitless. All six fields are required,
/// no range checks are applied here (bounds belong to the model).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub torso_angle: f64,
    pub neck_angle: f64,
    pub shoulder_tilt: f64,
    pub hip_tilt: f64,
    pub head_forward_z: f64,
    pub head_to_shoulder: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order
    pub fn values(&self) -> [f64; 6] {
        [
            self.torso_angle,
            self.neck_angle,
            self.shoulder_tilt,
            self.hip_tilt,
            self.head_forward_z,
            self.head_to_shoulder,
        ]
    }

    /// Convert to the name -> value mapping handed to the model adapter
    pub fn to_feature_map(&self) -> FeatureMap {
        FEATURE_NAMES
            .iter()
            .zip(self.values())
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
