use std::collections::BTreeMap;

use feature_store::{Feature, FeatureId};
use grid_policy::GridPolicy;
use grid_types::{AttributeValue, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::errors::SaveError;
use crate::metadata::ProjectMetadata;

/// Format identifier written to every snapshot.
pub const FORMAT_TAG: &str = "gridcad-snapshot";

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level snapshot structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    /// Grid policy in effect when the snapshot was taken.
    pub grid: GridPolicy,
    pub features: Vec<FeatureSnapshot>,
}

/// Persisted view of one feature. Geometry is kept as its vertex list only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub id: FeatureId,
    pub name: String,
    pub feature_type: String,
    pub kind: ShapeKind,
    pub vertices: Vec<[f64; 3]>,
    pub grid_aligned: bool,
    /// None when the deviation was not finite.
    pub grid_deviation: Option<f64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// JSON has no encoding for NaN or infinity.
fn is_finite_value(value: &AttributeValue) -> bool {
    match value {
        AttributeValue::Float(f) => f.is_finite(),
        AttributeValue::Vector(v) => v.iter().all(|c| c.is_finite()),
        _ => true,
    }
}

impl FeatureSnapshot {
    /// Capture a feature with the vertices read from its kernel shape.
    ///
    /// Float and vector attributes holding non-finite numbers are left out.
    pub fn capture(feature: &Feature, vertices: Vec<[f64; 3]>) -> Self {
        let attributes = feature
            .attributes()
            .iter()
            .filter(|(_, v)| is_finite_value(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let deviation = feature.grid_deviation();
        Self {
            id: feature.id(),
            name: feature.name().to_string(),
            feature_type: feature.feature_type().to_string(),
            kind: feature.kind(),
            vertices,
            grid_aligned: feature.grid_aligned(),
            grid_deviation: deviation.is_finite().then_some(deviation),
            attributes,
        }
    }
}

impl DocumentSnapshot {
    pub fn new(project: ProjectMetadata, grid: GridPolicy, features: Vec<FeatureSnapshot>) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            project,
            grid,
            features,
        }
    }
}

/// Serialize a snapshot to a pretty-printed JSON string.
pub fn save_snapshot(snapshot: &DocumentSnapshot) -> Result<String, SaveError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| SaveError::Serialize(e.to_string()))
}
