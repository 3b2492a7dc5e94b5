use std::collections::BTreeMap;

use grid_types::AttributeValue;
use shape_kernel::{ShapeHandle, ShapeKind};

use crate::types::FeatureId;

/// A registered shape together with its grid alignment state.
///
/// Owned by a [`FeatureStore`](crate::FeatureStore); callers only ever see it by
/// reference. Dropping the store without `clear` leaks the kernel shape.
#[derive(Debug)]
pub struct Feature {
    pub(crate) id: FeatureId,
    pub(crate) name: String,
    pub(crate) feature_type: String,
    pub(crate) kind: ShapeKind,
    pub(crate) shape: ShapeHandle,
    pub(crate) grid_aligned: bool,
    pub(crate) grid_deviation: f64,
    pub(crate) attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Unique object name, `"{type}_{8 hex}"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the feature was created as, e.g. "Box" or "Imported".
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// Topological kind of the current shape.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn shape(&self) -> &ShapeHandle {
        &self.shape
    }

    pub fn grid_aligned(&self) -> bool {
        self.grid_aligned
    }

    pub fn grid_deviation(&self) -> f64 {
        self.grid_deviation
    }

    /// Standard and user attributes, as mirrored onto the kernel object.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}
