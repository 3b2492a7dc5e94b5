use std::collections::BTreeMap;

use grid_policy::{Alignment, GridPolicy};
use grid_types::{AttributeValue, ShapeDescription};
use shape_kernel::{KernelBundle, KernelError, ShapeHandle, ShapeIntrospect, ShapeKind};

use crate::feature::Feature;
use crate::types::*;

/// Owns every registered feature and the kernel shape behind it.
///
/// Kernel access is passed into each call, the store never holds on to it.
/// All mutating operations either complete or leave the store and kernel as they were.
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: BTreeMap<FeatureId, Feature>,
}

/// Kind and alignment of a live shape.
fn measure(
    introspect: &dyn ShapeIntrospect,
    handle: &ShapeHandle,
    policy: &GridPolicy,
) -> Result<(ShapeKind, Alignment), KernelError> {
    let kind = introspect.kind(handle)?;
    let vertices = introspect.vertices(handle)?;
    Ok((kind, policy.evaluate(&vertices)))
}

fn record_alignment(attributes: &mut BTreeMap<String, AttributeValue>, alignment: &Alignment) {
    attributes.insert(ATTR_GRID_ALIGNED.to_string(), alignment.aligned.into());
    attributes.insert(ATTR_GRID_DEVIATION.to_string(), alignment.deviation.into());
}

fn mirror(
    kb: &mut dyn KernelBundle,
    handle: &ShapeHandle,
    attributes: &BTreeMap<String, AttributeValue>,
) -> Result<(), KernelError> {
    for (name, value) in attributes {
        kb.attach_attribute(handle, name, value.clone())?;
    }
    Ok(())
}

fn alignment_attributes(alignment: &Alignment) -> BTreeMap<String, AttributeValue> {
    let mut attributes = BTreeMap::new();
    record_alignment(&mut attributes, alignment);
    attributes
}

/// Push the alignment values the feature currently records back onto its shape.
fn restore_alignment(kb: &mut dyn KernelBundle, feature: &Feature) {
    for name in [ATTR_GRID_ALIGNED, ATTR_GRID_DEVIATION] {
        if let Some(value) = feature.attributes.get(name) {
            // Best effort: the original error is what the caller sees.
            let _ = kb.attach_attribute(&feature.shape, name, value.clone());
        }
    }
}

/// Mirror a new alignment onto the feature's shape. On failure the shape is put back
/// to the values the feature still records.
fn push_alignment(
    kb: &mut dyn KernelBundle,
    feature: &Feature,
    alignment: &Alignment,
) -> Result<(), KernelError> {
    match mirror(kb, &feature.shape, &alignment_attributes(alignment)) {
        Ok(()) => Ok(()),
        Err(e) => {
            restore_alignment(kb, feature);
            Err(e)
        }
    }
}

fn commit_alignment(feature: &mut Feature, kind: ShapeKind, alignment: &Alignment) {
    feature.kind = kind;
    feature.grid_aligned = alignment.aligned;
    feature.grid_deviation = alignment.deviation;
    record_alignment(&mut feature.attributes, alignment);
}

/// Measure a fresh shape, then push the full attribute set onto it.
fn prepare(
    kb: &mut dyn KernelBundle,
    handle: &ShapeHandle,
    attributes: &mut BTreeMap<String, AttributeValue>,
    policy: &GridPolicy,
) -> Result<(ShapeKind, Alignment), KernelError> {
    let (kind, alignment) = measure(kb.as_introspect(), handle, policy)?;
    record_alignment(attributes, &alignment);
    mirror(kb, handle, attributes)?;
    Ok((kind, alignment))
}

fn invalid_reference(id: &FeatureId) -> StoreError {
    StoreError::InvalidFeatureReference { id: id.to_string() }
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&self) -> FeatureId {
        loop {
            let id = FeatureId::new_v4();
            if !self.features.contains_key(&id) {
                return id;
            }
        }
    }

    /// Build `description` in the kernel and register the result as a new feature.
    pub fn register(
        &mut self,
        kb: &mut dyn KernelBundle,
        description: &ShapeDescription,
        feature_type: &str,
        policy: &GridPolicy,
    ) -> Result<&Feature, StoreError> {
        let handle = kb.build_shape(description)?;
        self.adopt(kb, handle, feature_type, policy)
    }

    /// Register a shape the kernel has already created.
    ///
    /// The handle is consumed either way: on failure it is released back to the kernel
    /// and the store is unchanged.
    pub fn adopt(
        &mut self,
        kb: &mut dyn KernelBundle,
        handle: ShapeHandle,
        feature_type: &str,
        policy: &GridPolicy,
    ) -> Result<&Feature, StoreError> {
        let id = self.mint_id();
        let name = format!("{}_{}", feature_type, short_hex());

        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_NAME.to_string(), AttributeValue::from(name.as_str()));
        attributes.insert(ATTR_TYPE.to_string(), AttributeValue::from(feature_type));
        attributes.insert(ATTR_UNIQUE_ID.to_string(), AttributeValue::Text(id.to_string()));

        let (kind, alignment) = match prepare(kb, &handle, &mut attributes, policy) {
            Ok(prepared) => prepared,
            Err(e) => {
                kb.release(handle);
                return Err(e.into());
            }
        };

        let feature = Feature {
            id,
            name,
            feature_type: feature_type.to_string(),
            kind,
            shape: handle,
            grid_aligned: alignment.aligned,
            grid_deviation: alignment.deviation,
            attributes,
        };
        Ok(&*self.features.entry(id).or_insert(feature))
    }

    pub fn lookup(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Like [`lookup`](Self::lookup), but absence is an error.
    pub fn get(&self, id: &FeatureId) -> Result<&Feature, StoreError> {
        self.features.get(id).ok_or_else(|| invalid_reference(id))
    }

    /// Remove a feature and release its shape. Returns false if it was not present.
    pub fn remove(&mut self, kb: &mut dyn KernelBundle, id: &FeatureId) -> bool {
        match self.features.remove(id) {
            Some(feature) => {
                kb.release(feature.shape);
                true
            }
            None => false,
        }
    }

    /// Re-measure one feature against `policy`. On failure the feature and its shape
    /// keep their previous alignment.
    pub fn reevaluate(
        &mut self,
        kb: &mut dyn KernelBundle,
        id: &FeatureId,
        policy: &GridPolicy,
    ) -> Result<&Feature, StoreError> {
        let feature = self.features.get_mut(id).ok_or_else(|| invalid_reference(id))?;
        let (kind, alignment) = measure(kb.as_introspect(), &feature.shape, policy)?;
        push_alignment(kb, feature, &alignment)?;
        commit_alignment(feature, kind, &alignment);
        Ok(&*feature)
    }

    /// Re-measure every feature.
    ///
    /// All features are measured before any shape is touched. If mirroring fails
    /// partway, shapes already updated are restored and no feature changes.
    pub fn reevaluate_all(
        &mut self,
        kb: &mut dyn KernelBundle,
        policy: &GridPolicy,
    ) -> Result<(), StoreError> {
        let measured = self
            .features
            .values()
            .map(|f| -> Result<(FeatureId, ShapeKind, Alignment), KernelError> {
                let (kind, alignment) = measure(kb.as_introspect(), &f.shape, policy)?;
                Ok((f.id, kind, alignment))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (pushed, (id, _, alignment)) in measured.iter().enumerate() {
            if let Err(e) = push_alignment(kb, &self.features[id], alignment) {
                for (done, _, _) in &measured[..pushed] {
                    restore_alignment(kb, &self.features[done]);
                }
                return Err(e.into());
            }
        }

        for (id, kind, alignment) in &measured {
            if let Some(feature) = self.features.get_mut(id) {
                commit_alignment(feature, *kind, alignment);
            }
        }
        Ok(())
    }

    /// Swap a feature's geometry for a newly built shape.
    ///
    /// The old shape is released only once the new one has been measured and carries
    /// all attributes. On failure the feature keeps its old shape.
    pub fn replace_shape(
        &mut self,
        kb: &mut dyn KernelBundle,
        id: &FeatureId,
        description: &ShapeDescription,
        policy: &GridPolicy,
    ) -> Result<&Feature, StoreError> {
        let feature = self.features.get_mut(id).ok_or_else(|| invalid_reference(id))?;
        let handle = kb.build_shape(description)?;

        let mut attributes = feature.attributes.clone();
        let (kind, alignment) = match prepare(kb, &handle, &mut attributes, policy) {
            Ok(prepared) => prepared,
            Err(e) => {
                kb.release(handle);
                return Err(e.into());
            }
        };

        let old = std::mem::replace(&mut feature.shape, handle);
        kb.release(old);
        feature.attributes = attributes;
        commit_alignment(feature, kind, &alignment);
        Ok(&*feature)
    }

    /// Set a user attribute on the feature and its kernel object.
    pub fn set_attribute(
        &mut self,
        kb: &mut dyn KernelBundle,
        id: &FeatureId,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        if is_reserved_attribute(name) {
            return Err(StoreError::ReservedAttribute {
                name: name.to_string(),
            });
        }
        let feature = self.features.get_mut(id).ok_or_else(|| invalid_reference(id))?;
        kb.attach_attribute(&feature.shape, name, value.clone())?;
        feature.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove every feature, releasing all shapes.
    pub fn clear(&mut self, kb: &mut dyn KernelBundle) {
        for (_, feature) in std::mem::take(&mut self.features) {
            kb.release(feature.shape);
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }
}
