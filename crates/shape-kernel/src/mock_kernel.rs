//! Deterministic test double implementing ShapeKernel + ShapeIntrospect.
//!
//! Produces synthetic shapes with predictable vertex lists and centroids.
//! Used by feature-store and model-session for unit testing.

use std::collections::{BTreeMap, HashMap};

use crate::params::{positive_param, PrimitiveKind};
use crate::traits::{ShapeIntrospect, ShapeKernel};
use crate::types::*;

/// A synthetic shape with known geometry.
#[derive(Debug, Clone)]
struct MockShape {
    kind: ShapeKind,
    vertices: Vec<[f64; 3]>,
    centroid: Option<[f64; 3]>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl MockShape {
    fn new(kind: ShapeKind, vertices: Vec<[f64; 3]>, centroid: Option<[f64; 3]>) -> Self {
        Self {
            kind,
            vertices,
            centroid,
            attributes: BTreeMap::new(),
        }
    }
}

/// Deterministic test double for the geometry kernel.
/// Implements both ShapeKernel and ShapeIntrospect.
pub struct MockKernel {
    next_handle: u64,
    shapes: HashMap<u64, MockShape>,
    recompute_count: usize,
    /// When set, every `attach_attribute` call fails.
    reject_attributes: bool,
    /// `attach_attribute` calls for this one name fail.
    reject_attribute_named: Option<String>,
    /// When set, `recompute` fails.
    fail_recompute: bool,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            shapes: HashMap::new(),
            recompute_count: 0,
            reject_attributes: false,
            reject_attribute_named: None,
            fail_recompute: false,
        }
    }

    fn alloc_handle(&mut self) -> ShapeHandle {
        let h = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, shape: MockShape) -> ShapeHandle {
        let handle = self.alloc_handle();
        self.shapes.insert(handle.id(), shape);
        handle
    }

    fn get(&self, handle: &ShapeHandle) -> Result<&MockShape, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound {
                handle: handle.id(),
            })
    }

    /// Insert an arbitrary shape. Lets tests produce kinds the builders never do
    /// (wires, shells, solids with chosen centroids).
    pub fn insert_raw(
        &mut self,
        kind: ShapeKind,
        vertices: Vec<[f64; 3]>,
        centroid: Option<[f64; 3]>,
    ) -> ShapeHandle {
        self.store(MockShape::new(kind, vertices, centroid))
    }

    /// Make every subsequent `attach_attribute` call fail (or succeed again).
    pub fn set_reject_attributes(&mut self, reject: bool) {
        self.reject_attributes = reject;
    }

    /// Make `attach_attribute` fail only for `name`. `None` lifts the restriction.
    pub fn set_reject_attribute_named(&mut self, name: Option<&str>) {
        self.reject_attribute_named = name.map(str::to_string);
    }

    /// Make every subsequent `recompute` call fail (or succeed again).
    pub fn set_fail_recompute(&mut self, fail: bool) {
        self.fail_recompute = fail;
    }

    /// Number of shapes currently held by the kernel.
    pub fn live_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Number of completed `recompute` calls.
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    /// Box with 8 vertices, origin at (0,0,0), extending to (w,h,d).
    fn make_box_shape(w: f64, h: f64, d: f64) -> MockShape {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [w, 0.0, 0.0],
            [w, h, 0.0],
            [0.0, h, 0.0],
            [0.0, 0.0, d],
            [w, 0.0, d],
            [w, h, d],
            [0.0, h, d],
        ];
        MockShape::new(ShapeKind::Solid, positions, Some([w / 2.0, h / 2.0, d / 2.0]))
    }

    /// Cylinder along +Z with its base centered at the origin.
    /// Vertices match the seam vertices of a swept circle.
    fn make_cylinder_shape(r: f64, height: f64) -> MockShape {
        MockShape::new(
            ShapeKind::Solid,
            vec![[r, 0.0, 0.0], [r, 0.0, height]],
            Some([0.0, 0.0, height / 2.0]),
        )
    }

    /// Sphere centered at the origin, with its two pole-crossing seam vertices.
    fn make_sphere_shape(r: f64) -> MockShape {
        MockShape::new(
            ShapeKind::Solid,
            vec![[r, 0.0, 0.0], [-r, 0.0, 0.0]],
            Some([0.0, 0.0, 0.0]),
        )
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeKernel for MockKernel {
    fn create_shape(
        &mut self,
        kind: &str,
        params: &ShapeParams,
    ) -> Result<ShapeHandle, KernelError> {
        let shape = match kind.parse::<PrimitiveKind>()? {
            PrimitiveKind::Box => Self::make_box_shape(
                positive_param(params, "Length")?,
                positive_param(params, "Width")?,
                positive_param(params, "Height")?,
            ),
            PrimitiveKind::Cylinder => Self::make_cylinder_shape(
                positive_param(params, "Radius")?,
                positive_param(params, "Height")?,
            ),
            PrimitiveKind::Sphere => Self::make_sphere_shape(positive_param(params, "Radius")?),
        };
        Ok(self.store(shape))
    }

    fn build_shape(&mut self, description: &ShapeDescription) -> Result<ShapeHandle, KernelError> {
        let shape = match description {
            ShapeDescription::Vertex { position } => {
                MockShape::new(ShapeKind::Vertex, vec![*position], None)
            }
            ShapeDescription::PlanarFace { .. } => {
                let vertices = description.distinct_vertices().to_vec();
                if vertices.len() < 3 {
                    return Err(KernelError::Construction {
                        reason: format!("face wire has {} vertices, need 3", vertices.len()),
                    });
                }
                MockShape::new(ShapeKind::Face, vertices, None)
            }
        };
        Ok(self.store(shape))
    }

    fn attach_attribute(
        &mut self,
        handle: &ShapeHandle,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), KernelError> {
        if self.reject_attributes || self.reject_attribute_named.as_deref() == Some(name) {
            return Err(KernelError::AttributeRejected {
                name: name.to_string(),
                reason: "mock kernel configured to reject attributes".to_string(),
            });
        }
        let shape = self
            .shapes
            .get_mut(&handle.id())
            .ok_or(KernelError::ShapeNotFound {
                handle: handle.id(),
            })?;
        shape.attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn release(&mut self, handle: ShapeHandle) {
        self.shapes.remove(&handle.id());
    }

    fn recompute(&mut self) -> Result<(), KernelError> {
        if self.fail_recompute {
            return Err(KernelError::Other {
                message: "mock kernel configured to fail recompute".to_string(),
            });
        }
        self.recompute_count += 1;
        Ok(())
    }
}

impl ShapeIntrospect for MockKernel {
    fn kind(&self, handle: &ShapeHandle) -> Result<ShapeKind, KernelError> {
        Ok(self.get(handle)?.kind)
    }

    fn vertices(&self, handle: &ShapeHandle) -> Result<Vec<[f64; 3]>, KernelError> {
        Ok(self.get(handle)?.vertices.clone())
    }

    fn centroid(&self, handle: &ShapeHandle) -> Result<[f64; 3], KernelError> {
        let shape = self.get(handle)?;
        match (shape.kind, shape.centroid) {
            (ShapeKind::Solid, Some(c)) => Ok(c),
            (kind, _) => Err(KernelError::NotSupported {
                operation: format!("centroid of {kind}"),
            }),
        }
    }

    fn attribute(&self, handle: &ShapeHandle, name: &str) -> Option<AttributeValue> {
        self.shapes
            .get(&handle.id())
            .and_then(|s| s.attributes.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_face() -> ShapeDescription {
        ShapeDescription::PlanarFace {
            wire: vec![
                [0.0, 0.0, 0.0],
                [100.0, 0.0, 0.0],
                [100.0, 100.0, 0.0],
                [0.0, 100.0, 0.0],
                [0.0, 0.0, 0.0],
            ],
        }
    }

    #[test]
    fn test_box_has_eight_vertices_and_center() {
        let mut kernel = MockKernel::new();
        let mut params = ShapeParams::new();
        params.insert("Length".to_string(), 2.0);
        params.insert("Width".to_string(), 4.0);
        params.insert("Height".to_string(), 6.0);

        let h = kernel.create_shape("Box", &params).unwrap();
        assert_eq!(kernel.kind(&h).unwrap(), ShapeKind::Solid);
        assert_eq!(kernel.vertices(&h).unwrap().len(), 8);
        assert_eq!(kernel.centroid(&h).unwrap(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_default_box_dimensions() {
        let mut kernel = MockKernel::new();
        let h = kernel.create_shape("Box", &ShapeParams::new()).unwrap();
        assert_eq!(kernel.centroid(&h).unwrap(), [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_unknown_primitive_is_not_supported() {
        let mut kernel = MockKernel::new();
        let err = kernel.create_shape("Torus", &ShapeParams::new()).unwrap_err();
        assert!(matches!(err, KernelError::NotSupported { .. }));
        assert_eq!(kernel.live_shapes(), 0);
    }

    #[test]
    fn test_face_drops_wire_closure() {
        let mut kernel = MockKernel::new();
        let h = kernel.build_shape(&square_face()).unwrap();
        let verts = kernel.vertices(&h).unwrap();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0], [0.0, 0.0, 0.0]);
        assert_eq!(verts[3], [0.0, 100.0, 0.0]);
    }

    #[test]
    fn test_face_with_two_vertices_rejected() {
        let mut kernel = MockKernel::new();
        let desc = ShapeDescription::PlanarFace {
            wire: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
        };
        assert!(matches!(
            kernel.build_shape(&desc),
            Err(KernelError::Construction { .. })
        ));
    }

    #[test]
    fn test_centroid_only_for_solids() {
        let mut kernel = MockKernel::new();
        let h = kernel.build_shape(&square_face()).unwrap();
        assert!(matches!(
            kernel.centroid(&h),
            Err(KernelError::NotSupported { .. })
        ));
    }

    #[test]
    fn test_attributes_round_trip_and_release() {
        let mut kernel = MockKernel::new();
        let h = kernel
            .build_shape(&ShapeDescription::Vertex {
                position: [1.0, 2.0, 0.0],
            })
            .unwrap();
        kernel
            .attach_attribute(&h, "GridAligned", AttributeValue::Bool(true))
            .unwrap();
        assert_eq!(
            kernel.attribute(&h, "GridAligned"),
            Some(AttributeValue::Bool(true))
        );

        let raw = h.id();
        kernel.release(h);
        assert_eq!(kernel.live_shapes(), 0);
        assert!(matches!(
            kernel.vertices(&ShapeHandle(raw)),
            Err(KernelError::ShapeNotFound { .. })
        ));
    }

    #[test]
    fn test_reject_attributes_switch() {
        let mut kernel = MockKernel::new();
        let h = kernel.insert_raw(ShapeKind::Wire, vec![[0.0, 0.0, 0.0]], None);
        kernel.set_reject_attributes(true);
        assert!(kernel
            .attach_attribute(&h, "Name", AttributeValue::from("w"))
            .is_err());
        kernel.set_reject_attributes(false);
        assert!(kernel
            .attach_attribute(&h, "Name", AttributeValue::from("w"))
            .is_ok());
    }

    #[test]
    fn test_reject_single_attribute_name() {
        let mut kernel = MockKernel::new();
        let h = kernel.insert_raw(ShapeKind::Vertex, vec![[0.0, 0.0, 0.0]], None);
        kernel.set_reject_attribute_named(Some("GridDeviation"));
        assert!(kernel
            .attach_attribute(&h, "GridAligned", AttributeValue::Bool(true))
            .is_ok());
        assert!(kernel
            .attach_attribute(&h, "GridDeviation", AttributeValue::Float(0.0))
            .is_err());
    }

    #[test]
    fn test_failing_recompute_is_not_counted() {
        let mut kernel = MockKernel::new();
        kernel.set_fail_recompute(true);
        assert!(matches!(kernel.recompute(), Err(KernelError::Other { .. })));
        assert_eq!(kernel.recompute_count(), 0);
        kernel.set_fail_recompute(false);
        kernel.recompute().unwrap();
        assert_eq!(kernel.recompute_count(), 1);
    }

    #[test]
    fn test_deterministic_handles() {
        let mut k1 = MockKernel::new();
        let mut k2 = MockKernel::new();
        let a = k1.create_shape("Box", &ShapeParams::new()).unwrap();
        let b = k2.create_shape("Box", &ShapeParams::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(k1.vertices(&a).unwrap(), k2.vertices(&b).unwrap());
    }
}
