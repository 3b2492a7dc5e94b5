//! Real geometry kernel on top of truck.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};
use truck_modeling::topology::{Face, Solid, Vertex};
use truck_modeling::Point3;

use crate::params::{positive_param, PrimitiveKind};
use crate::primitives;
use crate::traits::{ShapeIntrospect, ShapeKernel};
use crate::types::*;

/// Chordal tolerance used when triangulating a solid to find its center of mass.
const CENTROID_TOLERANCE: f64 = 0.01;

/// A truck shape stored by the kernel.
enum TruckShape {
    Vertex(Vertex),
    Face(Face),
    Solid(Solid),
}

impl TruckShape {
    fn kind(&self) -> ShapeKind {
        match self {
            TruckShape::Vertex(_) => ShapeKind::Vertex,
            TruckShape::Face(_) => ShapeKind::Face,
            TruckShape::Solid(_) => ShapeKind::Solid,
        }
    }
}

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    shapes: HashMap<u64, TruckShape>,
    attributes: HashMap<u64, BTreeMap<String, AttributeValue>>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            shapes: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> ShapeHandle {
        let h = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, shape: TruckShape) -> ShapeHandle {
        let handle = self.alloc_handle();
        self.shapes.insert(handle.id(), shape);
        handle
    }

    fn get(&self, handle: &ShapeHandle) -> Result<&TruckShape, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound {
                handle: handle.id(),
            })
    }

    /// Number of shapes currently held by the kernel.
    pub fn live_shapes(&self) -> usize {
        self.shapes.len()
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_array(p: Point3) -> [f64; 3] {
    [p[0], p[1], p[2]]
}

/// Collect distinct vertex positions in first-seen order.
fn unique_points(vertices: impl Iterator<Item = Vertex>) -> Vec<[f64; 3]> {
    let mut seen = HashSet::new();
    let mut points = Vec::new();
    for v in vertices {
        if seen.insert(v.id()) {
            points.push(to_array(v.point()));
        }
    }
    points
}

/// Center of mass of a closed solid, from signed tetrahedra over its triangulated boundary.
fn solid_centroid(solid: &Solid) -> Result<[f64; 3], KernelError> {
    let mesh = solid.triangulation(CENTROID_TOLERANCE).to_polygon();
    let positions = mesh.positions();

    let mut volume = 0.0;
    let mut weighted = [0.0; 3];
    let mut add_triangle = |a: usize, b: usize, c: usize| {
        let (a, b, c) = (to_array(positions[a]), to_array(positions[b]), to_array(positions[c]));
        let cross = [
            b[1] * c[2] - b[2] * c[1],
            b[2] * c[0] - b[0] * c[2],
            b[0] * c[1] - b[1] * c[0],
        ];
        let v = (a[0] * cross[0] + a[1] * cross[1] + a[2] * cross[2]) / 6.0;
        volume += v;
        for i in 0..3 {
            weighted[i] += v * (a[i] + b[i] + c[i]) / 4.0;
        }
    };

    for tri in mesh.tri_faces() {
        add_triangle(tri[0].pos, tri[1].pos, tri[2].pos);
    }
    for quad in mesh.quad_faces() {
        add_triangle(quad[0].pos, quad[1].pos, quad[2].pos);
        add_triangle(quad[0].pos, quad[2].pos, quad[3].pos);
    }

    if volume.abs() < 1e-12 {
        return Err(KernelError::Construction {
            reason: "solid encloses no volume".to_string(),
        });
    }
    Ok([
        weighted[0] / volume,
        weighted[1] / volume,
        weighted[2] / volume,
    ])
}

impl ShapeKernel for TruckKernel {
    fn create_shape(
        &mut self,
        kind: &str,
        params: &ShapeParams,
    ) -> Result<ShapeHandle, KernelError> {
        let solid = match kind.parse::<PrimitiveKind>()? {
            PrimitiveKind::Box => primitives::make_box(
                positive_param(params, "Length")?,
                positive_param(params, "Width")?,
                positive_param(params, "Height")?,
            ),
            PrimitiveKind::Cylinder => primitives::make_cylinder(
                positive_param(params, "Radius")?,
                positive_param(params, "Height")?,
            )?,
            PrimitiveKind::Sphere => primitives::make_sphere(positive_param(params, "Radius")?)?,
        };
        let handle = self.store(TruckShape::Solid(solid));
        debug!(%handle, kind, "created primitive solid");
        Ok(handle)
    }

    fn build_shape(&mut self, description: &ShapeDescription) -> Result<ShapeHandle, KernelError> {
        let shape = match description {
            ShapeDescription::Vertex { position } => {
                TruckShape::Vertex(primitives::make_vertex(*position))
            }
            ShapeDescription::PlanarFace { .. } => TruckShape::Face(
                primitives::make_polygon_face(description.distinct_vertices())?,
            ),
        };
        let handle = self.store(shape);
        debug!(%handle, kind = %description.kind(), "built shape");
        Ok(handle)
    }

    fn attach_attribute(
        &mut self,
        handle: &ShapeHandle,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), KernelError> {
        self.get(handle)?;
        self.attributes
            .entry(handle.id())
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }

    fn release(&mut self, handle: ShapeHandle) {
        self.shapes.remove(&handle.id());
        self.attributes.remove(&handle.id());
    }

    fn recompute(&mut self) -> Result<(), KernelError> {
        for (id, shape) in &self.shapes {
            let valid = match shape {
                TruckShape::Vertex(_) => true,
                TruckShape::Face(face) => !face.boundaries().is_empty(),
                TruckShape::Solid(solid) => !solid.boundaries().is_empty(),
            };
            if !valid {
                return Err(KernelError::Other {
                    message: format!("shape#{} has no boundary", id),
                });
            }
        }
        Ok(())
    }
}

impl ShapeIntrospect for TruckKernel {
    fn kind(&self, handle: &ShapeHandle) -> Result<ShapeKind, KernelError> {
        Ok(self.get(handle)?.kind())
    }

    fn vertices(&self, handle: &ShapeHandle) -> Result<Vec<[f64; 3]>, KernelError> {
        let points = match self.get(handle)? {
            TruckShape::Vertex(v) => vec![to_array(v.point())],
            TruckShape::Face(face) => unique_points(
                face.boundaries()
                    .iter()
                    .flat_map(|wire| wire.vertex_iter().collect::<Vec<_>>()),
            ),
            TruckShape::Solid(solid) => unique_points(
                solid
                    .boundaries()
                    .iter()
                    .flat_map(|shell| shell.vertex_iter().collect::<Vec<_>>()),
            ),
        };
        Ok(points)
    }

    fn centroid(&self, handle: &ShapeHandle) -> Result<[f64; 3], KernelError> {
        match self.get(handle)? {
            TruckShape::Solid(solid) => solid_centroid(solid),
            other => Err(KernelError::NotSupported {
                operation: format!("centroid of {}", other.kind()),
            }),
        }
    }

    fn attribute(&self, handle: &ShapeHandle, name: &str) -> Option<AttributeValue> {
        self.attributes
            .get(&handle.id())
            .and_then(|attrs| attrs.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn box_params(l: f64, w: f64, h: f64) -> ShapeParams {
        let mut params = ShapeParams::new();
        params.insert("Length".to_string(), l);
        params.insert("Width".to_string(), w);
        params.insert("Height".to_string(), h);
        params
    }

    #[test]
    fn test_truck_kernel_vertex_shape() {
        let mut kernel = TruckKernel::new();
        let h = kernel
            .build_shape(&ShapeDescription::Vertex {
                position: [100.0, 200.0, 0.0],
            })
            .unwrap();
        assert_eq!(kernel.kind(&h).unwrap(), ShapeKind::Vertex);
        assert_eq!(kernel.vertices(&h).unwrap(), vec![[100.0, 200.0, 0.0]]);
    }

    #[test]
    fn test_truck_kernel_face_vertices_in_ring_order() {
        let mut kernel = TruckKernel::new();
        let wire = vec![
            [0.0, 0.0, 0.0],
            [100.0, 0.0, 0.0],
            [100.0, 100.0, 0.0],
            [0.0, 100.0, 0.0],
            [0.0, 0.0, 0.0],
        ];
        let h = kernel
            .build_shape(&ShapeDescription::PlanarFace { wire: wire.clone() })
            .unwrap();
        assert_eq!(kernel.kind(&h).unwrap(), ShapeKind::Face);

        let verts = kernel.vertices(&h).unwrap();
        assert_eq!(verts.len(), 4);
        // Same cyclic order as the input ring.
        let start = verts.iter().position(|v| *v == wire[0]).unwrap();
        for i in 0..4 {
            assert_eq!(verts[(start + i) % 4], wire[i]);
        }
    }

    #[test]
    fn test_truck_kernel_box_centroid() {
        let mut kernel = TruckKernel::new();
        let h = kernel.create_shape("Box", &box_params(10.0, 10.0, 10.0)).unwrap();
        assert_eq!(kernel.vertices(&h).unwrap().len(), 8);

        let c = kernel.centroid(&h).unwrap();
        assert_abs_diff_eq!(c[0], 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c[1], 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c[2], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_truck_kernel_cylinder_centroid_on_axis() {
        let mut kernel = TruckKernel::new();
        let mut params = ShapeParams::new();
        params.insert("Radius".to_string(), 1.0);
        params.insert("Height".to_string(), 4.0);
        let h = kernel.create_shape("Cylinder", &params).unwrap();

        let c = kernel.centroid(&h).unwrap();
        assert_abs_diff_eq!(c[0], 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(c[1], 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(c[2], 2.0, epsilon = 0.05);
    }

    #[test]
    fn test_truck_kernel_centroid_rejects_face() {
        let mut kernel = TruckKernel::new();
        let h = kernel
            .build_shape(&ShapeDescription::PlanarFace {
                wire: vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, 0.0, 0.0],
                ],
            })
            .unwrap();
        assert!(matches!(
            kernel.centroid(&h),
            Err(KernelError::NotSupported { .. })
        ));
    }

    #[test]
    fn test_truck_kernel_attributes_and_release() {
        let mut kernel = TruckKernel::new();
        let h = kernel.create_shape("Box", &ShapeParams::new()).unwrap();
        kernel
            .attach_attribute(&h, "GridDeviation", AttributeValue::Float(0.5))
            .unwrap();
        assert_eq!(
            kernel.attribute(&h, "GridDeviation"),
            Some(AttributeValue::Float(0.5))
        );
        assert!(kernel.recompute().is_ok());

        kernel.release(h);
        assert_eq!(kernel.live_shapes(), 0);
    }

    #[test]
    fn test_truck_kernel_rejects_bad_dimensions() {
        let mut kernel = TruckKernel::new();
        let err = kernel
            .create_shape("Box", &box_params(0.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidParameter { .. }));
    }
}
