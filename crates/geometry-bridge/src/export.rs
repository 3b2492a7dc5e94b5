use grid_types::{GeometryRecord, PointRecord};
use shape_kernel::{ShapeHandle, ShapeIntrospect, ShapeKind};

use crate::types::BridgeError;

/// Convert a live shape back into an external record.
///
/// - Vertex: its coordinate as a 2D point.
/// - Face: its vertex loop as a closed polygon ring.
/// - Solid: its centroid as a 2D point. Everything but the center is lost.
///
/// Z is dropped in every case.
pub fn to_external(
    introspect: &dyn ShapeIntrospect,
    handle: &ShapeHandle,
) -> Result<GeometryRecord, BridgeError> {
    match introspect.kind(handle)? {
        ShapeKind::Vertex => {
            let vertices = introspect.vertices(handle)?;
            let [x, y, _] = vertices.first().copied().ok_or_else(|| {
                BridgeError::DegenerateGeometry {
                    reason: "vertex shape has no coordinate".to_string(),
                }
            })?;
            Ok(GeometryRecord::point(x, y))
        }
        ShapeKind::Face => {
            let mut ring: Vec<(f64, f64)> = introspect
                .vertices(handle)?
                .into_iter()
                .map(|[x, y, _]| (x, y))
                .collect();
            let distinct = ring
                .iter()
                .enumerate()
                .filter(|&(i, p)| !ring[..i].contains(p))
                .count();
            if distinct < 3 {
                return Err(BridgeError::DegenerateGeometry {
                    reason: format!("face has {} distinct vertices, need 3", distinct),
                });
            }
            let first = ring[0];
            if ring.last() != Some(&first) {
                ring.push(first);
            }
            Ok(GeometryRecord::Polygon { ring })
        }
        ShapeKind::Solid => {
            let [x, y, _] = introspect.centroid(handle)?;
            Ok(GeometryRecord::point(x, y))
        }
        kind => Err(BridgeError::UnsupportedShapeKind { kind }),
    }
}

/// Every vertex of the shape as a 3D point, in kernel order.
pub fn to_multipoint(
    introspect: &dyn ShapeIntrospect,
    handle: &ShapeHandle,
) -> Result<GeometryRecord, BridgeError> {
    let points = introspect
        .vertices(handle)?
        .into_iter()
        .map(|[x, y, z]| PointRecord::with_z(x, y, z))
        .collect();
    Ok(GeometryRecord::multi_point(points))
}
