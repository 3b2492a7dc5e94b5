use grid_types::{GeometryRecord, PointRecord, ShapeDescription};

use crate::types::BridgeError;

/// Convert an external record into a shape description.
///
/// Points become a single vertex (z defaults to 0.0). Polygons become a planar face
/// at z = 0 whose wire is re-closed on the first vertex. Anything else is rejected.
pub fn from_external(record: &GeometryRecord) -> Result<ShapeDescription, BridgeError> {
    match record {
        GeometryRecord::Point(p) => point_to_vertex(p),
        GeometryRecord::Polygon { ring } => ring_to_face(ring),
        other => Err(BridgeError::UnsupportedGeometry {
            kind: other.type_name().to_string(),
        }),
    }
}

fn point_to_vertex(p: &PointRecord) -> Result<ShapeDescription, BridgeError> {
    let position = [p.x, p.y, p.z.unwrap_or(0.0)];
    if position.iter().any(|c| !c.is_finite()) {
        return Err(BridgeError::DegenerateGeometry {
            reason: format!("non-finite point coordinate {:?}", position),
        });
    }
    Ok(ShapeDescription::Vertex { position })
}

fn ring_to_face(ring: &[(f64, f64)]) -> Result<ShapeDescription, BridgeError> {
    if let Some(&(x, y)) = ring.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(BridgeError::DegenerateGeometry {
            reason: format!("non-finite ring coordinate ({}, {})", x, y),
        });
    }

    let points = open_ring(ring);
    if points.len() < 3 {
        return Err(BridgeError::DegenerateGeometry {
            reason: format!("polygon has {} distinct vertices, need 3", points.len()),
        });
    }
    if is_zero_area(&points) {
        return Err(BridgeError::DegenerateGeometry {
            reason: "polygon ring has zero area".to_string(),
        });
    }

    let mut wire: Vec<[f64; 3]> = points.iter().map(|&(x, y)| [x, y, 0.0]).collect();
    wire.push(wire[0]);
    Ok(ShapeDescription::PlanarFace { wire })
}

/// Ring coordinates in order without the explicit closure.
///
/// The last coordinate is dropped only when it repeats the first, so an unclosed
/// ring keeps all of its vertices. Consecutive repeats collapse to one vertex.
fn open_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    for &p in ring {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Shoelace area test, relative to the ring's extent.
fn is_zero_area(points: &[(f64, f64)]) -> bool {
    let n = points.len();
    let twice_area: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum();

    let extent = points
        .iter()
        .fold(0.0f64, |m, &(x, y)| m.max(x.abs()).max(y.abs()));
    twice_area.abs() <= 1e-12 * extent.max(1.0).powi(2)
}
