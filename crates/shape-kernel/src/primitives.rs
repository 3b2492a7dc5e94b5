//! Shape builders on top of truck's sweep API.
//!
//! truck has no solid primitives, so each one is built from successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Solid, Vertex, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

use crate::types::KernelError;

/// Planar face spanning the closed `wire`; `what` names the face in the error.
fn plane_face(wire: Wire, what: &str) -> Result<Face, KernelError> {
    builder::try_attach_plane(&[wire]).map_err(|e| KernelError::Construction {
        reason: format!("cannot span {} with a plane: {}", what, e),
    })
}

pub fn make_vertex(p: [f64; 3]) -> Vertex {
    builder::vertex(Point3::new(p[0], p[1], p[2]))
}

/// Planar face bounded by the polygon through `points`.
/// `points` are distinct; the closing edge back to the first point is added here.
pub fn make_polygon_face(points: &[[f64; 3]]) -> Result<Face, KernelError> {
    if points.len() < 3 {
        return Err(KernelError::Construction {
            reason: format!("polygon has {} vertices, need 3", points.len()),
        });
    }

    // Edges must share vertex objects or the wire will not close.
    let corners: Vec<Vertex> = points.iter().copied().map(make_vertex).collect();
    let wire: Wire = corners
        .iter()
        .zip(corners.iter().cycle().skip(1))
        .map(|(a, b)| builder::line(a, b))
        .collect();
    plane_face(wire, "polygon")
}

/// Axis-aligned box from the origin to (w, h, d): vertex, then edge, face, solid.
pub fn make_box(w: f64, h: f64, d: f64) -> Solid {
    let corner = builder::vertex(Point3::origin());
    let bottom_edge = builder::tsweep(&corner, w * Vector3::unit_x());
    let bottom_face = builder::tsweep(&bottom_edge, h * Vector3::unit_y());
    builder::tsweep(&bottom_face, d * Vector3::unit_z())
}

/// Cylinder standing on the XY plane, base centered at the origin.
pub fn make_cylinder(radius: f64, height: f64) -> Result<Solid, KernelError> {
    let rim_start = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let rim: Wire = builder::rsweep(&rim_start, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    let base = plane_face(rim, "cylinder base")?;
    Ok(builder::tsweep(&base, height * Vector3::unit_z()))
}

/// Sphere centered at the origin: a half disc in the XZ plane spun about Z.
pub fn make_sphere(radius: f64) -> Result<Solid, KernelError> {
    let east = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let arc: Wire = builder::rsweep(&east, Point3::origin(), Vector3::unit_y(), Rad(PI));

    let west = builder::vertex(Point3::new(-radius, 0.0, 0.0));
    let diameter: Edge = builder::tsweep(&west, 2.0 * radius * Vector3::unit_x());

    let boundary: Wire = arc.edge_iter().cloned().chain(std::iter::once(diameter)).collect();
    let half_disc = plane_face(boundary, "sphere profile")?;
    Ok(builder::rsweep(&half_disc, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI)))
}
