use approx::assert_abs_diff_eq;
use geometry_bridge::{from_external, to_external, to_multipoint, BridgeError};
use grid_types::{GeometryRecord, PointRecord};
use shape_kernel::{MockKernel, ShapeKernel, ShapeKind, TruckKernel};

fn square_ring() -> Vec<(f64, f64)> {
    vec![
        (0.0, 0.0),
        (100.0, 0.0),
        (100.0, 100.0),
        (0.0, 100.0),
        (0.0, 0.0),
    ]
}

/// Same vertices, same cyclic order, ignoring the closure and the starting point.
fn same_cycle(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
    let a = &a[..a.len() - 1];
    let b = &b[..b.len() - 1];
    if a.len() != b.len() {
        return false;
    }
    (0..a.len()).any(|shift| (0..a.len()).all(|i| a[i] == b[(i + shift) % b.len()]))
}

#[test]
fn polygon_round_trip_through_mock() {
    let mut kernel = MockKernel::new();
    let desc = from_external(&GeometryRecord::Polygon { ring: square_ring() }).unwrap();
    let h = kernel.build_shape(&desc).unwrap();

    let GeometryRecord::Polygon { ring } = to_external(&kernel, &h).unwrap() else {
        panic!("face should export as a polygon");
    };
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert!(same_cycle(&square_ring(), &ring));
}

#[test]
fn polygon_round_trip_through_truck() {
    let mut kernel = TruckKernel::new();
    let desc = from_external(&GeometryRecord::Polygon { ring: square_ring() }).unwrap();
    let h = kernel.build_shape(&desc).unwrap();

    let GeometryRecord::Polygon { ring } = to_external(&kernel, &h).unwrap() else {
        panic!("face should export as a polygon");
    };
    assert!(same_cycle(&square_ring(), &ring), "ring order changed: {:?}", ring);
}

#[test]
fn point_round_trip() {
    let mut kernel = MockKernel::new();
    let desc = from_external(&GeometryRecord::point3(100.0, 200.0, 0.0)).unwrap();
    let h = kernel.build_shape(&desc).unwrap();

    let GeometryRecord::Point(p) = to_external(&kernel, &h).unwrap() else {
        panic!("vertex should export as a point");
    };
    assert_abs_diff_eq!(p.x, 100.0, epsilon = 1e-6);
    assert_abs_diff_eq!(p.y, 200.0, epsilon = 1e-6);
    assert_eq!(p.z, None);
}

#[test]
fn solid_exports_centroid() {
    let mut kernel = MockKernel::new();
    let h = kernel.insert_raw(
        ShapeKind::Solid,
        vec![[0.0, 0.0, 0.0], [10.0, 10.0, 10.0]],
        Some([5.0, 5.0, 5.0]),
    );
    assert_eq!(to_external(&kernel, &h).unwrap(), GeometryRecord::point(5.0, 5.0));
}

#[test]
fn truck_box_exports_centroid() {
    let mut kernel = TruckKernel::new();
    let params = [("Length", 10.0), ("Width", 10.0), ("Height", 10.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let h = kernel.create_shape("Box", &params).unwrap();

    let GeometryRecord::Point(p) = to_external(&kernel, &h).unwrap() else {
        panic!("solid should export as a point");
    };
    assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(p.y, 5.0, epsilon = 1e-6);
}

#[test]
fn unexportable_kinds_rejected() {
    let mut kernel = MockKernel::new();
    let h = kernel.insert_raw(ShapeKind::Edge, vec![[0.0; 3], [1.0, 0.0, 0.0]], None);
    match to_external(&kernel, &h).unwrap_err() {
        BridgeError::UnsupportedShapeKind { kind } => assert_eq!(kind, ShapeKind::Edge),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn face_without_enough_vertices_is_degenerate() {
    let mut kernel = MockKernel::new();
    let empty = kernel.insert_raw(ShapeKind::Face, vec![], None);
    let sliver = kernel.insert_raw(
        ShapeKind::Face,
        vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 0.0, 5.0]],
        None,
    );

    for h in [&empty, &sliver] {
        assert!(matches!(
            to_external(&kernel, h),
            Err(BridgeError::DegenerateGeometry { .. })
        ));
    }
}

#[test]
fn multipoint_keeps_z() {
    let mut kernel = MockKernel::new();
    let h = kernel.insert_raw(
        ShapeKind::Face,
        vec![[0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 3.0]],
        None,
    );
    assert_eq!(
        to_multipoint(&kernel, &h).unwrap(),
        GeometryRecord::multi_point(vec![
            PointRecord::with_z(0.0, 0.0, 1.0),
            PointRecord::with_z(1.0, 0.0, 2.0),
            PointRecord::with_z(0.0, 1.0, 3.0),
        ])
    );
}
