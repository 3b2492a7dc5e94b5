use serde::{Deserialize, Serialize};

/// A single external point. `z` is absent for 2D records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl PointRecord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// Kernel-independent geometry exchanged with callers outside the CAD document.
///
/// Polygon rings are explicitly closed: the first and last coordinate are equal.
/// Use [`GeometryRecord::polygon`] to build a checked ring; the variant itself stays
/// open so that malformed input can be rejected by the conversion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryRecord {
    Point(PointRecord),
    Polygon { ring: Vec<(f64, f64)> },
    MultiPoint { points: Vec<PointRecord> },
}

/// Errors from checked record construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("polygon ring needs at least 4 coordinates, got {count}")]
    RingTooShort { count: usize },

    #[error("polygon ring is not closed: first {first:?} != last {last:?}")]
    RingNotClosed { first: (f64, f64), last: (f64, f64) },
}

impl GeometryRecord {
    /// 2D point.
    pub fn point(x: f64, y: f64) -> Self {
        GeometryRecord::Point(PointRecord::new(x, y))
    }

    /// Point with an explicit z coordinate.
    pub fn point3(x: f64, y: f64, z: f64) -> Self {
        GeometryRecord::Point(PointRecord::with_z(x, y, z))
    }

    /// Polygon from an explicitly closed ring (3 distinct coordinates plus closure, minimum).
    pub fn polygon(ring: Vec<(f64, f64)>) -> Result<Self, RecordError> {
        if ring.len() < 4 {
            return Err(RecordError::RingTooShort { count: ring.len() });
        }
        let first = ring[0];
        let last = ring[ring.len() - 1];
        if first != last {
            return Err(RecordError::RingNotClosed { first, last });
        }
        Ok(GeometryRecord::Polygon { ring })
    }

    pub fn multi_point(points: Vec<PointRecord>) -> Self {
        GeometryRecord::MultiPoint { points }
    }

    /// Name of the record's tag, as it appears in the serialized form.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryRecord::Point(_) => "Point",
            GeometryRecord::Polygon { .. } => "Polygon",
            GeometryRecord::MultiPoint { .. } => "MultiPoint",
        }
    }
}
