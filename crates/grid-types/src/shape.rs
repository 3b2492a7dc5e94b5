use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Topological kind of a kernel shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    Compound,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Vertex => "Vertex",
            ShapeKind::Edge => "Edge",
            ShapeKind::Wire => "Wire",
            ShapeKind::Face => "Face",
            ShapeKind::Shell => "Shell",
            ShapeKind::Solid => "Solid",
            ShapeKind::Compound => "Compound",
        };
        f.write_str(name)
    }
}

/// Kernel-independent description of a shape to be built.
///
/// Produced by the geometry bridge from external records and realized by a kernel
/// into a native shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeDescription {
    /// A single vertex.
    Vertex { position: [f64; 3] },
    /// A planar face bounded by one closed wire. The wire repeats its first
    /// vertex at the end.
    PlanarFace { wire: Vec<[f64; 3]> },
}

impl ShapeDescription {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeDescription::Vertex { .. } => ShapeKind::Vertex,
            ShapeDescription::PlanarFace { .. } => ShapeKind::Face,
        }
    }

    /// Distinct vertices in order, without the closing repeat of a face wire.
    pub fn distinct_vertices(&self) -> &[[f64; 3]] {
        match self {
            ShapeDescription::Vertex { position } => std::slice::from_ref(position),
            ShapeDescription::PlanarFace { wire } => match (wire.first(), wire.last()) {
                (Some(first), Some(last)) if wire.len() > 1 && first == last => {
                    &wire[..wire.len() - 1]
                }
                _ => wire,
            },
        }
    }
}

/// Numeric parameters for parametric shape synthesis, keyed by name (e.g. "Length").
pub type ShapeParams = BTreeMap<String, f64>;

/// Look up a parameter, falling back to `default` when absent.
pub fn param_or(params: &ShapeParams, name: &str, default: f64) -> f64 {
    params.get(name).copied().unwrap_or(default)
}
