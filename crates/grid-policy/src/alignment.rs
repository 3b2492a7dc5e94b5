use serde::{Deserialize, Serialize};

/// Result of measuring a vertex set against a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// `deviation <= tolerance`.
    pub aligned: bool,
    /// Largest per-vertex deviation.
    pub deviation: f64,
    /// Index of the first vertex attaining `deviation`. None for an empty set.
    pub worst_vertex: Option<usize>,
}
