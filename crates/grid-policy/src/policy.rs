use serde::{Deserialize, Serialize};

use crate::alignment::Alignment;

/// Grid spacing in mm used when none is configured.
pub const DEFAULT_GRID_SIZE: f64 = 25.0;
/// Deviation still counted as aligned. Wide enough to accept half-grid points.
pub const DEFAULT_TOLERANCE: f64 = 15.0;

/// How the grid is drawn. Has no effect on measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridStyle {
    #[default]
    Lines,
    Points,
}

impl GridStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridStyle::Lines => "Lines",
            GridStyle::Points => "Points",
        }
    }
}

/// Which axes take part in alignment checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisRestriction {
    /// Z is never snapped and never contributes to deviation.
    #[default]
    #[serde(rename = "XY_ONLY")]
    XyOnly,
    #[serde(rename = "XYZ")]
    Xyz,
}

/// Errors from policy construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("grid size must be finite and > 0, got {size}")]
    InvalidSize { size: f64 },

    #[error("grid tolerance must be finite and >= 0, got {tolerance}")]
    InvalidTolerance { tolerance: f64 },
}

/// Immutable grid configuration plus the alignment computation.
///
/// `tolerance` is independent of `size`; a tolerance of at least `size / 2`
/// accepts every finite vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridPolicyConfig", into = "GridPolicyConfig")]
pub struct GridPolicy {
    size: f64,
    tolerance: f64,
    snap_enabled: bool,
    style: GridStyle,
    axis_restriction: AxisRestriction,
}

/// Unvalidated, serializable form of [`GridPolicy`]. Missing fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPolicyConfig {
    pub size: f64,
    pub tolerance: f64,
    pub snap_enabled: bool,
    pub style: GridStyle,
    pub axis_restriction: AxisRestriction,
}

impl Default for GridPolicyConfig {
    fn default() -> Self {
        GridPolicy::default().into()
    }
}

impl TryFrom<GridPolicyConfig> for GridPolicy {
    type Error = PolicyError;

    fn try_from(c: GridPolicyConfig) -> Result<Self, Self::Error> {
        Ok(GridPolicy::new(c.size, c.tolerance)?
            .with_snap(c.snap_enabled)
            .with_style(c.style)
            .with_axis_restriction(c.axis_restriction))
    }
}

impl From<GridPolicy> for GridPolicyConfig {
    fn from(p: GridPolicy) -> Self {
        Self {
            size: p.size,
            tolerance: p.tolerance,
            snap_enabled: p.snap_enabled,
            style: p.style,
            axis_restriction: p.axis_restriction,
        }
    }
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            snap_enabled: true,
            style: GridStyle::Lines,
            axis_restriction: AxisRestriction::XyOnly,
        }
    }
}

impl GridPolicy {
    /// Policy with the given spacing and tolerance; other settings take the defaults.
    pub fn new(size: f64, tolerance: f64) -> Result<Self, PolicyError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(PolicyError::InvalidSize { size });
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PolicyError::InvalidTolerance { tolerance });
        }
        Ok(Self {
            size,
            tolerance,
            ..Self::default()
        })
    }

    pub fn with_snap(mut self, snap_enabled: bool) -> Self {
        self.snap_enabled = snap_enabled;
        self
    }

    pub fn with_style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_axis_restriction(mut self, axis_restriction: AxisRestriction) -> Self {
        self.axis_restriction = axis_restriction;
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn style(&self) -> GridStyle {
        self.style
    }

    pub fn axis_restriction(&self) -> AxisRestriction {
        self.axis_restriction
    }

    fn snap(&self, c: f64) -> f64 {
        (c / self.size).round() * self.size
    }

    /// Distance from one coordinate to its nearest grid line.
    /// Non-finite coordinates are infinitely far from the grid.
    fn axis_deviation(&self, c: f64) -> f64 {
        if !c.is_finite() {
            return f64::INFINITY;
        }
        (c - self.snap(c)).abs()
    }

    /// Nearest lattice point to `v`. Z passes through unchanged under `XyOnly`.
    pub fn nearest_grid_point(&self, v: [f64; 3]) -> [f64; 3] {
        let z = match self.axis_restriction {
            AxisRestriction::XyOnly => v[2],
            AxisRestriction::Xyz => self.snap(v[2]),
        };
        [self.snap(v[0]), self.snap(v[1]), z]
    }

    /// Max-norm distance from `v` to its nearest grid point over the active axes.
    pub fn vertex_deviation(&self, v: [f64; 3]) -> f64 {
        let xy = self.axis_deviation(v[0]).max(self.axis_deviation(v[1]));
        match self.axis_restriction {
            AxisRestriction::XyOnly => xy,
            AxisRestriction::Xyz => xy.max(self.axis_deviation(v[2])),
        }
    }

    /// Measure a vertex set against the grid.
    ///
    /// Every vertex is scanned; the reported deviation is the true maximum even when
    /// an earlier vertex already exceeds the tolerance. An empty set passes with 0.0.
    pub fn evaluate(&self, vertices: &[[f64; 3]]) -> Alignment {
        let mut deviation = 0.0;
        let mut worst_vertex = None;
        for (i, &v) in vertices.iter().enumerate() {
            let d = self.vertex_deviation(v);
            if worst_vertex.is_none() || d > deviation {
                deviation = d;
                worst_vertex = Some(i);
            }
        }
        Alignment {
            aligned: deviation <= self.tolerance,
            deviation,
            worst_vertex,
        }
    }
}
