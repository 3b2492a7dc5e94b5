//! Parametric primitive kinds and parameter validation shared by both kernels.

use std::str::FromStr;

use crate::types::{KernelError, ShapeParams};

/// Default value for any missing dimension parameter.
pub const DEFAULT_DIMENSION: f64 = 10.0;

/// Primitive solids a kernel can synthesize from parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Parameters: Length, Width, Height.
    Box,
    /// Parameters: Radius, Height.
    Cylinder,
    /// Parameters: Radius.
    Sphere,
}

impl FromStr for PrimitiveKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Box" => Ok(PrimitiveKind::Box),
            "Cylinder" => Ok(PrimitiveKind::Cylinder),
            "Sphere" => Ok(PrimitiveKind::Sphere),
            other => Err(KernelError::NotSupported {
                operation: format!("create_shape({other})"),
            }),
        }
    }
}

/// Read a strictly positive, finite dimension. Missing parameters take [`DEFAULT_DIMENSION`].
pub fn positive_param(params: &ShapeParams, name: &str) -> Result<f64, KernelError> {
    let value = grid_types::param_or(params, name, DEFAULT_DIMENSION);
    if !value.is_finite() || value <= 0.0 {
        return Err(KernelError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be a positive finite number, got {value}"),
        });
    }
    Ok(value)
}
