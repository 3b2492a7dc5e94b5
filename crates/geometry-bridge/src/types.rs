use shape_kernel::{KernelError, ShapeKind};

/// Errors from converting geometry in either direction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("no conversion for geometry type {kind}")]
    UnsupportedGeometry { kind: String },

    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("no export rule for shape kind {kind}")]
    UnsupportedShapeKind { kind: ShapeKind },

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
