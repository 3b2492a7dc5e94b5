use std::fmt;

// Re-export shared types from grid-types
pub use grid_types::{AttributeValue, ShapeDescription, ShapeKind, ShapeParams};

/// Opaque handle to a shape held by the geometry kernel.
/// NEVER persisted. Valid only for the kernel instance that issued it.
///
/// Not `Clone`: whoever holds the handle owns the shape and must give it back
/// through [`crate::ShapeKernel::release`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) u64);

impl ShapeHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("shape not found: shape#{handle}")]
    ShapeNotFound { handle: u64 },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("shape construction failed: {reason}")]
    Construction { reason: String },

    #[error("attribute {name} rejected: {reason}")]
    AttributeRejected { name: String, reason: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}
