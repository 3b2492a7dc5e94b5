//! Conversion between external geometry records and kernel shapes.
//!
//! Import produces a [`ShapeDescription`](grid_types::ShapeDescription) for a kernel to
//! realize; export reads a live shape back through [`ShapeIntrospect`](shape_kernel::ShapeIntrospect).
//! Only points and simple polygons survive a round trip exactly.

pub mod export;
pub mod import;
pub mod types;

pub use export::{to_external, to_multipoint};
pub use import::from_external;
pub use types::BridgeError;
