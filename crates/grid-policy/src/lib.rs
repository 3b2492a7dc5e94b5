//! Grid alignment measurement.
//!
//! A [`GridPolicy`] describes a regular lattice (spacing, tolerance, axes) and
//! reports how far a set of vertices sits from it. Nothing here moves geometry:
//! callers decide what to do with the report.
//!
//! Rounding to the nearest grid line is half away from zero (`f64::round`), so a
//! coordinate exactly between two lines snaps outward: 12.5 on a 25 grid goes to 25,
//! -12.5 goes to -25.

pub mod alignment;
pub mod policy;

pub use alignment::Alignment;
pub use policy::{AxisRestriction, GridPolicy, GridPolicyConfig, GridStyle, PolicyError};
