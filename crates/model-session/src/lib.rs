//! Document-level orchestration: one kernel document, one feature store, one grid policy.
//!
//! [`ModelSession`] is the entry point for creating, importing and exporting features.

pub mod config;
pub mod document;
pub mod session;
pub mod types;

pub use config::{ConfigError, SessionConfig};
pub use document::{Document, Preferences};
pub use session::{read_snapshot, ModelSession};
pub use types::{FeatureType, SessionError};
