use std::fmt;
use std::str::FromStr;

use feature_store::StoreError;
use geometry_bridge::BridgeError;
use grid_policy::PolicyError;
use shape_kernel::KernelError;
use snapshot_format::{LoadError, SaveError};

use crate::config::ConfigError;

/// Feature types a session accepts. Which of them can actually be built depends on the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Box,
    Cylinder,
    Sphere,
    Cone,
    Torus,
    Prism,
    Extrusion,
    Revolution,
}

impl FeatureType {
    pub const ALL: [FeatureType; 8] = [
        FeatureType::Box,
        FeatureType::Cylinder,
        FeatureType::Sphere,
        FeatureType::Cone,
        FeatureType::Torus,
        FeatureType::Prism,
        FeatureType::Extrusion,
        FeatureType::Revolution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Box => "Box",
            FeatureType::Cylinder => "Cylinder",
            FeatureType::Sphere => "Sphere",
            FeatureType::Cone => "Cone",
            FeatureType::Torus => "Torus",
            FeatureType::Prism => "Prism",
            FeatureType::Extrusion => "Extrusion",
            FeatureType::Revolution => "Revolution",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SessionError::UnsupportedFeatureType {
                feature_type: s.to_string(),
            })
    }
}

/// Errors from session operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("unsupported feature type: {feature_type}")]
    UnsupportedFeatureType { feature_type: String },

    #[error("invalid feature reference: {id}")]
    InvalidFeatureReference { id: String },

    #[error("geometry error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("feature store error: {0}")]
    Store(#[from] StoreError),

    #[error("grid policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("snapshot load error: {0}")]
    Load(#[from] LoadError),

    #[error("snapshot save error: {0}")]
    Save(#[from] SaveError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e.to_string())
    }
}
