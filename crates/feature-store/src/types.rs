use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use shape_kernel::KernelError;

/// Attribute names written by the store on every feature.
pub const ATTR_NAME: &str = "Name";
pub const ATTR_TYPE: &str = "Type";
pub const ATTR_UNIQUE_ID: &str = "UniqueId";
pub const ATTR_GRID_ALIGNED: &str = "GridAligned";
pub const ATTR_GRID_DEVIATION: &str = "GridDeviation";

/// Standard attributes. User parameters may not overwrite these.
pub const RESERVED_ATTRIBUTES: [&str; 5] = [
    ATTR_NAME,
    ATTR_TYPE,
    ATTR_UNIQUE_ID,
    ATTR_GRID_ALIGNED,
    ATTR_GRID_DEVIATION,
];

pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

/// Stable identity of a registered feature.
///
/// Parsing an ID from text is allowed, but only IDs minted by a
/// [`FeatureStore`](crate::FeatureStore) ever resolve to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(Uuid);

impl FeatureId {
    pub(crate) fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FeatureId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Eight lowercase hex digits from a fresh v4 UUID, used to make object names unique.
pub fn short_hex() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    hex
}

/// Errors from feature store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("invalid feature reference: {id}")]
    InvalidFeatureReference { id: String },

    #[error("attribute {name} is reserved")]
    ReservedAttribute { name: String },

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
