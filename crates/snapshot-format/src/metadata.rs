use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document name and timestamps, stored at the top of every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Unique document name, `"{name}_{8 hex}"`.
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    /// Metadata stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Bump `modified` to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
