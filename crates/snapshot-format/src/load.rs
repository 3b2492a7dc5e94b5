use serde::Deserialize;

use crate::errors::LoadError;
use crate::save::{DocumentSnapshot, FORMAT_TAG, FORMAT_VERSION};

/// Just the header, so format and version are checked before the body is interpreted.
#[derive(Debug, Deserialize)]
struct SnapshotHeader {
    format: String,
    version: u32,
}

/// Deserialize a snapshot from a JSON string.
///
/// Validates the format identifier and version, migrating older versions.
pub fn load_snapshot(json: &str) -> Result<DocumentSnapshot, LoadError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    let header: SnapshotHeader = serde_json::from_value(value.clone())
        .map_err(|e| LoadError::ParseError(e.to_string()))?;

    if header.format != FORMAT_TAG {
        return Err(LoadError::UnknownFormat(header.format));
    }

    if header.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: header.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let value = if header.version < FORMAT_VERSION {
        crate::migrate::migrate(value, header.version, FORMAT_VERSION)?
    } else {
        value
    };

    serde_json::from_value(value).map_err(|e| LoadError::ParseError(e.to_string()))
}
