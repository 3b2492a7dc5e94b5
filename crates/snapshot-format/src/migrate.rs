use serde_json::Value;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations run on the raw JSON, one version step at a time. Version 1 is the
/// first released format, so there is nothing to migrate from yet.
pub fn migrate(value: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    if from_version != to_version {
        return Err(LoadError::MigrationFailed {
            from: from_version,
            to: to_version,
            reason: format!(
                "no migration path from v{} to v{}",
                from_version, to_version
            ),
        });
    }
    Ok(value)
}
