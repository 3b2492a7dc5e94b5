/// Errors during snapshot loading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse snapshot: {0}")]
    ParseError(String),

    #[error("unknown snapshot format: {0}")]
    UnknownFormat(String),

    #[error("snapshot version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// Errors during snapshot serialization.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),
}
