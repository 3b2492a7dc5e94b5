pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::load_snapshot;
pub use metadata::ProjectMetadata;
pub use save::{save_snapshot, DocumentSnapshot, FeatureSnapshot, FORMAT_TAG, FORMAT_VERSION};
