pub mod feature;
pub mod store;
pub mod types;

pub use feature::Feature;
pub use store::FeatureStore;
pub use types::*;
