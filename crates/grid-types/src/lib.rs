pub mod attribute;
pub mod record;
pub mod shape;

pub use attribute::*;
pub use record::*;
pub use shape::*;
