pub mod mock_kernel;
pub mod params;
pub mod primitives;
pub mod traits;
pub mod truck_kernel;
pub mod types;

pub use mock_kernel::MockKernel;
pub use params::PrimitiveKind;
pub use traits::*;
pub use truck_kernel::TruckKernel;
pub use types::*;
