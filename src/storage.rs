mod driver;
mod error;
pub mod wavefront;

pub use driver::{DRIVER_NAMES, StorageDriver, new_driver};
pub use error::{Error, Result};
pub use wavefront::WavefrontStorage;
