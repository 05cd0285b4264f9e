use crate::config::Config;
use crate::info::{ContainerReference, ContainerStats};

use super::{Error, Result, WavefrontStorage};

/// Names accepted by [`new_driver`].
pub const DRIVER_NAMES: [&str; 1] = ["wavefront"];

/// A sink for container stats pushed by the host monitoring framework.
pub trait StorageDriver {
    /// Hands one stats snapshot of `container` to the driver.
    ///
    /// A `None` snapshot is a no-op and always succeeds.
    fn add_stats(
        &self,
        container: &ContainerReference,
        stats: Option<&ContainerStats>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Releases the resources held by the driver.
    fn close(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Constructs the storage driver registered under `name`.
///
/// # Errors
///
/// Returns [`Error::UnknownDriver`] if no driver is registered under `name`, or
/// any error raised while the driver sets up its connection.
pub async fn new_driver(name: &str, config: Config) -> Result<impl StorageDriver> {
    match name {
        "wavefront" => WavefrontStorage::connect(config).await,
        other => Err(Error::UnknownDriver(other.to_owned())),
    }
}
