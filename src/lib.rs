use tokio::io::BufReader;

use storage::StorageDriver;

/// Creo Wavefront: forwards per-container resource usage snapshots to a Wavefront proxy.
///
/// The host monitoring framework pushes [`info::ContainerStats`] snapshots through a
/// [`storage::StorageDriver`]. The Wavefront driver throttles flushes per container,
/// encodes CPU, memory, network and filesystem counters as line protocol and writes
/// them to one long-lived TCP connection.
pub mod config;
pub mod error;
pub mod host;
pub mod info;
pub mod storage;

/// Name of the driver used when `STORAGE_DRIVER` is not set.
pub const DEFAULT_DRIVER: &str = "wavefront";

/// Runs the adapter with stats events read from stdin.
///
/// Reads the configuration from the environment, connects the storage driver and
/// forwards every event until stdin is closed.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid configuration values (e.g., a non-numeric `WF_INTERVAL`).
/// - An unknown `STORAGE_DRIVER`.
/// - Failure to connect to the Wavefront proxy.
/// - I/O errors when reading stdin.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::from_env()?;
    let driver_name = std::env::var("STORAGE_DRIVER")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DRIVER.to_owned());
    log::debug!("Storage driver: {}", driver_name);

    let driver = storage::new_driver(&driver_name, config).await?;
    log::debug!("Started storage driver");

    let forwarded = host::feed(BufReader::new(tokio::io::stdin()), &driver).await;
    driver.close().await?;
    log::debug!("Forwarded {} stats events", forwarded?);

    Ok(())
}
