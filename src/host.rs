//! Feeds stats snapshots from a byte stream into a [`StorageDriver`].
//!
//! The stream carries one JSON encoded [`StatsEvent`] per line:
//!
//! ```text
//! {"container":{"name":"/docker/abc","aliases":["web"]},"stats":{"cpu":{"usage":{"total":100}}}}
//! {"container":{"name":"/docker/def"},"stats":null}
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::ResultOkLogExt;
use crate::info::{ContainerReference, ContainerStats};
use crate::storage::StorageDriver;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read stats event: {0}")]
    Read(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A stats snapshot pushed by the host for one container.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StatsEvent {
    pub container: ContainerReference,
    #[serde(default)]
    pub stats: Option<ContainerStats>,
}

/// Forwards every event read from `reader` to `driver` until end of input.
///
/// Malformed lines are skipped. Errors returned by the driver are logged and do
/// not stop the feed.
///
/// # Returns
///
/// The number of events handed to the driver.
///
/// # Errors
///
/// Returns [`Error::Read`] if reading from `reader` fails.
pub async fn feed<R, D>(reader: R, driver: &D) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    D: StorageDriver,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await.map_err(Error::Read)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<StatsEvent>(line) {
            Ok(event) => {
                driver
                    .add_stats(&event.container, event.stats.as_ref())
                    .await
                    .ok_log();
                forwarded += 1;
            }
            Err(err) => log::warn!("skipping malformed stats event: {}", err),
        }
    }

    Ok(forwarded)
}
