//! Storage driver forwarding container stats to a Wavefront proxy.
//!
//! Every call to [`WavefrontStorage::add_stats`] passes through a per-container
//! [`FlushThrottle`]. Calls that pass are turned into a [`MetricSet`], rendered as
//! line protocol and written to a single long-lived TCP connection.
//!
//! # Emitted metrics
//!
//! - `cpu_cumulative_usage`
//! - `memory_usage`, `memory_working_set`
//! - `rx_bytes`, `rx_errors`, `tx_bytes`, `tx_errors`
//! - `fs_summary.fs_limit`, `fs_summary.fs_usage` (summed over all devices)
//! - `fs_limit`, `fs_usage` per device, tagged with `device="<device>"`
//!
//! All lines of one flush carry the same timestamp. Their order is unspecified.

pub mod line;
pub mod metrics;
pub mod sink;
pub mod throttle;

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::info::{ContainerReference, ContainerStats};

use super::{Result, StorageDriver};
pub use line::TagSet;
pub use metrics::MetricSet;
pub use sink::ConnectionSink;
pub use throttle::FlushThrottle;

#[derive(Debug)]
pub struct WavefrontStorage<W = TcpStream> {
    config: Config,
    throttle: FlushThrottle,
    sink: ConnectionSink<W>,
}

impl WavefrontStorage<TcpStream> {
    /// Connects to the proxy at `config.address`.
    ///
    /// # Errors
    ///
    /// Fails if the proxy cannot be reached within `config.connect_timeout`.
    pub async fn connect(config: Config) -> Result<Self> {
        let sink = ConnectionSink::connect(&config.address, config.connect_timeout).await?;
        Ok(Self::with_sink(config, sink))
    }
}

impl<W> WavefrontStorage<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a driver writing to an already established `sink`.
    pub fn with_sink(config: Config, sink: ConnectionSink<W>) -> Self {
        Self {
            throttle: FlushThrottle::new(config.interval),
            config,
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn throttle(&self) -> &FlushThrottle {
        &self.throttle
    }

    /// Flushes `stats` of `container` as of `now`, unless the container was flushed
    /// less than the configured interval ago.
    ///
    /// The flush state advances before any line is written; lines written before a
    /// failing write stay sent.
    ///
    /// # Errors
    ///
    /// Returns the first write error encountered.
    pub async fn flush(
        &self,
        container: &ContainerReference,
        stats: &ContainerStats,
        now: SystemTime,
    ) -> Result<()> {
        let name = container.display_name();
        if !self.throttle.should_flush(name, now) {
            log::trace!("skipping flush for container `{}`", name);
            return Ok(());
        }
        if let Some(ttl) = self.config.state_ttl {
            self.throttle.prune_idle_at_most_every(now, ttl);
        }
        log::trace!("flushing container stats for `{}`", name);

        let timestamp = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let tags = TagSet::new(&self.config.source, container, &self.config.extra_tags);

        let mut series = metrics::container_stats_to_values(stats);
        metrics::container_fs_stats_to_values(&mut series, stats);

        let mut writer = self.sink.lock().await;
        let mut buf = String::with_capacity(256);
        for (key, value) in &series {
            buf.clear();
            line::format_line(
                &mut buf,
                &self.config.prefix,
                key,
                *value,
                timestamp,
                &tags,
            );
            writer.write_line(&buf).await?;
        }

        Ok(())
    }

    /// Returns the underlying stream, or `None` if the driver was closed.
    pub fn into_inner(self) -> Option<W> {
        self.sink.into_inner()
    }
}

impl<W> StorageDriver for WavefrontStorage<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn add_stats(
        &self,
        container: &ContainerReference,
        stats: Option<&ContainerStats>,
    ) -> Result<()> {
        match stats {
            Some(stats) => self.flush(container, stats, SystemTime::now()).await,
            None => Ok(()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.sink.close().await
    }
}
