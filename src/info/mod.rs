//! Container identity and resource usage snapshots as handed over by the host
//! monitoring framework.
//!
//! # Main types
//!
//! - [`ContainerReference`]: name, aliases, namespace and labels of a monitored container.
//! - [`ContainerStats`]: one point-in-time measurement bundle (CPU, memory, network, filesystem).
//!
//! Both types are read-only inputs to a [`StorageDriver`](crate::storage::StorageDriver); they
//! are deserializable so that a host can ship them over a pipe as JSON.

mod container;
mod stats;

pub use container::ContainerReference;
pub use stats::{ContainerStats, CpuStats, CpuUsage, FsStats, MemoryStats, NetworkStats};
