//! Resource usage snapshot of a single container.
//!
//! All counters are cumulative as reported by the host; no rates are derived here.

/// One point-in-time measurement bundle for a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ContainerStats {
    /// CPU usage statistics.
    #[serde(default)]
    pub cpu: CpuStats,
    /// Memory usage statistics.
    #[serde(default)]
    pub memory: MemoryStats,
    /// Network usage statistics, summed over all interfaces.
    #[serde(default)]
    pub network: NetworkStats,
    /// Per-device filesystem usage.
    #[serde(default)]
    pub filesystem: Vec<FsStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub usage: CpuUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CpuUsage {
    /// Total CPU time consumed, in nanoseconds.
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct MemoryStats {
    /// Current memory usage in bytes, including caches.
    #[serde(default)]
    pub usage: u64,
    /// Memory that cannot be reclaimed under pressure, in bytes.
    #[serde(default)]
    pub working_set: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct NetworkStats {
    /// Cumulative count of bytes received.
    #[serde(default)]
    pub rx_bytes: u64,
    /// Cumulative count of receive errors encountered.
    #[serde(default)]
    pub rx_errors: u64,
    /// Cumulative count of bytes transmitted.
    #[serde(default)]
    pub tx_bytes: u64,
    /// Cumulative count of transmit errors encountered.
    #[serde(default)]
    pub tx_errors: u64,
}

/// Usage of a single filesystem device.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct FsStats {
    /// Device identifier, e.g. `/dev/sda1`.
    pub device: String,
    /// Bytes in use.
    #[serde(default)]
    pub usage: u64,
    /// Capacity in bytes.
    #[serde(default)]
    pub limit: u64,
}

impl FsStats {
    pub fn new(device: impl Into<String>, usage: u64, limit: u64) -> Self {
        Self {
            device: device.into(),
            usage,
            limit,
        }
    }
}
