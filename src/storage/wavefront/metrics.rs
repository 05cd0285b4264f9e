//! Conversion of a [`ContainerStats`] snapshot into named metric values.
//!
//! Filesystem metrics come in two flavours: a summary over all devices keyed by
//! [`FS_SUMMARY_LIMIT`] / [`FS_SUMMARY_USAGE`], and per-device values whose key
//! carries the device in front of [`DEVICE_SEPARATOR`], e.g. `/dev/sda1~fs_usage`.

use std::collections::HashMap;

use crate::info::ContainerStats;

/// Metric name to value, built fresh for every flush.
pub type MetricSet = HashMap<String, u64>;

/// Separates the device from the metric name in per-device keys.
///
/// Never valid inside a metric name.
pub const DEVICE_SEPARATOR: char = '~';

/// Cumulative CPU usage.
pub const CPU_CUMULATIVE_USAGE: &str = "cpu_cumulative_usage";
/// Memory usage.
pub const MEMORY_USAGE: &str = "memory_usage";
/// Working set size.
pub const MEMORY_WORKING_SET: &str = "memory_working_set";
/// Cumulative count of bytes received.
pub const RX_BYTES: &str = "rx_bytes";
/// Cumulative count of receive errors encountered.
pub const RX_ERRORS: &str = "rx_errors";
/// Cumulative count of bytes transmitted.
pub const TX_BYTES: &str = "tx_bytes";
/// Cumulative count of transmit errors encountered.
pub const TX_ERRORS: &str = "tx_errors";
/// Filesystem limit.
pub const FS_LIMIT: &str = "fs_limit";
/// Filesystem usage.
pub const FS_USAGE: &str = "fs_usage";
/// Filesystem limit summed over all devices.
pub const FS_SUMMARY_LIMIT: &str = "fs_summary.fs_limit";
/// Filesystem usage summed over all devices.
pub const FS_SUMMARY_USAGE: &str = "fs_summary.fs_usage";

/// Copies the CPU, memory and network counters of `stats` into a new [`MetricSet`].
pub fn container_stats_to_values(stats: &ContainerStats) -> MetricSet {
    let mut series = MetricSet::with_capacity(11);

    series.insert(CPU_CUMULATIVE_USAGE.to_owned(), stats.cpu.usage.total);

    series.insert(MEMORY_USAGE.to_owned(), stats.memory.usage);
    series.insert(MEMORY_WORKING_SET.to_owned(), stats.memory.working_set);

    series.insert(RX_BYTES.to_owned(), stats.network.rx_bytes);
    series.insert(RX_ERRORS.to_owned(), stats.network.rx_errors);
    series.insert(TX_BYTES.to_owned(), stats.network.tx_bytes);
    series.insert(TX_ERRORS.to_owned(), stats.network.tx_errors);

    series
}

/// Adds summary and per-device filesystem metrics of `stats` to `series`.
///
/// Summary keys are only present if at least one device was reported. Summaries
/// wrap around on overflow. A device reported twice overwrites its earlier
/// per-device values.
pub fn container_fs_stats_to_values(series: &mut MetricSet, stats: &ContainerStats) {
    for fs in &stats.filesystem {
        let limit = series.entry(FS_SUMMARY_LIMIT.to_owned()).or_default();
        *limit = limit.wrapping_add(fs.limit);
        let usage = series.entry(FS_SUMMARY_USAGE.to_owned()).or_default();
        *usage = usage.wrapping_add(fs.usage);

        series.insert(device_key(&fs.device, FS_LIMIT), fs.limit);
        series.insert(device_key(&fs.device, FS_USAGE), fs.usage);
    }
}

/// Builds the per-device key for `metric` on `device`.
pub fn device_key(device: &str, metric: &str) -> String {
    let mut key = String::with_capacity(device.len() + metric.len() + 1);
    key.push_str(device);
    key.push(DEVICE_SEPARATOR);
    key.push_str(metric);
    key
}

/// Splits a per-device key into `(device, metric)`.
///
/// Returns `None` for plain metric keys.
pub fn split_device_key(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once(DEVICE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::FsStats;

    fn sample_stats() -> ContainerStats {
        let mut stats = ContainerStats::default();
        stats.cpu.usage.total = 100;
        stats.memory.usage = 50;
        stats.memory.working_set = 40;
        stats.network.rx_bytes = 10;
        stats.network.rx_errors = 0;
        stats.network.tx_bytes = 20;
        stats.network.tx_errors = 1;
        stats
    }

    #[test]
    fn test_stats_to_values() {
        let series = container_stats_to_values(&sample_stats());

        assert_eq!(series.len(), 7);
        assert_eq!(series[CPU_CUMULATIVE_USAGE], 100);
        assert_eq!(series[MEMORY_USAGE], 50);
        assert_eq!(series[MEMORY_WORKING_SET], 40);
        assert_eq!(series[RX_BYTES], 10);
        assert_eq!(series[RX_ERRORS], 0);
        assert_eq!(series[TX_BYTES], 20);
        assert_eq!(series[TX_ERRORS], 1);
    }

    #[test]
    fn test_fs_stats_without_devices() {
        let mut series = container_stats_to_values(&sample_stats());
        container_fs_stats_to_values(&mut series, &sample_stats());

        assert_eq!(series.len(), 7);
        assert!(!series.contains_key(FS_SUMMARY_LIMIT));
        assert!(!series.contains_key(FS_SUMMARY_USAGE));
    }

    #[test]
    fn test_fs_stats_summary_and_devices() {
        let mut stats = sample_stats();
        stats.filesystem = vec![
            FsStats::new("/dev/sda1", 5, 100),
            FsStats::new("/dev/sdb1", 7, 300),
        ];
        let mut series = MetricSet::new();
        container_fs_stats_to_values(&mut series, &stats);

        assert_eq!(series.len(), 6);
        assert_eq!(series[FS_SUMMARY_LIMIT], 400);
        assert_eq!(series[FS_SUMMARY_USAGE], 12);
        assert_eq!(series["/dev/sda1~fs_limit"], 100);
        assert_eq!(series["/dev/sda1~fs_usage"], 5);
        assert_eq!(series["/dev/sdb1~fs_limit"], 300);
        assert_eq!(series["/dev/sdb1~fs_usage"], 7);
    }

    #[test]
    fn test_fs_stats_duplicate_device_overwrites() {
        let mut stats = ContainerStats::default();
        stats.filesystem = vec![
            FsStats::new("/dev/sda1", 5, 100),
            FsStats::new("/dev/sda1", 8, 200),
        ];
        let mut series = MetricSet::new();
        container_fs_stats_to_values(&mut series, &stats);

        // summary still counts both records
        assert_eq!(series[FS_SUMMARY_LIMIT], 300);
        assert_eq!(series[FS_SUMMARY_USAGE], 13);
        assert_eq!(series["/dev/sda1~fs_limit"], 200);
        assert_eq!(series["/dev/sda1~fs_usage"], 8);
    }

    #[test]
    fn test_fs_summary_wraps_on_overflow() {
        let mut stats = ContainerStats::default();
        stats.filesystem = vec![
            FsStats::new("/dev/sda1", 5, u64::MAX),
            FsStats::new("/dev/sdb1", 7, 10),
        ];
        let mut series = MetricSet::new();
        container_fs_stats_to_values(&mut series, &stats);

        assert_eq!(series[FS_SUMMARY_LIMIT], 9);
        assert_eq!(series[FS_SUMMARY_USAGE], 12);
        assert_eq!(series["/dev/sda1~fs_limit"], u64::MAX);
        assert_eq!(series["/dev/sdb1~fs_limit"], 10);
    }

    #[test]
    fn test_split_device_key() {
        assert_eq!(
            split_device_key(&device_key("/dev/sda1", FS_USAGE)),
            Some(("/dev/sda1", FS_USAGE))
        );
        assert_eq!(split_device_key(FS_SUMMARY_USAGE), None);
        assert_eq!(split_device_key("odd~dev~fs_limit"), Some(("odd~dev", FS_LIMIT)));
    }
}
