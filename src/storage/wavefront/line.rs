//! Rendering of metric values into Wavefront line protocol.
//!
//! Each line has the shape
//!
//! ```text
//! <prefix><metric> <value> <timestamp> source=<source> container="<name>" [device="<device>"] <extra tags> <appended tags>
//! ```
//!
//! Tag values are wrapped in double quotes but not escaped.

use std::fmt::Write;

use crate::info::ContainerReference;

use super::metrics;

/// Tags attached to every line emitted for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet<'a> {
    source: &'a str,
    container: &'a str,
    extra: &'a str,
    appended: String,
}

impl<'a> TagSet<'a> {
    /// Builds the tag set for `container`.
    ///
    /// # Arguments
    ///
    /// * `source` - Value of the `source` tag.
    /// * `container` - Supplies the `container` tag, the namespace and the labels.
    /// * `extra` - Literal tag string added to every line, e.g. `az="us-west-2"`.
    pub fn new(source: &'a str, container: &'a ContainerReference, extra: &'a str) -> Self {
        let mut appended = String::new();
        if !container.namespace.is_empty() {
            write!(appended, " namespace=\"{}\"", container.namespace)
                .expect("write!() into String to never fail");
        }
        for (key, value) in &container.labels {
            write!(appended, " {key}=\"{value}\"").expect("write!() into String to never fail");
        }

        Self {
            source,
            container: container.display_name(),
            extra,
            appended,
        }
    }

    pub fn source(&self) -> &str {
        self.source
    }

    pub fn container(&self) -> &str {
        self.container
    }

    /// Namespace and label tags, each preceded by a space.
    pub fn appended(&self) -> &str {
        &self.appended
    }
}

/// Appends one newline-terminated line for `key` to `out`.
///
/// Keys of the form `<device>~<metric>` are written as `<metric>` with an
/// additional `device` tag.
pub fn format_line(
    out: &mut String,
    prefix: &str,
    key: &str,
    value: u64,
    timestamp: u64,
    tags: &TagSet<'_>,
) {
    let result = match metrics::split_device_key(key) {
        Some((device, metric)) => writeln!(
            out,
            "{prefix}{metric} {value} {timestamp} source={} container=\"{}\" device=\"{device}\" {} {}",
            tags.source, tags.container, tags.extra, tags.appended,
        ),
        None => writeln!(
            out,
            "{prefix}{key} {value} {timestamp} source={} container=\"{}\" {} {}",
            tags.source, tags.container, tags.extra, tags.appended,
        ),
    };
    result.expect("write!() into String to never fail");
}
