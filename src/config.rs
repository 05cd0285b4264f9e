//! Adapter configuration.
//!
//! Values are read from the environment once at startup and stay fixed for the
//! lifetime of the driver:
//!
//! | Variable             | Meaning                                   | Default          |
//! |----------------------|-------------------------------------------|------------------|
//! | `WF_SOURCE`          | `source` tag on every line                | host name        |
//! | `WF_PROXY_ADDRESS`   | `host:port` of the Wavefront proxy        | `localhost:2878` |
//! | `WF_INTERVAL`        | seconds between flushes of one container  | `0` (no limit)   |
//! | `WF_ADD_TAGS`        | literal tags appended to every line       | empty            |
//! | `WF_PREFIX`          | prepended to every metric name            | `cadvisor.`      |
//! | `WF_CONNECT_TIMEOUT` | seconds to wait for the proxy connection, at least 1 | `10`  |
//! | `WF_STATE_TTL`       | seconds after which idle containers are forgotten | never    |

use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "localhost:2878";
pub const DEFAULT_PREFIX: &str = "cadvisor.";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid number of seconds `{value}` in `{variable}`: {source}")]
    InvalidSeconds {
        variable: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("`{variable}` must be at least one second")]
    ZeroSeconds { variable: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Value of the `source` tag.
    pub source: String,
    /// Address of the Wavefront proxy.
    pub address: String,
    /// Minimum time between two flushes of the same container.
    pub interval: Duration,
    /// Tags appended verbatim to every line, e.g. `az="us-west-2" app="web"`.
    pub extra_tags: String,
    /// Prepended to every metric name.
    pub prefix: String,
    /// Upper bound for establishing the proxy connection.
    pub connect_timeout: Duration,
    /// Forget containers not flushed for this long. `None` keeps them forever.
    pub state_ttl: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: String::new(),
            address: DEFAULT_ADDRESS.to_owned(),
            interval: Duration::ZERO,
            extra_tags: String::new(),
            prefix: DEFAULT_PREFIX.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            state_ttl: None,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Without `WF_SOURCE`, the host name from `/etc/hostname` is used as source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeconds`] if a duration variable is not a whole number
    /// and [`Error::ZeroSeconds`] if `WF_CONNECT_TIMEOUT` is zero.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.source.is_empty() {
            config.source = hostname("/etc/hostname");
        }
        log::debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Builds the configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Unset and empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(source) = get("WF_SOURCE") {
            config.source = source;
        }
        if let Some(address) = get("WF_PROXY_ADDRESS") {
            config.address = address;
        }
        if let Some(interval) = get("WF_INTERVAL") {
            config.interval = parse_seconds("WF_INTERVAL", interval)?;
        }
        if let Some(tags) = get("WF_ADD_TAGS") {
            config.extra_tags = tags;
        }
        if let Some(prefix) = get("WF_PREFIX") {
            config.prefix = prefix;
        }
        if let Some(timeout) = get("WF_CONNECT_TIMEOUT") {
            config.connect_timeout = parse_seconds("WF_CONNECT_TIMEOUT", timeout)?;
            if config.connect_timeout.is_zero() {
                return Err(Error::ZeroSeconds {
                    variable: "WF_CONNECT_TIMEOUT",
                });
            }
        }
        if let Some(ttl) = get("WF_STATE_TTL") {
            config.state_ttl = Some(parse_seconds("WF_STATE_TTL", ttl)?);
        }

        Ok(config)
    }
}

fn parse_seconds(variable: &'static str, value: String) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(source) => Err(Error::InvalidSeconds {
            variable,
            value,
            source,
        }),
    }
}

fn hostname(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path)
        .map(|name| name.trim().to_owned())
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.interval, Duration::ZERO);
        assert_eq!(config.prefix, "cadvisor.");
        assert!(config.extra_tags.is_empty());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.state_ttl, None);
    }

    #[test]
    fn test_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("WF_SOURCE", "node-1"),
            ("WF_PROXY_ADDRESS", "wavefront:2878"),
            ("WF_INTERVAL", "10"),
            ("WF_ADD_TAGS", "az=\"us-west-2\" app=\"cadvisortesting\""),
            ("WF_PREFIX", "k8s."),
            ("WF_CONNECT_TIMEOUT", "3"),
            ("WF_STATE_TTL", "600"),
        ]))
        .unwrap();

        assert_eq!(config.source, "node-1");
        assert_eq!(config.address, "wavefront:2878");
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.extra_tags, "az=\"us-west-2\" app=\"cadvisortesting\"");
        assert_eq!(config.prefix, "k8s.");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.state_ttl, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_empty_variables_keep_defaults() {
        let config =
            Config::from_lookup(lookup(&[("WF_PREFIX", ""), ("WF_INTERVAL", "")])).unwrap();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.interval, Duration::ZERO);
    }

    #[test]
    fn test_invalid_interval() {
        let err = Config::from_lookup(lookup(&[("WF_INTERVAL", "ten")])).unwrap_err();
        match err {
            Error::InvalidSeconds {
                variable, value, ..
            } => {
                assert_eq!(variable, "WF_INTERVAL");
                assert_eq!(value, "ten");
            }
            other => panic!("Expected InvalidSeconds, got {other}"),
        }
    }

    #[test]
    fn test_zero_connect_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[("WF_CONNECT_TIMEOUT", "0")])).unwrap_err();
        assert!(matches!(
            err,
            Error::ZeroSeconds {
                variable: "WF_CONNECT_TIMEOUT"
            }
        ));

        // zero stays valid where it has a meaning
        let config = Config::from_lookup(lookup(&[("WF_INTERVAL", "0"), ("WF_STATE_TTL", "0")]))
            .unwrap();
        assert_eq!(config.interval, Duration::ZERO);
        assert_eq!(config.state_ttl, Some(Duration::ZERO));
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("WF_INTERVAL", "-5")])).is_err());
    }

    #[test]
    fn test_hostname_fallback() {
        assert_eq!(hostname("/definitely/does/not/exist"), "localhost");
    }

    #[test]
    fn test_hostname_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(tmp, "node-7").unwrap();
        assert_eq!(hostname(tmp.path()), "node-7");
    }
}
