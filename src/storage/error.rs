use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to `{address}`: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out connecting to `{address}` after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },
    #[error("failed to write metric line: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to close connection: {0}")]
    Close(#[source] std::io::Error),
    #[error("connection is closed")]
    Closed,
    #[error("unknown storage driver `{0}`")]
    UnknownDriver(String),
}

pub type Result<T> = std::result::Result<T, Error>;
