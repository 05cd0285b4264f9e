use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, MutexGuard};

use crate::storage::{Error, Result};

/// Owns the outbound stream metric lines are written to.
///
/// Writers are serialized; a [`SinkWriter`] obtained from [`ConnectionSink::lock`]
/// keeps other writers out until it is dropped. There is no reconnection: once the
/// stream fails, every write fails until the sink is rebuilt.
#[derive(Debug)]
pub struct ConnectionSink<W> {
    stream: Mutex<Option<W>>,
}

impl ConnectionSink<TcpStream> {
    /// Dials `address`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectTimeout`] if no connection was established in time, or
    /// [`Error::Connect`] if the connection attempt failed.
    pub async fn connect(address: &str, timeout: Duration) -> Result<Self> {
        log::debug!("Connecting to {}...", address);
        let stream = tokio::time::timeout(timeout, TcpStream::connect(address))
            .await
            .map_err(|_| Error::ConnectTimeout {
                address: address.to_owned(),
                timeout,
            })?
            .map_err(|source| Error::Connect {
                address: address.to_owned(),
                source,
            })?;
        log::debug!("Connected to {}.", address);

        Ok(Self::new(stream))
    }
}

impl<W> ConnectionSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(stream: W) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }

    /// Waits for exclusive access to the stream.
    pub async fn lock(&self) -> SinkWriter<'_, W> {
        SinkWriter {
            stream: self.stream.lock().await,
        }
    }

    /// Writes a single line.
    pub async fn write(&self, line: &str) -> Result<()> {
        self.lock().await.write_line(line).await
    }

    /// Shuts the stream down. Closing an already closed sink is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Close`] if shutting down the stream fails.
    pub async fn close(&self) -> Result<()> {
        match self.stream.lock().await.take() {
            Some(mut stream) => {
                log::debug!("Closing connection");
                stream.shutdown().await.map_err(Error::Close)
            }
            None => Ok(()),
        }
    }

    /// Returns the stream, or `None` if the sink was closed.
    pub fn into_inner(self) -> Option<W> {
        self.stream.into_inner()
    }
}

/// Exclusive write access to a [`ConnectionSink`].
#[derive(Debug)]
pub struct SinkWriter<'a, W> {
    stream: MutexGuard<'a, Option<W>>,
}

impl<W> SinkWriter<'_, W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Writes `line` as is; the caller provides the line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after the sink was closed, or [`Error::Write`] if the
    /// stream rejects the bytes.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::Closed)?;
        stream.write_all(line.as_bytes()).await.map_err(Error::Write)?;
        stream.flush().await.map_err(Error::Write)
    }
}
