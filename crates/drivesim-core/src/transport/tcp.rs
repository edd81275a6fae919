//! TCP line transport
//!
//! The device bridge writes one message per line: either sixteen hex tokens
//! or a JSON command object.

use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use super::{TransportError, TransportMessage, TransportSource};
use crate::config::TransportConfig;

/// Newline-delimited text source over TCP
#[derive(Debug)]
pub struct TcpLineSource {
    lines: FramedRead<TcpStream, LinesCodec>,
    addr: String,
}

impl TcpLineSource {
    /// Connect using the transport settings
    ///
    /// A `tcp://` prefix on the address is accepted and ignored.
    pub async fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        let address = config.address.trim();
        Self::connect_with_timeout(
            address.strip_prefix("tcp://").unwrap_or(address),
            config.connect_timeout(),
            config.max_line_length,
        )
        .await
    }

    /// Connect to `addr` (`host:port`) with an explicit timeout
    pub async fn connect_with_timeout(
        addr: &str,
        timeout: Duration,
        max_line_length: usize,
    ) -> Result<Self, TransportError> {
        tracing::debug!(
            addr = %addr,
            timeout_ms = timeout.as_millis(),
            "Connecting to telemetry bridge"
        );

        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                tracing::error!(addr = %addr, "Telemetry connection timed out");
                TransportError::Timeout
            })?
            .map_err(|e| {
                tracing::error!(addr = %addr, error = %e, "Telemetry connection failed");
                TransportError::ConnectFailed {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                }
            })?;

        // Frames are tiny and latency-sensitive
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(addr = %addr, error = %e, "Failed to set TCP_NODELAY (continuing anyway)");
        }

        tracing::info!(addr = %addr, "Telemetry connection opened");
        Ok(Self::from_stream(stream, addr.to_string(), max_line_length))
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream, addr: String, max_line_length: usize) -> Self {
        Self {
            lines: FramedRead::new(stream, LinesCodec::new_with_max_length(max_line_length)),
            addr,
        }
    }

    /// Peer address this source reads from
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl TransportSource for TcpLineSource {
    async fn recv(&mut self) -> Result<Option<TransportMessage>, TransportError> {
        loop {
            match self.lines.next().await {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        tracing::trace!(addr = %self.addr, "Skipping blank line");
                        continue;
                    }
                    tracing::trace!(addr = %self.addr, line = %line, "Received line");
                    return Ok(Some(TransportMessage::Text(line)));
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    // The codec discards up to the next newline and carries on
                    tracing::warn!(addr = %self.addr, "Oversized line discarded");
                    continue;
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    tracing::error!(addr = %self.addr, error = %e, "Telemetry connection error");
                    return Err(TransportError::Io(e));
                }
                None => {
                    tracing::info!(addr = %self.addr, "Telemetry connection closed");
                    return Ok(None);
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}
