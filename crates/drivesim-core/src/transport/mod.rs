//! Transport sources
//!
//! Abstraction for the always-open connection that delivers telemetry:
//! - [`WebSocketSource`]: the rig's own `ws://` endpoint
//! - [`TcpLineSource`]: newline-delimited text over TCP, for bridges
//! - [`ChannelSource`]: an in-process channel (embedding hosts, demo, tests)
//!
//! Reconnection is the host's business; a source that ends stays ended.

mod channel;
mod tcp;
mod ws;

pub use channel::ChannelSource;
pub use tcp::TcpLineSource;
pub use ws::WebSocketSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TransportConfig;
use crate::protocol::TelemetryCommand;

/// One message delivered by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportMessage {
    /// Text: hex byte tokens or a JSON command object
    Text(String),
    /// Raw frame bytes
    Bytes(Vec<u8>),
    /// An already-structured command
    Command(TelemetryCommand),
}

/// Errors that can occur on a transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// The connection or handshake was refused
    #[error("Connection to {addr} failed: {reason}")]
    ConnectFailed {
        /// Address or URL that was dialled
        addr: String,
        /// Underlying failure
        reason: String,
    },

    /// The connection did not open in time
    #[error("Connection timeout")]
    Timeout,

    /// WebSocket protocol failure after the connection opened
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a configured address points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// A `ws://` or `wss://` URL
    WebSocket(&'a str),
    /// A `host:port` serving newline-delimited text (`tcp://` prefix optional)
    Tcp(&'a str),
}

impl<'a> Endpoint<'a> {
    /// Classify an address by its scheme
    pub fn parse(address: &'a str) -> Self {
        let address = address.trim();
        if address.starts_with("ws://") || address.starts_with("wss://") {
            Endpoint::WebSocket(address)
        } else {
            Endpoint::Tcp(address.strip_prefix("tcp://").unwrap_or(address))
        }
    }
}

/// Open the source the configured address points at
pub async fn connect(config: &TransportConfig) -> Result<Box<dyn TransportSource>, TransportError> {
    let timeout = config.connect_timeout();
    match Endpoint::parse(&config.address) {
        Endpoint::WebSocket(url) => Ok(Box::new(
            WebSocketSource::connect_with_timeout(url, timeout, config.max_line_length).await?,
        )),
        Endpoint::Tcp(addr) => Ok(Box::new(
            TcpLineSource::connect_with_timeout(addr, timeout, config.max_line_length).await?,
        )),
    }
}

/// A push-driven source of telemetry messages
#[async_trait]
pub trait TransportSource: Send {
    /// Wait for the next message
    ///
    /// `Ok(None)` means the stream has ended. Implementations must be cancel
    /// safe: dropping the future before it resolves loses no message.
    async fn recv(&mut self) -> Result<Option<TransportMessage>, TransportError>;

    /// Label for logging
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: TransportSource + ?Sized> TransportSource for Box<T> {
    async fn recv(&mut self) -> Result<Option<TransportMessage>, TransportError> {
        (**self).recv().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
