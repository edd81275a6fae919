//! WebSocket transport
//!
//! The rig's access point serves telemetry at `ws://192.168.4.1:8765/ws`,
//! one text message per frame.

use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::{TransportError, TransportMessage, TransportSource};
use crate::config::TransportConfig;

/// Telemetry source reading WebSocket messages
pub struct WebSocketSource {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
    max_message_len: usize,
}

impl WebSocketSource {
    /// Connect using the transport settings
    pub async fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::connect_with_timeout(
            config.address.trim(),
            config.connect_timeout(),
            config.max_line_length,
        )
        .await
    }

    /// Connect to a `ws://` URL with an explicit timeout
    ///
    /// The timeout covers the TCP connect and the HTTP upgrade.
    pub async fn connect_with_timeout(
        url: &str,
        timeout: Duration,
        max_message_len: usize,
    ) -> Result<Self, TransportError> {
        tracing::debug!(
            url = %url,
            timeout_ms = timeout.as_millis(),
            "Connecting to telemetry WebSocket"
        );

        let (stream, response) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url))
            .await
            .map_err(|_| {
                tracing::error!(url = %url, "Telemetry WebSocket connection timed out");
                TransportError::Timeout
            })?
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Telemetry WebSocket handshake failed");
                TransportError::ConnectFailed {
                    addr: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!(
            url = %url,
            status = response.status().as_u16(),
            "Telemetry WebSocket opened"
        );
        Ok(Self {
            stream,
            url: url.to_string(),
            max_message_len,
        })
    }

    /// URL this source reads from
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TransportSource for WebSocketSource {
    async fn recv(&mut self) -> Result<Option<TransportMessage>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if text.len() > self.max_message_len {
                        tracing::warn!(url = %self.url, len = text.len(), "Oversized message discarded");
                        continue;
                    }
                    if text.trim().is_empty() {
                        continue;
                    }
                    tracing::trace!(url = %self.url, text = %text, "Received message");
                    return Ok(Some(TransportMessage::Text(text)));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    if bytes.len() > self.max_message_len {
                        tracing::warn!(url = %self.url, len = bytes.len(), "Oversized message discarded");
                        continue;
                    }
                    return Ok(Some(TransportMessage::Bytes(bytes)));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(url = %self.url, frame = ?frame, "Telemetry WebSocket closed by peer");
                    return Ok(None);
                }
                // Ping/pong are answered by the protocol layer
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    tracing::info!(url = %self.url, "Telemetry WebSocket closed");
                    return Ok(None);
                }
                Some(Err(e)) => {
                    tracing::error!(url = %self.url, error = %e, "Telemetry WebSocket error");
                    return Err(TransportError::WebSocket(e.to_string()));
                }
            }
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
