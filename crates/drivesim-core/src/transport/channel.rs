use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{TransportError, TransportMessage, TransportSource};

/// Source fed through a tokio mpsc channel
///
/// The stream ends once every sender has been dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<TransportMessage>,
}

impl ChannelSource {
    /// Wrap an existing receiver
    pub fn new(rx: mpsc::Receiver<TransportMessage>) -> Self {
        Self { rx }
    }

    /// Create a bounded channel and its source
    pub fn channel(capacity: usize) -> (mpsc::Sender<TransportMessage>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl TransportSource for ChannelSource {
    async fn recv(&mut self) -> Result<Option<TransportMessage>, TransportError> {
        Ok(self.rx.recv().await)
    }

    fn describe(&self) -> String {
        "channel".to_string()
    }
}
