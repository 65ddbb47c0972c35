use super::console_endpoint::write_frame;
use super::console_messages::DownstreamMessage;
use crate::mission_control::CloseCode;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Outbound half of one subscriber connection. Cheap to clone; all clones
/// write through the same socket and never interleave frames.
#[derive(Clone)]
pub struct ConsoleMessenger {
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
}

impl ConsoleMessenger {
    pub fn new(writer: OwnedWriteHalf) -> Self { Self { writer: Arc::new(Mutex::new(Some(writer))) } }

    pub async fn send(&self, message: &DownstreamMessage) -> Result<(), std::io::Error> {
        let payload = serde_json::to_vec(message)?;
        let mut writer = self.writer.lock().await;
        match writer.as_mut() {
            Some(socket) => write_frame(socket, &payload).await,
            None => Err(std::io::Error::from(std::io::ErrorKind::NotConnected)),
        }
    }

    /// Sends the close frame and shuts the socket down. Later sends fail.
    pub async fn close(&self, code: CloseCode) -> Result<(), std::io::Error> {
        let result = self.send(&DownstreamMessage::close(code)).await;
        if let Some(mut socket) = self.writer.lock().await.take() {
            let _ = socket.shutdown().await;
        }
        result
    }
}
