use crate::dns::framing::{encode_message, write_frame};
use async_trait::async_trait;
use ferrous_relay_application::ports::ResponseWriter;
use ferrous_relay_domain::DomainError;
use hickory_proto::op::Message;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

/// Write side of one connection, shared by every in-flight dispatch.
///
/// The mutex spans the whole deadline-bounded frame write, so frames from
/// concurrent writers never interleave. `None` means the connection closed
/// or a frame write failed partway.
pub struct TcpResponseWriter<W> {
    inner: Mutex<Option<W>>,
    write_timeout: Duration,
}

impl<W> TcpResponseWriter<W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(writer: W, write_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(Some(writer)),
            write_timeout,
        }
    }

    /// Shut down and release the write half; later writes fail.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(mut writer) = guard.take() {
            if let Ok(Err(e)) = tokio::time::timeout(self.write_timeout, writer.shutdown()).await {
                debug!(error = %e, "Stream shutdown failed");
            }
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

#[async_trait]
impl<W> ResponseWriter for TcpResponseWriter<W>
where
    W: AsyncWrite + Send + Unpin,
{
    async fn write(&self, response: &Message) -> Result<usize, DomainError> {
        let bytes = encode_message(response)?;

        let mut guard = self.inner.lock().await;
        let writer = guard.as_mut().ok_or(DomainError::ConnectionClosed)?;

        let error = match tokio::time::timeout(self.write_timeout, write_frame(writer, &bytes)).await {
            Ok(Ok(())) => return Ok(bytes.len() + 2),
            // Refused before any byte was written.
            Ok(Err(e @ DomainError::MessageTooLarge(_))) => return Err(e),
            Ok(Err(e)) => e,
            Err(_) => DomainError::WriteTimeout(self.write_timeout),
        };

        // Part of the frame may already be on the wire; the stream is out of sync.
        if let Some(mut writer) = guard.take() {
            let _ = tokio::time::timeout(self.write_timeout, writer.shutdown()).await;
        }
        debug!(error = %error, "Response write failed, write side closed");
        Err(error)
    }
}
