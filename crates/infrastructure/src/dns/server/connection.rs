use super::stats::ConnectionStats;
use super::writer::TcpResponseWriter;
use crate::dns::framing::read_message;
use ferrous_relay_application::ports::{QueryDispatcher, ResponseWriter};
use ferrous_relay_domain::{DomainError, QueryContext};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use hickory_proto::op::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ConnectionPolicy {
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

/// Read loop for one accepted stream.
///
/// Returns once the peer disconnects, sends something undecodable, stays
/// silent past the read deadline, or `scope` is cancelled. Dispatches
/// still running at that point see `scope` cancelled and a closed writer.
pub(crate) async fn serve_connection<S>(
    stream: S,
    peer: SocketAddr,
    dispatcher: Arc<dyn QueryDispatcher>,
    scope: CancellationToken,
    policy: ConnectionPolicy,
    stats: Arc<ConnectionStats>,
) where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (mut reader, write_half) = tokio::io::split(stream);
    let writer = Arc::new(TcpResponseWriter::new(write_half, policy.write_timeout));

    loop {
        let read = tokio::select! {
            biased;
            _ = scope.cancelled() => {
                debug!(peer = %peer, "Connection cancelled");
                break;
            }
            read = read_with_deadline(&mut reader, policy.read_timeout) => read,
        };

        let query = match read {
            Ok(query) => query,
            Err(DomainError::ConnectionClosed) => {
                debug!(peer = %peer, "Client disconnected");
                break;
            }
            Err(e) => {
                debug!(peer = %peer, error = %e, "Read failed, closing connection");
                break;
            }
        };

        stats.query_received();

        let ctx = QueryContext::new(query, peer);
        let dispatcher = Arc::clone(&dispatcher);
        let scope = scope.clone();
        let writer: Arc<dyn ResponseWriter> = writer.clone();
        tokio::spawn(async move {
            dispatcher.serve(scope, ctx, writer).await;
        });
    }

    scope.cancel();
    writer.close().await;
}

/// One framed message, or [`DomainError::ReadTimeout`] once `deadline` passes.
async fn read_with_deadline<R>(reader: &mut R, deadline: Duration) -> Result<Message, DomainError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(deadline, read_message(reader))
        .await
        .unwrap_or(Err(DomainError::ReadTimeout(deadline)))
}
