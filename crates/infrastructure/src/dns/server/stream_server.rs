use super::connection::{serve_connection, ConnectionPolicy};
use super::listener::{classify_accept_error, AcceptErrorKind, StreamListener};
use super::stats::ConnectionStats;
use ferrous_relay_application::ports::QueryDispatcher;
use ferrous_relay_domain::{DomainError, StreamServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Deadline for writing one response frame.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Pause before accepting again after a transient accept error.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept loop over a [`StreamListener`].
///
/// The server owns the listener and drops it when [`StreamServer::run`]
/// returns. Connection tasks are detached: after a fatal accept error they
/// keep serving until their own read fails. Cancelling the shutdown token
/// stops the accept loop and every connection derived from it.
pub struct StreamServer<L: StreamListener> {
    listener: L,
    policy: ConnectionPolicy,
    accept_backoff: Duration,
    shutdown: CancellationToken,
    stats: Arc<ConnectionStats>,
}

impl<L: StreamListener> StreamServer<L> {
    pub fn new(listener: L, config: &StreamServerConfig) -> Self {
        Self {
            listener,
            policy: ConnectionPolicy {
                read_timeout: config.effective_read_timeout(),
                write_timeout: WRITE_TIMEOUT,
            },
            accept_backoff: ACCEPT_BACKOFF,
            shutdown: CancellationToken::new(),
            stats: Arc::new(ConnectionStats::new()),
        }
    }

    /// Use `token` as the root cancellation signal.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stats(&self) -> Arc<ConnectionStats> {
        Arc::clone(&self.stats)
    }

    pub fn read_timeout(&self) -> Duration {
        self.policy.read_timeout
    }

    /// Accept until shutdown (`Ok`) or a fatal listener error (`Err`).
    pub async fn run(mut self, dispatcher: Arc<dyn QueryDispatcher>) -> Result<(), DomainError> {
        info!(
            read_timeout = ?self.policy.read_timeout,
            write_timeout = ?self.policy.write_timeout,
            "Stream server accepting connections"
        );

        loop {
            let accepted = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Stream server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => self.spawn_connection(stream, peer, &dispatcher),
                Err(e) => match classify_accept_error(&e) {
                    AcceptErrorKind::Transient => {
                        warn!(error = %e, backoff = ?self.accept_backoff, "Temporary accept error, retrying");
                        tokio::select! {
                            biased;
                            _ = self.shutdown.cancelled() => {
                                info!("Stream server shutting down");
                                return Ok(());
                            }
                            _ = tokio::time::sleep(self.accept_backoff) => {}
                        }
                    }
                    AcceptErrorKind::Fatal => {
                        error!(error = %e, "Listener failed, stream server stopped");
                        return Err(DomainError::ListenerFailed(e.to_string()));
                    }
                },
            }
        }
    }

    fn spawn_connection(
        &self,
        stream: L::Stream,
        peer: SocketAddr,
        dispatcher: &Arc<dyn QueryDispatcher>,
    ) {
        let active = self.stats.connection_opened();
        debug!(peer = %peer, active, "Connection accepted");

        let scope = self.shutdown.child_token();
        let dispatcher = Arc::clone(dispatcher);
        let stats = Arc::clone(&self.stats);
        let policy = self.policy;

        tokio::spawn(async move {
            serve_connection(stream, peer, dispatcher, scope, policy, Arc::clone(&stats)).await;
            let active = stats.connection_closed();
            debug!(peer = %peer, active, "Connection closed");
        });
    }
}
