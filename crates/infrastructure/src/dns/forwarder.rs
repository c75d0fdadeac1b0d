//! Built-in dispatcher that relays each query to one upstream over TCP.

use crate::dns::framing::{encode_message, read_message, write_frame};
use async_trait::async_trait;
use ferrous_relay_application::ports::{QueryDispatcher, ResponseWriter};
use ferrous_relay_domain::{DomainError, QueryContext};
use hickory_proto::op::{Message, MessageType, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct UpstreamForwarder {
    upstream: SocketAddr,
    timeout: Duration,
}

impl UpstreamForwarder {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        Self { upstream, timeout }
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    /// One query/response exchange on a fresh upstream connection.
    pub async fn exchange(&self, query: &Message) -> Result<Message, DomainError> {
        let bytes = encode_message(query)?;

        let mut stream = TcpStream::connect(self.upstream)
            .await
            .map_err(|e| self.upstream_failed(e))?;
        let _ = stream.set_nodelay(true);

        write_frame(&mut stream, &bytes)
            .await
            .map_err(|e| self.upstream_failed(e))?;
        let response = read_message(&mut stream)
            .await
            .map_err(|e| self.upstream_failed(e))?;

        if response.id() != query.id() {
            return Err(DomainError::UpstreamFailed {
                server: self.upstream.to_string(),
                reason: format!(
                    "response id {} does not match query id {}",
                    response.id(),
                    query.id()
                ),
            });
        }

        Ok(response)
    }

    fn upstream_failed(&self, e: impl std::fmt::Display) -> DomainError {
        DomainError::UpstreamFailed {
            server: self.upstream.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl QueryDispatcher for UpstreamForwarder {
    async fn serve(
        &self,
        scope: CancellationToken,
        mut ctx: QueryContext,
        writer: Arc<dyn ResponseWriter>,
    ) {
        if scope.is_cancelled() {
            return;
        }
        let query = match ctx.query() {
            Some(query) => query.clone(),
            None => return,
        };

        let result = tokio::select! {
            biased;
            _ = scope.cancelled() => Err(DomainError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.exchange(&query)) => {
                result.unwrap_or_else(|_| Err(DomainError::UpstreamTimeout {
                    server: self.upstream.to_string(),
                }))
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(DomainError::Cancelled) => {
                debug!(query = %ctx, "Connection closed before upstream answered");
                return;
            }
            Err(e) => {
                debug!(query = %ctx, error = %e, "Upstream exchange failed, answering SERVFAIL");
                servfail_for(&query)
            }
        };

        ctx.set_response(response);
        if let Some(response) = ctx.response() {
            if let Err(e) = writer.write(response).await {
                debug!(query = %ctx, error = %e, "Failed to write response");
            }
        }
    }
}

/// SERVFAIL reply echoing the query's id, opcode, RD flag and questions.
pub fn servfail_for(query: &Message) -> Message {
    let mut response = Message::new(query.id(), MessageType::Response, query.op_code());
    response.set_recursion_desired(query.recursion_desired());
    response.set_recursion_available(true);
    response.set_response_code(ResponseCode::ServFail);
    for question in query.queries() {
        response.add_query(question.clone());
    }
    response
}
