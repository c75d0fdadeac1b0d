use async_trait::async_trait;
use ferrous_relay_domain::DomainError;
use hickory_proto::op::Message;

/// Sends one decoded response back on the connection that produced the query.
#[async_trait]
pub trait ResponseWriter: Send + Sync {
    /// Encode and write `response`; returns the number of bytes put on the wire.
    async fn write(&self, response: &Message) -> Result<usize, DomainError>;
}
