use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Message too large: {0} bytes (max 65535)")]
    MessageTooLarge(usize),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Read timed out after {0:?}")]
    ReadTimeout(std::time::Duration),

    #[error("Write timed out after {0:?}")]
    WriteTimeout(std::time::Duration),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Listener failed: {0}")]
    ListenerFailed(String),

    #[error("Upstream {server} timed out")]
    UpstreamTimeout { server: String },

    #[error("Upstream {server} failed: {reason}")]
    UpstreamFailed { server: String, reason: String },

    #[error("Query cancelled")]
    Cancelled,
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::IoError(e.to_string())
    }
}
