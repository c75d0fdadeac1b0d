use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback read deadline for a stream connection.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-read deadline in seconds; 0 or absent means the 8 s default.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            read_timeout_secs: None,
            backlog: default_backlog(),
        }
    }
}

impl ServerConfig {
    pub fn listen_address(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }

    pub fn stream_config(&self) -> StreamServerConfig {
        StreamServerConfig {
            read_timeout: self.read_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Timeout policy handed to the stream server at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamServerConfig {
    pub read_timeout: Option<Duration>,
}

impl StreamServerConfig {
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Self {
            read_timeout: Some(read_timeout),
        }
    }

    /// Configured read timeout, or the default when unset or zero.
    pub fn effective_read_timeout(&self) -> Duration {
        match self.read_timeout {
            Some(timeout) if !timeout.is_zero() => timeout,
            _ => DEFAULT_READ_TIMEOUT,
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_backlog() -> i32 {
    1024
}
