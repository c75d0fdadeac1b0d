//! Stream (length-prefixed) DNS server
//!
//! One task runs the accept loop, one task per connection runs the read
//! loop, and one task per decoded message runs the dispatch call.

mod connection;
pub mod listener;
mod stats;
mod stream_server;
mod writer;

pub use listener::{bind_tcp_listener, classify_accept_error, AcceptErrorKind, StreamListener};
pub use stats::ConnectionStats;
pub use stream_server::{StreamServer, ACCEPT_BACKOFF, WRITE_TIMEOUT};
pub use writer::TcpResponseWriter;
