pub mod forwarder;
pub mod framing;
pub mod server;

pub use forwarder::{servfail_for, UpstreamForwarder};
pub use server::{bind_tcp_listener, StreamListener, StreamServer, TcpResponseWriter};
