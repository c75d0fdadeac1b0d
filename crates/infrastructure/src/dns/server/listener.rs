use async_trait::async_trait;
use ferrous_relay_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

/// Source of accepted byte streams for [`super::StreamServer`].
#[async_trait]
pub trait StreamListener: Send + 'static {
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    async fn accept(&mut self) -> io::Result<(Self::Stream, SocketAddr)>;
}

#[async_trait]
impl StreamListener for TcpListener {
    type Stream = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = TcpListener::accept(self).await?;
        let _ = stream.set_nodelay(true);
        Ok((stream, peer))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptErrorKind {
    /// Retry after a short backoff.
    Transient,
    /// The listener is unusable; stop accepting.
    Fatal,
}

/// Sort an accept error into retryable or terminal.
///
/// Per-connection failures surfaced by accept (aborted handshakes, resets)
/// and descriptor or buffer exhaustion resolve on their own.
pub fn classify_accept_error(e: &io::Error) -> AcceptErrorKind {
    match e.kind() {
        io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::TimedOut => return AcceptErrorKind::Transient,
        _ => {}
    }

    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        if matches!(
            code,
            libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM
        ) {
            return AcceptErrorKind::Transient;
        }
    }

    AcceptErrorKind::Fatal
}

/// Bind a non-blocking TCP listener with address/port reuse enabled.
pub fn bind_tcp_listener(socket_addr: SocketAddr, backlog: i32) -> Result<TcpListener, DomainError> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
