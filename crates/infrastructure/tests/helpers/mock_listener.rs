use async_trait::async_trait;
use ferrous_relay_infrastructure::dns::StreamListener;
use std::io;
use std::net::SocketAddr;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;

type Accepted = io::Result<(DuplexStream, SocketAddr)>;

/// Listener fed by the test: each pushed item is one `accept` outcome.
pub struct MockListener {
    rx: mpsc::UnboundedReceiver<Accepted>,
}

#[derive(Clone)]
pub struct MockListenerHandle {
    tx: mpsc::UnboundedSender<Accepted>,
}

impl MockListener {
    pub fn new() -> (Self, MockListenerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, MockListenerHandle { tx })
    }
}

impl MockListenerHandle {
    /// Queue a connection from `peer`; returns the client end.
    pub fn connect(&self, peer: SocketAddr, buffer: usize) -> DuplexStream {
        let (client, server) = tokio::io::duplex(buffer);
        self.tx.send(Ok((server, peer))).unwrap();
        client
    }

    pub fn fail(&self, kind: io::ErrorKind) {
        self.tx.send(Err(io::Error::from(kind))).unwrap();
    }
}

#[async_trait]
impl StreamListener for MockListener {
    type Stream = DuplexStream;

    async fn accept(&mut self) -> io::Result<(DuplexStream, SocketAddr)> {
        match self.rx.recv().await {
            Some(accepted) => accepted,
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "listener closed")),
        }
    }
}
