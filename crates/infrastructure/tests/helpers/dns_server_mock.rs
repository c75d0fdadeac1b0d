use ferrous_relay_infrastructure::dns::framing::{encode_message, read_message, write_frame};
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::builders::echo_response;

#[derive(Clone, Copy)]
pub enum UpstreamBehavior {
    /// Answer every query with one A record.
    Answer(Ipv4Addr),
    /// Read the query and never reply.
    Silent,
    /// Reply with a different transaction id.
    WrongId,
    /// Reply with a frame that does not decode as DNS.
    Garbage,
}

/// TCP resolver on 127.0.0.1 that speaks length-prefixed DNS.
pub struct MockTcpUpstream {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTcpUpstream {
    pub async fn start(behavior: UpstreamBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let counter = queries.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let counter = counter.clone();
                        tokio::spawn(async move {
                            while let Ok(query) = read_message(&mut stream).await {
                                counter.fetch_add(1, Ordering::SeqCst);
                                let reply = match behavior {
                                    UpstreamBehavior::Answer(ip) => encode_message(&Self::answer(&query, ip)),
                                    UpstreamBehavior::Silent => std::future::pending().await,
                                    UpstreamBehavior::WrongId => {
                                        let mut response = echo_response(&query);
                                        response.set_id(query.id().wrapping_add(1));
                                        encode_message(&response)
                                    }
                                    UpstreamBehavior::Garbage => Ok(vec![0xde, 0xad, 0xbe]),
                                };
                                let Ok(reply) = reply else { break };
                                if write_frame(&mut stream, &reply).await.is_err() {
                                    break;
                                }
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn answer(query: &Message, ip: Ipv4Addr) -> Message {
        let mut response = echo_response(query);
        if let Some(question) = query.queries().first() {
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                60,
                RData::A(A(ip)),
            ));
        }
        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTcpUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
