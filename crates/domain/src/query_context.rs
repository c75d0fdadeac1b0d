//! Per-message query/response context
//!
//! One context is created for every framed message read off a connection.
//! It carries the decoded query and the peer address into the dispatch
//! pipeline and carries the pipeline's answer back out to the write path.

use hickory_proto::op::Message;
use std::fmt;
use std::net::SocketAddr;

/// Query/response pair plus the address of the connection that sent it.
///
/// Messages are owned values, so a cloned context never shares message
/// state with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    query: Option<Message>,
    response: Option<Message>,
    peer: SocketAddr,
}

impl QueryContext {
    /// Context for a freshly decoded query; no response yet.
    pub fn new(query: Message, peer: SocketAddr) -> Self {
        Self {
            query: Some(query),
            response: None,
            peer,
        }
    }

    /// Context with neither query nor response assigned.
    pub fn with_peer(peer: SocketAddr) -> Self {
        Self {
            query: None,
            response: None,
            peer,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn query(&self) -> Option<&Message> {
        self.query.as_ref()
    }

    pub fn query_mut(&mut self) -> Option<&mut Message> {
        self.query.as_mut()
    }

    pub fn set_query(&mut self, query: Message) {
        self.query = Some(query);
    }

    pub fn response(&self) -> Option<&Message> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Message> {
        self.response.as_mut()
    }

    pub fn set_response(&mut self, response: Message) {
        self.response = Some(response);
    }

    pub fn take_response(&mut self) -> Option<Message> {
        self.response.take()
    }

    /// Fully independent duplicate of this context.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Question section and peer, e.g. `[example.com. IN A], from: 10.0.0.1:5353`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some(query) = &self.query {
            for (i, question) in query.queries().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", question)?;
            }
        }
        write!(f, "], from: {}", self.peer)
    }
}
