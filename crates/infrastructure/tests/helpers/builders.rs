use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use std::str::FromStr;

pub struct QueryBuilder {
    id: u16,
    domain: String,
    record_type: RecordType,
    recursion_desired: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            id: 0x1234,
            domain: "example.com.".to_string(),
            record_type: RecordType::A,
            recursion_desired: true,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    pub fn build(self) -> Message {
        let mut message = Message::new(self.id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(self.recursion_desired);
        message.add_query(Query::query(
            Name::from_str(&self.domain).unwrap(),
            self.record_type,
        ));
        message
    }
}

pub fn query_for(id: u16, domain: &str) -> Message {
    QueryBuilder::new().id(id).domain(domain).build()
}

/// Empty NOERROR response carrying the query's id and questions.
pub fn echo_response(query: &Message) -> Message {
    let mut response = Message::new(query.id(), MessageType::Response, query.op_code());
    response.set_recursion_desired(query.recursion_desired());
    response.set_recursion_available(true);
    response.set_response_code(ResponseCode::NoError);
    for q in query.queries() {
        response.add_query(q.clone());
    }
    response
}

/// Response inflated with extra questions so its frame spans many small writes.
pub fn padded_response(query: &Message, extra_questions: usize) -> Message {
    let mut response = echo_response(query);
    for i in 0..extra_questions {
        response.add_query(Query::query(
            Name::from_str(&format!("pad{}.example.com.", i)).unwrap(),
            RecordType::TXT,
        ));
    }
    response
}

/// Length-prefixed wire bytes for `message`.
pub fn frame(message: &Message) -> Vec<u8> {
    let body = ferrous_relay_infrastructure::dns::framing::encode_message(message).unwrap();
    let mut out = (body.len() as u16).to_be_bytes().to_vec();
    out.extend_from_slice(&body);
    out
}
