#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod dns_server_mock;
pub mod mock_dispatcher;
pub mod mock_listener;

pub use builders::{echo_response, frame, padded_response, query_for, QueryBuilder};
pub use dns_server_mock::{MockTcpUpstream, UpstreamBehavior};
pub use mock_dispatcher::{DispatchMode, MockDispatcher};
pub use mock_listener::{MockListener, MockListenerHandle};
