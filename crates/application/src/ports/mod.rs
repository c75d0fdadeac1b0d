mod query_dispatcher;
mod response_writer;

pub use query_dispatcher::QueryDispatcher;
pub use response_writer::ResponseWriter;

// Re-export for convenience
pub use ferrous_relay_domain::QueryContext;
pub use tokio_util::sync::CancellationToken;
