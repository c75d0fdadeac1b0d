//! Ferrous Relay Domain Layer
pub mod config;
pub mod errors;
pub mod query_context;

pub use config::{CliOverrides, Config, ConfigError, StreamServerConfig};
pub use errors::DomainError;
pub use query_context::QueryContext;
