//! Ferrous Relay Application Layer
//!
//! Ports at the boundary between the stream transport and the resolution
//! pipeline. The transport owns connections and framing; everything that
//! turns a query into an answer sits behind [`ports::QueryDispatcher`].
pub mod ports;
