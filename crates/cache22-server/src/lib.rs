//! TCP server for Cache22.
//!
//! Binds a listener, accepts clients until told to stop, and runs each
//! client's protocol loop in its own task. Whether clients see each other's
//! writes depends on the configured [`cache22_store::IsolationMode`].

pub mod config;
pub mod connection;
pub mod error;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, DEFAULT_BACKLOG, DEFAULT_PORT};
pub use connection::Closed;
pub use error::{ServerError, ServerResult};
pub use server::{Cache22Server, Listening};
pub use shutdown::{stop_channel, StopSignal, StopToken};
