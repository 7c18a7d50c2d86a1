//! Daemon: socket listener, request dispatch, pidfile.
//!
//! The daemon binds a Unix socket, answers eventd protocol requests from
//! a shared [`eventd_store::MemoryStore`] and shuts down on request.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use eventd_server::{ServerConfig, SocketServer, make_connection_handler, new_shared_state};
//! use eventd_store::MemoryStore;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new(Url::parse("https://example.org/")?));
//!     let state = new_shared_state(store);
//!     let server = SocketServer::bind(ServerConfig::default()).await?;
//!     server.run(make_connection_handler(state)).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod pidfile;
mod socket;

pub use config::{ServerConfig, default_pid_path, default_socket_path};
pub use error::{ServerError, ServerResult};
pub use handler::{
    RequestHandler, ServerState, SharedState, make_connection_handler, new_shared_state,
};
pub use pidfile::PidFile;
pub use socket::{Connection, SocketServer};
