//! The serve subcommand: boots the daemon in the foreground.
//!
//! Seeds the in-memory store from the JSON data file (or starts empty),
//! claims the PID file, binds the socket and serves until a shutdown
//! request or ctrl-c arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use url::Url;

use eventd_server::{
    PidFile, ServerConfig, SocketServer, default_pid_path, make_connection_handler,
    new_shared_state,
};
use eventd_store::MemoryStore;

use crate::error::{ClientError, ClientResult};

/// Options for the serve subcommand.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Socket to listen on.
    pub socket_path: PathBuf,
    /// JSON seed file, if any.
    pub data: Option<PathBuf>,
    /// Site root for permalinks.
    pub site_url: String,
    /// PID file path; defaults next to the socket.
    pub pid_file: Option<PathBuf>,
}

/// Runs the daemon until shutdown.
pub async fn run(options: ServeOptions) -> ClientResult<()> {
    let site_url = Url::parse(&options.site_url)
        .map_err(|err| ClientError::config(format!("invalid site url `{}`: {err}", options.site_url)))?;

    let store = match &options.data {
        Some(path) => MemoryStore::from_seed_file(site_url, path)?,
        None => MemoryStore::new(site_url),
    };
    info!(events = store.len(), "Store loaded");

    let pid_path = options.pid_file.clone().unwrap_or_else(default_pid_path);
    let _pidfile = PidFile::create(pid_path)?;

    let config = ServerConfig::new(&options.socket_path);
    let server = SocketServer::bind(config).await?;
    info!(socket = %options.socket_path.display(), "eventd serving");

    let state = new_shared_state(Arc::new(store));
    let handler = make_connection_handler(state.clone());

    let shutdown = async move {
        let requested = async {
            loop {
                if state.read().await.shutdown_requested() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        };
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        tokio::select! {
            _ = requested => info!("Shutdown requested over the socket"),
            _ = ctrl_c => info!("Interrupted"),
        }
    };

    server.run_until_shutdown(handler, shutdown).await?;
    info!("eventd stopped");
    Ok(())
}
