//! Unix socket listener for IPC.
//!
//! Async accept loop over a Unix socket, handing each client connection to
//! a handler future. Frames follow the eventd protocol: 4-byte big-endian
//! length prefix, JSON payload.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use eventd_protocol::{
    Envelope, ProtocolError, Request, Response, check_frame_len, decode_payload, encode_message,
};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Unix socket server for handling client connections.
pub struct SocketServer {
    config: ServerConfig,
    listener: UnixListener,
    connection_semaphore: Arc<Semaphore>,
}

impl SocketServer {
    /// Binds to the socket path in the configuration.
    ///
    /// With `cleanup_stale_socket` set, a dead socket file left by a
    /// crashed daemon is removed before binding; a live one is an error.
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        let socket_path = &config.socket_path;

        if let Some(parent) = socket_path.parent()
            && !parent.exists()
        {
            return Err(ServerError::socket_path_invalid(
                parent.to_string_lossy().to_string(),
            ));
        }

        if socket_path.exists() {
            if !config.cleanup_stale_socket {
                return Err(ServerError::socket_in_use(
                    socket_path.to_string_lossy().to_string(),
                ));
            }
            match UnixStream::connect(socket_path).await {
                Ok(_) => {
                    return Err(ServerError::socket_in_use(
                        socket_path.to_string_lossy().to_string(),
                    ));
                }
                Err(_) => {
                    info!(path = %socket_path.display(), "Removing stale socket");
                    std::fs::remove_file(socket_path)?;
                }
            }
        }

        let listener = UnixListener::bind(socket_path)?;
        info!(path = %socket_path.display(), "Socket server listening");

        let connection_semaphore = Arc::new(Semaphore::new(config.max_connections));

        Ok(Self {
            config,
            listener,
            connection_semaphore,
        })
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Accepts a single connection.
    pub async fn accept(&self) -> ServerResult<Connection> {
        let permit = self.connection_semaphore.clone().acquire_owned().await;
        let permit = permit.expect("semaphore should not be closed");

        let (stream, _addr) = self.listener.accept().await?;
        debug!("Accepted new connection");

        Ok(Connection {
            stream,
            timeout: self.config.connection_timeout,
            _permit: permit,
        })
    }

    /// Runs the accept loop, spawning the handler for each connection.
    pub async fn run<F, Fut>(&self, handler: F) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        loop {
            match self.accept().await {
                Ok(connection) => {
                    tokio::spawn(handler(connection));
                }
                Err(e) => {
                    // keep accepting; one bad accept is not fatal
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Runs the accept loop until the shutdown future completes.
    pub async fn run_until_shutdown<F, Fut, S>(&self, handler: F, shutdown: S) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
        S: std::future::Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.run(handler) => result,
            _ = shutdown => {
                info!("Shutdown signal received");
                Ok(())
            }
        }
    }
}

impl Drop for SocketServer {
    fn drop(&mut self) {
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!(
                    path = %self.config.socket_path.display(),
                    error = %e,
                    "Failed to remove socket file"
                );
            } else {
                debug!(path = %self.config.socket_path.display(), "Removed socket file");
            }
        }
    }
}

/// A client connection to the daemon.
pub struct Connection {
    stream: UnixStream,
    timeout: std::time::Duration,
    _permit: tokio::sync::OwnedSemaphorePermit,
}

impl Connection {
    /// Reads a request envelope from the connection.
    ///
    /// Returns `Ok(None)` on clean EOF.
    pub async fn read_request(&mut self) -> ServerResult<Option<Envelope<Request>>> {
        let mut len_buf = [0u8; 4];
        match tokio::time::timeout(self.timeout, self.stream.read_exact(&mut len_buf)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None);
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(ServerError::Protocol(ProtocolError::Timeout {
                    operation: "read request length".to_string(),
                }));
            }
        }

        let len = check_frame_len(u32::from_be_bytes(len_buf)).map_err(ServerError::Protocol)?;

        let mut payload = vec![0u8; len];
        match tokio::time::timeout(self.timeout, self.stream.read_exact(&mut payload)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(ServerError::Protocol(ProtocolError::Timeout {
                    operation: "read request payload".to_string(),
                }));
            }
        }

        let envelope: Envelope<Request> =
            decode_payload(&payload).map_err(ServerError::Protocol)?;

        if !envelope.is_compatible() {
            warn!(
                version = %envelope.protocol_version,
                "Incompatible protocol version"
            );
        }

        Ok(Some(envelope))
    }

    /// Writes a response envelope to the connection.
    pub async fn write_response(&mut self, envelope: &Envelope<Response>) -> ServerResult<()> {
        let frame = encode_message(envelope).map_err(ServerError::Protocol)?;

        match tokio::time::timeout(self.timeout, self.stream.write_all(&frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ServerError::Protocol(ProtocolError::Timeout {
                operation: "write response".to_string(),
            })),
        }
    }

    /// Sends a response for the given request id.
    pub async fn respond(
        &mut self,
        request_id: impl Into<String>,
        response: Response,
    ) -> ServerResult<()> {
        let envelope = Envelope::response(request_id, response);
        self.write_response(&envelope).await
    }
}
