//! Socket client for talking to the daemon.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, warn};
use uuid::Uuid;

use eventd_protocol::{
    Envelope, ProtocolError, Request, Response, check_frame_len, decode_payload, encode_message,
};

use crate::error::{ClientError, ClientResult};

/// One-request-per-connection client for the daemon socket.
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    /// Creates a client for the given socket path.
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    /// Sends one request and awaits its response.
    pub async fn request(&self, request: Request) -> ClientResult<Response> {
        let mut stream = match tokio::time::timeout(
            self.timeout,
            UnixStream::connect(&self.socket_path),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(ClientError::Connect {
                    path: self.socket_path.display().to_string(),
                    source: err,
                });
            }
            Err(_) => {
                return Err(ProtocolError::Timeout {
                    operation: "connect to daemon".to_string(),
                }
                .into());
            }
        };

        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, ?request, "Sending request");

        let envelope = Envelope::request(request_id.clone(), request);
        let frame = encode_message(&envelope)?;

        match tokio::time::timeout(self.timeout, stream.write_all(&frame)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProtocolError::Timeout {
                    operation: "write request".to_string(),
                }
                .into());
            }
        }

        let mut len_buf = [0u8; 4];
        match tokio::time::timeout(self.timeout, stream.read_exact(&mut len_buf)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                return Err(ProtocolError::Timeout {
                    operation: "read response length".to_string(),
                }
                .into());
            }
        }

        let len = check_frame_len(u32::from_be_bytes(len_buf))?;
        let mut payload = vec![0u8; len];
        match tokio::time::timeout(self.timeout, stream.read_exact(&mut payload)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => {
                return Err(ProtocolError::Timeout {
                    operation: "read response payload".to_string(),
                }
                .into());
            }
        }

        let response: Envelope<Response> = decode_payload(&payload)?;
        if response.request_id != request_id {
            warn!(
                expected = %request_id,
                received = %response.request_id,
                "Response correlation id mismatch"
            );
        }

        Ok(response.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventd_server::{ServerConfig, SocketServer};
    use tempfile::tempdir;

    #[tokio::test]
    async fn request_roundtrip() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("test.sock");

        let server = SocketServer::bind(ServerConfig::new(&socket_path))
            .await
            .unwrap();

        let server_task = tokio::spawn(async move {
            let mut conn = server.accept().await.unwrap();
            let envelope = conn.read_request().await.unwrap().unwrap();
            assert_eq!(envelope.payload, Request::Ping);
            conn.respond(&envelope.request_id, Response::Pong)
                .await
                .unwrap();
            // keep the listener alive until the client is done
            server
        });

        let client = DaemonClient::new(&socket_path, Duration::from_secs(5));
        let response = client.request(Request::Ping).await.unwrap();
        assert_eq!(response, Response::Pong);

        drop(server_task.await.unwrap());
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("absent.sock");

        let client = DaemonClient::new(&socket_path, Duration::from_secs(1));
        let err = client.request(Request::Ping).await.unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }));
    }
}
