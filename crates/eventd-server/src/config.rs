//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the Unix socket.
    pub socket_path: PathBuf,

    /// JSON seed file the store loads at startup, if any.
    pub data_path: Option<PathBuf>,

    /// Site root permalinks resolve under.
    pub site_url: Url,

    /// Connection timeout.
    pub connection_timeout: Duration,

    /// Maximum concurrent connections.
    pub max_connections: usize,

    /// Whether to remove a stale socket on startup.
    pub cleanup_stale_socket: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            data_path: None,
            site_url: Url::parse("http://localhost/").expect("valid default site url"),
            connection_timeout: Duration::from_secs(30),
            max_connections: 64,
            cleanup_stale_socket: true,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration with the given socket path.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Default::default()
        }
    }

    /// Builder: set the seed data file.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Builder: set the permalink site root.
    pub fn with_site_url(mut self, site_url: Url) -> Self {
        self.site_url = site_url;
        self
    }

    /// Builder: set the connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Builder: set the max concurrent connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Builder: set stale-socket cleanup.
    pub fn with_cleanup_stale_socket(mut self, cleanup: bool) -> Self {
        self.cleanup_stale_socket = cleanup;
        self
    }
}

/// Returns the default socket path.
///
/// Uses `$XDG_RUNTIME_DIR/eventd.sock` if available, otherwise falls back
/// to `/tmp/eventd-$UID.sock`.
pub fn default_socket_path() -> PathBuf {
    runtime_path("eventd.sock", "eventd-{uid}.sock")
}

/// Returns the default PID file path.
pub fn default_pid_path() -> PathBuf {
    runtime_path("eventd.pid", "eventd-{uid}.pid")
}

fn runtime_path(runtime_name: &str, tmp_pattern: &str) -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join(runtime_name)
    } else {
        #[cfg(unix)]
        let uid = unsafe { libc::getuid() };
        #[cfg(not(unix))]
        let uid = 0;
        PathBuf::from("/tmp").join(tmp_pattern.replace("{uid}", &uid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert!(config.socket_path.to_string_lossy().contains("eventd"));
        assert!(config.data_path.is_none());
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
        assert_eq!(config.max_connections, 64);
        assert!(config.cleanup_stale_socket);
    }

    #[test]
    fn builder_methods() {
        let config = ServerConfig::new("/custom/path.sock")
            .with_data_path("/var/lib/eventd/events.json")
            .with_site_url(Url::parse("https://example.org/").unwrap())
            .with_connection_timeout(Duration::from_secs(5))
            .with_max_connections(8)
            .with_cleanup_stale_socket(false);

        assert_eq!(config.socket_path, PathBuf::from("/custom/path.sock"));
        assert_eq!(
            config.data_path,
            Some(PathBuf::from("/var/lib/eventd/events.json"))
        );
        assert_eq!(config.site_url.as_str(), "https://example.org/");
        assert_eq!(config.max_connections, 8);
        assert!(!config.cleanup_stale_socket);
    }

    #[test]
    fn default_paths_name_the_daemon() {
        assert!(default_socket_path().to_string_lossy().ends_with(".sock"));
        assert!(default_pid_path().to_string_lossy().ends_with(".pid"));
    }
}
