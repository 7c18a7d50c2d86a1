//! PID file management.
//!
//! A [`PidFile`] keeps a second daemon instance from starting. It is
//! written on creation and removed on drop; a leftover file from a dead
//! process is replaced.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

/// PID file guard. Removes the file on drop.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Creates the PID file, rejecting a second running instance.
    pub fn create(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        if path.exists() {
            match Self::read_pid(&path) {
                Some(pid) if Self::is_process_running(pid) => {
                    return Err(ServerError::already_running(path.to_string_lossy()));
                }
                Some(pid) => {
                    warn!(path = %path.display(), pid, "Removing stale PID file");
                    fs::remove_file(&path)?;
                }
                None => {
                    warn!(path = %path.display(), "Removing invalid PID file");
                    fs::remove_file(&path)?;
                }
            }
        }

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let pid = process::id();
        let mut file = File::create(&path)?;
        writeln!(file, "{pid}")?;
        file.sync_all()?;

        info!(path = %path.display(), pid, "Created PID file");

        Ok(Self { path })
    }

    /// Returns the path to the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_pid(path: &Path) -> Option<u32> {
        let contents = fs::read_to_string(path).ok()?;
        contents.trim().parse().ok()
    }

    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        // signal 0 probes for existence without sending anything
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[cfg(not(unix))]
    fn is_process_running(_pid: u32) -> bool {
        true
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "Failed to remove PID file");
            } else {
                debug!(path = %self.path.display(), "Removed PID file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_and_remove() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        {
            let pidfile = PidFile::create(&pid_path).unwrap();
            assert!(pid_path.exists());
            assert_eq!(pidfile.path(), pid_path);

            let stored: u32 = fs::read_to_string(&pid_path)
                .unwrap()
                .trim()
                .parse()
                .unwrap();
            assert_eq!(stored, process::id());
        }

        assert!(!pid_path.exists());
    }

    #[test]
    fn rejects_running_instance() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        let _pidfile = PidFile::create(&pid_path).unwrap();
        let result = PidFile::create(&pid_path);
        assert!(matches!(result, Err(ServerError::AlreadyRunning { .. })));
    }

    #[test]
    fn replaces_invalid_pid_file() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("test.pid");

        fs::write(&pid_path, "not-a-pid").unwrap();
        let _pidfile = PidFile::create(&pid_path).unwrap();
        assert!(pid_path.exists());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let pid_path = dir.path().join("nested").join("test.pid");

        let _pidfile = PidFile::create(&pid_path).unwrap();
        assert!(pid_path.exists());
    }
}
