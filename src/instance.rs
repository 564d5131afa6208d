use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("another instance is already running")]
    AlreadyRunning,

    #[error("lock file error: {0}")]
    Io(#[from] io::Error),
}

/// Exclusive ownership of the per-user lock file. The file holds this
/// process's PID and is removed again when the lock is dropped.
pub struct InstanceLock {
    path: PathBuf,
}

/// Acquire the single-instance lock at `path`.
///
/// A leftover lock whose recorded PID is no longer alive (or whose content
/// is unparseable) is reclaimed before the attempt, so a crashed previous
/// instance never wedges startup.
pub fn acquire(path: &Path) -> Result<InstanceLock, InstanceError> {
    reclaim_stale_lock(path);

    // create_new maps to O_CREAT | O_EXCL, so two racing invocations cannot
    // both end up owning the file.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(InstanceError::AlreadyRunning);
        }
        Err(err) => return Err(err.into()),
    };

    write!(file, "{}", std::process::id())?;
    Ok(InstanceLock {
        path: path.to_path_buf(),
    })
}

fn reclaim_stale_lock(path: &Path) {
    if !path.exists() {
        return;
    }

    match read_lock_pid(path) {
        Some(pid) if process_alive(pid) => {}
        Some(pid) => {
            log::warn!("Removing stale lock file (process {pid} no longer running)");
            if let Err(err) = fs::remove_file(path) {
                log::warn!("Failed to remove stale lock file: {err}");
            }
        }
        None => {
            log::warn!("Removing invalid lock file");
            if let Err(err) = fs::remove_file(path) {
                log::warn!("Failed to remove invalid lock file: {err}");
            }
        }
    }
}

fn read_lock_pid(path: &Path) -> Option<i32> {
    let pid = fs::read_to_string(path).ok()?.trim().parse().ok()?;
    if pid > 0 {
        Some(pid)
    } else {
        None
    }
}

#[cfg(unix)]
fn process_alive(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // Signal 0 probes for existence without delivering anything.
    kill(Pid::from_raw(pid), None).is_ok()
}

#[cfg(not(unix))]
fn process_alive(_pid: i32) -> bool {
    true
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            log::debug!("Failed to remove lock file: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("discover-overlay.pid")
    }

    /// PID of a process that has already exited.
    #[cfg(unix)]
    fn dead_pid() -> i32 {
        let mut child = std::process::Command::new("true")
            .spawn()
            .expect("spawn true");
        let pid = child.id() as i32;
        child.wait().expect("wait for child");
        pid
    }

    #[test]
    fn acquire_writes_own_pid() {
        let dir = tempfile::tempdir().unwrap();
        let path = lock_path(&dir);

        let _lock = acquire(&path).expect("first acquire succeeds");
        let recorded = fs::read_to_string(&path).unwrap();
        assert_eq!(recorded.trim(), std::process::id().to_string());
    }

    #[test]
    fn second_acquire_reports_already_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = lock_path(&dir);

        let _lock = acquire(&path).expect("first acquire succeeds");
        assert!(matches!(
            acquire(&path),
            Err(InstanceError::AlreadyRunning)
        ));
    }

    #[test]
    fn drop_releases_the_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = lock_path(&dir);

        let lock = acquire(&path).expect("first acquire succeeds");
        drop(lock);
        assert!(!path.exists());

        let _lock = acquire(&path).expect("acquire after release succeeds");
    }

    #[cfg(unix)]
    #[test]
    fn stale_lock_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let path = lock_path(&dir);

        fs::write(&path, dead_pid().to_string()).unwrap();
        let _lock = acquire(&path).expect("stale lock reclaimed");
        let recorded = fs::read_to_string(&path).unwrap();
        assert_eq!(recorded.trim(), std::process::id().to_string());
    }

    #[test]
    fn garbage_lock_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let path = lock_path(&dir);

        fs::write(&path, "not a pid").unwrap();
        assert!(acquire(&path).is_ok());
    }
}
