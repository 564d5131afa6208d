use std::fs;
use std::path::Path;
use std::sync::mpsc;

use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Overwrite the command file with a single argument line.
///
/// Non-owning invocations call this instead of starting up; the running
/// instance notices the change through its watcher and dispatches the line.
pub fn forward(path: &Path, line: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    fs::write(path, line).map_err(|err| err.to_string())
}

/// First line of the command file, if there is one.
///
/// Returns None both when the file cannot be read (deleted between
/// notification and read) and when it is empty; the caller treats either
/// as "nothing to dispatch".
pub fn read_first_line(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    contents.lines().next().map(|line| line.to_string())
}

/// Watch the command file and invoke `on_command` with the first line of
/// its content whenever it changes.
///
/// The watch is placed on the parent directory so both in-place overwrites
/// and replace-by-rename land here. The inotify handle lives on a dedicated
/// thread for the rest of the process lifetime.
pub fn spawn_watcher(
    path: &Path,
    on_command: impl Fn(String) + Send + 'static,
) -> Result<(), String> {
    let dir = path
        .parent()
        .ok_or_else(|| "command file has no parent directory".to_string())?
        .to_path_buf();

    // Make sure the file exists so a first forward is only ever an overwrite,
    // but never clobber a line that is already waiting there.
    if !path.exists() {
        fs::write(path, "").map_err(|err| err.to_string())?;
    }

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .map_err(|err| err.to_string())?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|err| err.to_string())?;

    let rpc_path = path.to_path_buf();
    std::thread::spawn(move || {
        let _watcher = watcher;
        for res in rx {
            match res {
                Ok(event) if touches_command_file(&event, &rpc_path) => {
                    match read_first_line(&rpc_path) {
                        Some(line) => on_command(line),
                        None => log::debug!("Command file empty or unreadable, ignoring"),
                    }
                }
                Ok(_) => {}
                Err(err) => log::debug!("Command watch error: {err}"),
            }
        }
    });

    Ok(())
}

fn touches_command_file(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Receiver;
    use std::time::{Duration, Instant};

    #[test]
    fn forward_writes_exactly_the_argument_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discover-overlay.rpc");

        forward(&path, "--configure-voice").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "--configure-voice");

        // A later invocation replaces the content wholesale.
        forward(&path, "--close").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "--close");
    }

    #[test]
    fn read_first_line_ignores_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discover-overlay.rpc");

        fs::write(&path, "--configure-voice\n--close\ntrailing").unwrap();
        assert_eq!(
            read_first_line(&path).as_deref(),
            Some("--configure-voice")
        );
    }

    #[test]
    fn read_first_line_swallows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.rpc");
        assert_eq!(read_first_line(&path), None);
    }

    #[test]
    fn read_first_line_of_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discover-overlay.rpc");
        fs::write(&path, "").unwrap();
        assert_eq!(read_first_line(&path), None);
    }

    /// Drain watcher callbacks until `expected` shows up. Overwrites can
    /// surface as more than one filesystem event, so duplicates of earlier
    /// lines are tolerated.
    fn wait_for(rx: &Receiver<String>, expected: &str) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .expect("timed out waiting for watcher callback");
            let line = rx.recv_timeout(remaining).expect("watcher callback");
            if line == expected {
                return;
            }
        }
    }

    #[test]
    fn watcher_dispatches_sequential_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discover-overlay.rpc");

        let (tx, rx) = mpsc::channel();
        spawn_watcher(&path, move |line| {
            let _ = tx.send(line);
        })
        .unwrap();

        forward(&path, "--configure-voice").unwrap();
        wait_for(&rx, "--configure-voice");

        forward(&path, "--configure-text").unwrap();
        wait_for(&rx, "--configure-text");
    }

    #[test]
    fn watcher_reports_only_the_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discover-overlay.rpc");

        let (tx, rx) = mpsc::channel();
        spawn_watcher(&path, move |line| {
            let _ = tx.send(line);
        })
        .unwrap();

        fs::write(&path, "--configure-general\n--close").unwrap();
        wait_for(&rx, "--configure-general");
    }
}
