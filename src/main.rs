mod app_tray;
mod cli;
mod commands;
mod connector;
mod instance;
mod overlay;
mod rpc;
mod settings;
mod settings_windows;
mod shell;
mod state;
mod storage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_dir = match storage::ensure_config_dir() {
        Ok(dir) => dir,
        Err(err) => {
            log::error!("Cannot create config directory: {err}");
            std::process::exit(1);
        }
    };
    let lock_path = config_dir.join(storage::LOCK_FILE);
    let rpc_path = config_dir.join(storage::RPC_FILE);

    let arg_line = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    let lock = match instance::acquire(&lock_path) {
        Ok(lock) => lock,
        Err(instance::InstanceError::AlreadyRunning) => {
            log::warn!("Discover overlay is already running");
            if let Err(err) = rpc::forward(&rpc_path, &arg_line) {
                log::error!("Failed to forward command: {err}");
                std::process::exit(1);
            }
            log::warn!("Sent RPC command");
            return;
        }
        Err(err) => {
            log::error!("Cannot acquire instance lock: {err}");
            std::process::exit(1);
        }
    };

    // Held until the process ends; the shell releases it on the immediate
    // `--close` exit, main releases it when the event loop winds down.
    let lock = Arc::new(Mutex::new(Some(lock)));
    let shell_lock = lock.clone();

    let shutdown = Arc::new(AtomicBool::new(false));
    let poll_shutdown = shutdown.clone();
    let initial_line = arg_line;

    let result = tauri::Builder::default()
        .manage(Mutex::new(state::AppState::load()))
        .setup(move |app| {
            let handle = app.handle();
            let shell = shell::Shell::build(handle, shell_lock)?;

            let watcher_shell = shell.clone();
            rpc::spawn_watcher(&rpc_path, move |line| {
                cli::dispatch(&line, &watcher_shell);
            })?;

            connector::spawn_poll_loop(
                Box::new(connector::IpcConnector::new(handle.clone())),
                poll_shutdown,
            );

            // Arguments of this first invocation go through the same path as
            // forwarded ones.
            cli::dispatch(&initial_line, &shell);
            Ok(())
        })
        .on_window_event(|window, event| {
            // Windows are constructed once and live for the whole process;
            // closing a settings window just hides it.
            if let tauri::WindowEvent::CloseRequested { api, .. } = event {
                let _ = window.hide();
                api.prevent_close();
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_settings,
            commands::get_default_settings,
            commands::save_settings,
        ])
        .run(tauri::generate_context!());

    shutdown.store(true, Ordering::SeqCst);
    if let Ok(mut guard) = lock.lock() {
        guard.take();
    }
    if let Err(err) = result {
        log::error!("Event loop failed: {err}");
        std::process::exit(1);
    }
}
