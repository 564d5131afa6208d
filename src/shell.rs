use std::sync::{Arc, Mutex};

use tauri::AppHandle;

use crate::app_tray;
use crate::instance::InstanceLock;
use crate::overlay;
use crate::settings_windows;

/// Operations the dispatcher and the tray menu drive. The trait seam keeps
/// command handling testable without a display server.
pub trait AppShell {
    fn present_voice_settings(&self);
    fn present_text_settings(&self);
    fn present_general_settings(&self);
    /// Leave the event loop; Tauri tears the windows down on the way out.
    fn close(&self);
    /// Exit the process right now, skipping event-loop shutdown. This is
    /// the `--close` path.
    fn terminate(&self);
}

#[derive(Clone)]
pub struct Shell {
    app: AppHandle,
    lock: Arc<Mutex<Option<InstanceLock>>>,
}

impl Shell {
    /// Construct every window the app owns. Order matters: the overlays
    /// first (the settings windows are bound to them), then the tray, then
    /// the settings windows. Only the tray is allowed to fail.
    pub fn build(
        app: &AppHandle,
        lock: Arc<Mutex<Option<InstanceLock>>>,
    ) -> Result<Self, String> {
        let shell = Self {
            app: app.clone(),
            lock,
        };

        overlay::ensure_voice_overlay(app)?;
        overlay::ensure_text_overlay(app)?;

        app_tray::setup_tray(app, shell.clone());

        settings_windows::ensure_voice_settings(app, overlay::VOICE_OVERLAY_LABEL)?;
        settings_windows::ensure_text_settings(app, overlay::TEXT_OVERLAY_LABEL)?;
        settings_windows::ensure_general_settings(
            app,
            overlay::TEXT_OVERLAY_LABEL,
            overlay::VOICE_OVERLAY_LABEL,
        )?;

        Ok(shell)
    }
}

impl AppShell for Shell {
    fn present_voice_settings(&self) {
        settings_windows::present(&self.app, settings_windows::VOICE_SETTINGS_LABEL);
    }

    fn present_text_settings(&self) {
        settings_windows::present(&self.app, settings_windows::TEXT_SETTINGS_LABEL);
    }

    fn present_general_settings(&self) {
        settings_windows::present(&self.app, settings_windows::GENERAL_SETTINGS_LABEL);
    }

    fn close(&self) {
        self.app.exit(0);
    }

    fn terminate(&self) {
        // No destructor runs past this point, so release the lock file here.
        if let Ok(mut guard) = self.lock.lock() {
            guard.take();
        }
        std::process::exit(0);
    }
}
