use std::sync::Mutex;

use tauri::{AppHandle, Emitter, State};

use crate::settings::Settings;
use crate::state::AppState;
use crate::storage;

#[tauri::command]
pub fn get_settings(state: State<'_, Mutex<AppState>>) -> Result<Settings, String> {
    let guard = state.lock().map_err(|err| err.to_string())?;
    Ok(guard.settings.clone())
}

#[tauri::command]
pub fn get_default_settings() -> Settings {
    Settings::default()
}

#[tauri::command]
pub fn save_settings(
    app: AppHandle,
    state: State<'_, Mutex<AppState>>,
    settings: Settings,
) -> Result<Settings, String> {
    storage::save_settings(&settings).map_err(|err| err.to_string())?;
    {
        let mut guard = state.lock().map_err(|err| err.to_string())?;
        guard.settings = settings.clone();
    }
    // The overlays re-render from this; the settings windows use it to stay
    // in sync with each other.
    let _ = app.emit("settings-updated", settings.clone());
    Ok(settings)
}
