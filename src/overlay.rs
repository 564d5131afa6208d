use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

pub const VOICE_OVERLAY_LABEL: &str = "voice-overlay";
pub const TEXT_OVERLAY_LABEL: &str = "text-overlay";

/// Create the voice overlay at startup so it can receive connector events
/// from the first poll tick.
pub fn ensure_voice_overlay(app: &AppHandle) -> Result<(), String> {
    ensure_overlay(app, VOICE_OVERLAY_LABEL, 280.0, 420.0)
}

pub fn ensure_text_overlay(app: &AppHandle) -> Result<(), String> {
    ensure_overlay(app, TEXT_OVERLAY_LABEL, 460.0, 280.0)
}

fn ensure_overlay(app: &AppHandle, label: &str, width: f64, height: f64) -> Result<(), String> {
    if app.get_webview_window(label).is_some() {
        return Ok(());
    }

    // Load the shared frontend bundle; the query flag mounts the right surface.
    let url = WebviewUrl::App(format!("index.html?window={label}").into());

    WebviewWindowBuilder::new(app, label, url)
        .title("Discover Overlay")
        .decorations(false)
        .transparent(true)
        .resizable(false)
        .closable(false)
        .skip_taskbar(true)
        .always_on_top(true)
        .visible_on_all_workspaces(true)
        .inner_size(width, height)
        .build()
        .map(|_| ())
        .map_err(|err| err.to_string())
}
