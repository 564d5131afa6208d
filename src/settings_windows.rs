use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

pub const VOICE_SETTINGS_LABEL: &str = "voice-settings";
pub const TEXT_SETTINGS_LABEL: &str = "text-settings";
pub const GENERAL_SETTINGS_LABEL: &str = "general-settings";

/// Settings windows are created hidden at startup and presented on demand;
/// each one is bound to the overlay window(s) it controls so it can push
/// live previews there.
pub fn ensure_voice_settings(app: &AppHandle, voice_overlay: &str) -> Result<(), String> {
    build_settings_window(app, VOICE_SETTINGS_LABEL, "Voice Settings", &[voice_overlay])
}

pub fn ensure_text_settings(app: &AppHandle, text_overlay: &str) -> Result<(), String> {
    build_settings_window(app, TEXT_SETTINGS_LABEL, "Text Settings", &[text_overlay])
}

pub fn ensure_general_settings(
    app: &AppHandle,
    text_overlay: &str,
    voice_overlay: &str,
) -> Result<(), String> {
    build_settings_window(
        app,
        GENERAL_SETTINGS_LABEL,
        "General Settings",
        &[text_overlay, voice_overlay],
    )
}

fn build_settings_window(
    app: &AppHandle,
    label: &str,
    title: &str,
    overlays: &[&str],
) -> Result<(), String> {
    if app.get_webview_window(label).is_some() {
        return Ok(());
    }

    let url = WebviewUrl::App(
        format!("index.html?window={label}&overlays={}", overlays.join(",")).into(),
    );

    WebviewWindowBuilder::new(app, label, url)
        .title(title)
        .inner_size(520.0, 640.0)
        .visible(false)
        .build()
        .map(|_| ())
        .map_err(|err| err.to_string())
}

pub fn present(app: &AppHandle, label: &str) {
    if let Some(window) = app.get_webview_window(label) {
        let _ = window.show();
        let _ = window.set_focus();
    }
}
