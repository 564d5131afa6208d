use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Manager};

use crate::shell::AppShell;

const TRAY_ID: &str = "main";

const MENU_VOICE_ID: &str = "tray_voice_settings";
const MENU_TEXT_ID: &str = "tray_text_settings";
const MENU_GENERAL_ID: &str = "tray_general_settings";
const MENU_CLOSE_ID: &str = "tray_close";

/// Build the tray icon. Construction failure never aborts startup: retry
/// with a bare icon-only tray, and if that fails too run without one.
pub fn setup_tray<S>(app: &AppHandle, shell: S)
where
    S: AppShell + Send + Sync + 'static,
{
    if let Err(err) = build_full_tray(app, shell) {
        log::info!("Falling back to basic tray icon: {err}");
        if let Err(err) = build_basic_tray(app) {
            log::info!("Tray icon unavailable, continuing without one: {err}");
        }
    }
}

fn build_full_tray<S>(app: &AppHandle, shell: S) -> Result<(), String>
where
    S: AppShell + Send + Sync + 'static,
{
    let menu = build_menu(app)?;
    let icon = tauri::image::Image::from_bytes(include_bytes!("../icons/32x32.png"))
        .map_err(|err| err.to_string())?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .menu(&menu)
        .tooltip("Discover Overlay")
        .show_menu_on_left_click(true)
        .on_menu_event(move |_app, event| handle_menu_event(&shell, event))
        .build(app)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn build_basic_tray(app: &AppHandle) -> Result<(), String> {
    let icon = app
        .default_window_icon()
        .cloned()
        .ok_or_else(|| "no default window icon".to_string())?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .tooltip("Discover Overlay")
        .build(app)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn build_menu(app: &AppHandle) -> Result<Menu<tauri::Wry>, String> {
    let menu = Menu::new(app).map_err(|err| err.to_string())?;

    let voice_item = MenuItem::with_id(app, MENU_VOICE_ID, "Voice Settings", true, None::<&str>)
        .map_err(|err| err.to_string())?;
    let text_item = MenuItem::with_id(app, MENU_TEXT_ID, "Text Settings", true, None::<&str>)
        .map_err(|err| err.to_string())?;
    let general_item =
        MenuItem::with_id(app, MENU_GENERAL_ID, "General Settings", true, None::<&str>)
            .map_err(|err| err.to_string())?;

    menu.append(&voice_item).map_err(|err| err.to_string())?;
    menu.append(&text_item).map_err(|err| err.to_string())?;
    menu.append(&general_item).map_err(|err| err.to_string())?;

    menu.append(&PredefinedMenuItem::separator(app).map_err(|err| err.to_string())?)
        .map_err(|err| err.to_string())?;

    let close_item = MenuItem::with_id(app, MENU_CLOSE_ID, "Close", true, None::<&str>)
        .map_err(|err| err.to_string())?;
    menu.append(&close_item).map_err(|err| err.to_string())?;

    Ok(menu)
}

fn handle_menu_event(shell: &impl AppShell, event: tauri::menu::MenuEvent) {
    match event.id().as_ref() {
        MENU_VOICE_ID => shell.present_voice_settings(),
        MENU_TEXT_ID => shell.present_text_settings(),
        MENU_GENERAL_ID => shell.present_general_settings(),
        // The menu winds the event loop down, unlike the immediate `--close`
        // exit.
        MENU_CLOSE_ID => shell.close(),
        _ => {}
    }
}
