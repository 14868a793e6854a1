// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/
pub mod commands_tray;
pub mod config;
pub mod dock;
pub mod icons;
pub mod menu_bar_mode;
pub mod platform;
pub mod tray;
pub mod tray_actions;
pub mod windows;

use std::sync::{Arc, Mutex};

use tauri::Manager;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::{JsonSettingsStore, PrefKey, SettingsStore};
use crate::platform::PlatformVariant;
use crate::tray::TrayController;
use crate::tray_actions::TrayState;

/// User-facing application name; also the tray tooltip prefix.
pub const APP_NAME: &str = "Courier";

/// App logo at 32x32 (icons/32x32.png), used to restore the Dock icon.
pub const APP_LOGO_PNG: &[u8] = include_bytes!("../icons/32x32.png");

/// Settings store shared with commands and tray event handlers.
pub struct Settings(pub Arc<dyn SettingsStore + Send + Sync>);

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .invoke_handler(tauri::generate_handler![
            commands_tray::update_unread_count,
            commands_tray::set_unread_badge,
            commands_tray::set_menu_bar_mode,
            commands_tray::get_tray_preferences,
        ])
        .setup(|app| {
            let settings: Arc<dyn SettingsStore + Send + Sync> =
                Arc::new(JsonSettingsStore::new());
            app.manage(Settings(Arc::clone(&settings)));

            let variant = PlatformVariant::current();
            let tray_state: TrayState<tauri::Wry> =
                Arc::new(Mutex::new(TrayController::new(variant)));
            app.manage(tray_state);

            // Non-macOS desktops always get the tray icon; on macOS it is the
            // menu bar icon and exists only while menu bar mode is on.
            let handle = app.handle();
            if !variant.is_macos() {
                tray_actions::create_tray(handle, settings.as_ref())?;
            } else if settings.get(PrefKey::MenuBarMode) {
                menu_bar_mode::apply_menu_bar_mode(handle, settings.as_ref());
            }

            Ok(())
        })
        .run(tauri::generate_context!())
    {
        error!(error = %e, "Error while running Tauri application");
        std::process::exit(1);
    }
}
