//! Menu bar mode: Courier as a tray-resident app.
//!
//! With the mode on, the app lives in the tray/menu bar; the Dock icon is
//! shown only if the separate `ShowDockIcon` preference says so. With the mode
//! off, the tray icon is torn down (deferred, see `tray::DESTROY_DELAY`), the
//! Dock entry comes back, and the main window is brought to the front.
//! The tray only ever calls `apply_menu_bar_mode` after persisting the flag.

use tracing::info;

use crate::config::{PrefKey, SettingsStore};
use crate::dock;
use crate::tray_actions;
use crate::windows;

/// Applies the persisted `MenuBarMode` preference to the running app.
pub fn apply_menu_bar_mode<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    settings: &dyn SettingsStore,
) {
    let enabled = settings.get(PrefKey::MenuBarMode);
    info!(enabled, "Applying menu bar mode");
    if enabled {
        if let Err(e) = tray_actions::create_tray(app, settings) {
            tracing::warn!(error = %e, "Failed to create tray for menu bar mode");
        }
        dock::set_dock_visible(app, settings.get(PrefKey::ShowDockIcon));
    } else {
        tray_actions::destroy_tray(app);
        dock::set_dock_visible(app, true);
        windows::show_main_window(app);
    }
}
