//! Tauri commands for the tray: unread signals and presentation preferences.
//!
//! The webview owns the actual message state; it pushes the unread counter
//! (and, on platforms that render unread as a badge swap, the badge flag)
//! down to the tray through these commands. The preference commands back the
//! settings UI.

use serde::Serialize;
use tauri::State;

use crate::config::PrefKey;
use crate::menu_bar_mode;
use crate::tray_actions;
use crate::Settings;

/// Tray-related preferences as shown in the settings UI.
#[derive(Debug, Clone, Serialize)]
pub struct TrayPreferences {
    pub menu_bar_mode: bool,
    pub show_dock_icon: bool,
}

/// Pushes a new unread-message count to the tray icon and tooltip.
#[tauri::command]
pub fn update_unread_count(app: tauri::AppHandle, count: u32) {
    tray_actions::update_unread(&app, count);
}

/// Swaps the tray badge icon independent of the numeric counter.
#[tauri::command]
pub fn set_unread_badge(app: tauri::AppHandle, should_display_unread: bool) {
    tray_actions::set_badge(&app, should_display_unread);
}

/// Persists the menu bar mode flag and applies the presentation switch.
#[tauri::command]
pub fn set_menu_bar_mode(app: tauri::AppHandle, settings: State<'_, Settings>, enabled: bool) {
    settings.0.set(PrefKey::MenuBarMode, enabled);
    menu_bar_mode::apply_menu_bar_mode(&app, settings.0.as_ref());
}

/// Returns the persisted tray preferences.
#[tauri::command]
pub fn get_tray_preferences(settings: State<'_, Settings>) -> TrayPreferences {
    TrayPreferences {
        menu_bar_mode: settings.0.get(PrefKey::MenuBarMode),
        show_dock_icon: settings.0.get(PrefKey::ShowDockIcon),
    }
}
