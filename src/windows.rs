//! Main window visibility control for tray interactions.
//!
//! The tray never owns the window; it borrows it to answer two questions
//! (visible? fullscreen?) and to flip visibility. That borrow is expressed as
//! the `WindowHandle` trait so the toggle rules are testable without a webview:
//! visible goes hidden, hidden goes shown-and-focused, and direct icon clicks
//! are ignored while the window is fullscreen (a click there is almost always
//! a mis-click and yanking the window away is jarring).

use tauri::Manager;
use tracing::warn;

/// Label of the main webview window, as declared in tauri.conf.json.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// The borrowed main-window surface the tray needs.
pub trait WindowHandle {
    fn is_visible(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
    fn show(&self);
    fn hide(&self);
}

impl<R: tauri::Runtime> WindowHandle for tauri::WebviewWindow<R> {
    fn is_visible(&self) -> bool {
        self.is_visible().unwrap_or(false)
    }

    fn is_fullscreen(&self) -> bool {
        self.is_fullscreen().unwrap_or(false)
    }

    fn show(&self) {
        if let Err(e) = self.show() {
            warn!(error = %e, "Failed to show main window");
        }
        if let Err(e) = self.set_focus() {
            warn!(error = %e, "Failed to focus main window");
        }
    }

    fn hide(&self) {
        if let Err(e) = self.hide() {
            warn!(error = %e, "Failed to hide main window");
        }
    }
}

/// Visible goes hidden, hidden goes shown. Used by the "Toggle" menu entry
/// (which carries no fullscreen guard) and by guarded icon clicks.
pub fn toggle_window(win: &impl WindowHandle) {
    if win.is_visible() {
        win.hide();
    } else {
        win.show();
    }
}

/// Single/double click on the tray icon: toggle, unless fullscreen.
pub fn handle_tray_click(win: &impl WindowHandle) {
    if !win.is_fullscreen() {
        toggle_window(win);
    }
}

/// Looks up the main window and toggles it. Menu-entry path, no guard.
pub fn toggle_main_window<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    if let Some(win) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        toggle_window(&win);
    }
}

/// Looks up the main window and applies the guarded click behavior.
pub fn main_window_tray_click<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    if let Some(win) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        handle_tray_click(&win);
    }
}

/// Shows and focuses the main window (leaving menu bar mode).
pub fn show_main_window<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    if let Some(win) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        WindowHandle::show(&win);
    }
}
