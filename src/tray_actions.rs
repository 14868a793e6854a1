//! Tauri-side tray wiring: widget construction, menu building, event handling.
//!
//! `tray.rs` holds the platform-agnostic controller; this module gives it a
//! real widget (`TauriTray`, addressing the tray through the app handle so the
//! controller state stays `Send`), builds the context menu from the pure
//! layout, and dispatches menu/icon events to the window and the settings
//! store. Menu content changes (the Dock-icon checkbox flipping the "Menu"
//! submenu in and out) are done by rebuilding the menu from the layout, the
//! reliable way to mutate a live tray menu.

use tauri::image::Image;
use tauri::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, MenuItemKind, PredefinedMenuItem, Submenu};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::Manager;
use tracing::{debug, warn};

use crate::config::{PrefKey, SettingsStore};
use crate::icons::IconAsset;
use crate::menu_bar_mode;
use crate::platform::PlatformVariant;
use crate::tray::{
    destroy_after_delay, tray_menu_layout, unread_tooltip, SharedTrayController, TrayHandle,
    TrayMenuEntry, DESTROY_DELAY,
};
use crate::windows;
use crate::Settings;

/// Id of the single tray icon this process owns.
pub const TRAY_ID: &str = "main";

/// Shared controller state as managed in Tauri, for a given runtime.
pub type TrayState<R> = SharedTrayController<TauriTray<R>>;

/// `TrayHandle` backed by the Tauri tray registry. Holding the app handle
/// instead of the `TrayIcon` itself keeps the controller free of widget
/// lifetime concerns; `dispose` removes the icon from the registry.
pub struct TauriTray<R: tauri::Runtime> {
    app: tauri::AppHandle<R>,
}

impl<R: tauri::Runtime> TauriTray<R> {
    pub fn new(app: tauri::AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: tauri::Runtime> TrayHandle for TauriTray<R> {
    fn set_icon(&self, asset: IconAsset) {
        let Some(tray) = self.app.tray_by_id(TRAY_ID) else {
            return;
        };
        match Image::from_bytes(asset.bytes()) {
            Ok(image) => {
                if let Err(e) = tray.set_icon(Some(image)) {
                    warn!(error = %e, "Failed to set tray icon");
                }
                #[cfg(target_os = "macos")]
                if let Err(e) = tray.set_icon_as_template(asset.is_template()) {
                    warn!(error = %e, "Failed to mark tray icon as template");
                }
            }
            Err(e) => warn!(error = %e, asset = asset.file_name(), "Failed to load tray icon"),
        }
    }

    fn set_tooltip(&self, tooltip: &str) {
        let Some(tray) = self.app.tray_by_id(TRAY_ID) else {
            return;
        };
        if let Err(e) = tray.set_tooltip(Some(tooltip)) {
            warn!(error = %e, "Failed to set tray tooltip");
        }
    }

    fn dispose(&self) {
        if self.app.remove_tray_by_id(TRAY_ID).is_none() {
            debug!("Tray icon already removed");
        }
    }
}

/// Creates the tray icon with its context menu and handlers. No-op if the
/// tray already exists.
pub fn create_tray<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    settings: &dyn SettingsStore,
) -> tauri::Result<()> {
    let state = app.state::<TrayState<R>>();
    let Ok(mut controller) = state.lock() else {
        warn!("Tray state lock poisoned, skipping create");
        return Ok(());
    };
    if controller.is_present() {
        return Ok(());
    }

    let variant = PlatformVariant::current();
    let menu = build_tray_menu(app, variant, settings.get(PrefKey::ShowDockIcon))?;
    let icon = Image::from_bytes(IconAsset::select(variant, false).bytes())?;

    let _tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .icon_as_template(variant.is_macos())
        .menu(&menu)
        // macOS tray icons natively open their menu on a single click; on
        // other platforms the left click is reserved for toggling the window.
        .show_menu_on_left_click(variant.is_macos())
        .tooltip(unread_tooltip(0))
        .on_menu_event(handle_tray_menu_event)
        .on_tray_icon_event(handle_tray_icon_event)
        .build(app)?;

    controller.install(TauriTray::new(app.clone()));
    debug!("Tray icon created");
    Ok(())
}

/// Schedules tray removal after `DESTROY_DELAY`. Always schedules, even while
/// Absent; the deferred callback re-checks existence, so extra timers are
/// harmless.
pub fn destroy_tray<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let state = app.state::<TrayState<R>>();
    let shared = std::sync::Arc::clone(state.inner());
    tauri::async_runtime::spawn(destroy_after_delay(shared, DESTROY_DELAY));
}

/// Pushes a new unread count to the tray.
pub fn update_unread<R: tauri::Runtime>(app: &tauri::AppHandle<R>, count: u32) {
    let state = app.state::<TrayState<R>>();
    if let Ok(mut controller) = state.lock() {
        controller.update(count);
    };
}

/// Swaps the plain/unread badge icon (non-macOS).
pub fn set_badge<R: tauri::Runtime>(app: &tauri::AppHandle<R>, should_display_unread: bool) {
    let state = app.state::<TrayState<R>>();
    if let Ok(mut controller) = state.lock() {
        controller.set_badge(should_display_unread);
    };
}

/// Builds the tray context menu from the pure layout for the given platform
/// and Dock-icon flag.
fn build_tray_menu<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    variant: PlatformVariant,
    show_dock_icon: bool,
) -> tauri::Result<Menu<R>> {
    let menu = Menu::new(app)?;
    for entry in tray_menu_layout(variant, show_dock_icon) {
        match entry {
            TrayMenuEntry::ToggleWindow => {
                menu.append(&MenuItem::with_id(
                    app,
                    "toggle-window",
                    "Toggle",
                    true,
                    None::<&str>,
                )?)?;
            }
            TrayMenuEntry::DisableMenuBarMode => {
                menu.append(&MenuItem::with_id(
                    app,
                    "disable-menu-bar-mode",
                    "Disable Menu Bar Mode",
                    true,
                    None::<&str>,
                )?)?;
            }
            TrayMenuEntry::ShowDockIcon { checked } => {
                menu.append(&CheckMenuItem::with_id(
                    app,
                    "show-dock-icon",
                    "Show Dock Icon",
                    true,
                    checked,
                    None::<&str>,
                )?)?;
            }
            TrayMenuEntry::AppMenu => {
                if let Some(submenu) = build_app_submenu(app)? {
                    menu.append(&submenu)?;
                }
            }
            TrayMenuEntry::Separator => {
                menu.append(&PredefinedMenuItem::separator(app)?)?;
            }
            TrayMenuEntry::Quit => {
                menu.append(&MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?)?;
            }
        }
    }
    Ok(menu)
}

/// Mirrors the current application menu into a "Menu" submenu, so the app
/// menu stays reachable while the Dock icon is hidden. Returns None when the
/// app has no menu to mirror.
fn build_app_submenu<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> tauri::Result<Option<Submenu<R>>> {
    let Some(app_menu) = app.menu() else {
        return Ok(None);
    };
    let submenu = Submenu::with_id(app, "dock-menu", "Menu", true)?;
    for item in app_menu.items()? {
        match &item {
            MenuItemKind::MenuItem(i) => submenu.append(i)?,
            MenuItemKind::Submenu(s) => submenu.append(s)?,
            MenuItemKind::Predefined(p) => submenu.append(p)?,
            MenuItemKind::Check(c) => submenu.append(c)?,
            MenuItemKind::Icon(i) => submenu.append(i)?,
        }
    }
    Ok(Some(submenu))
}

/// Rebuilds and swaps the context menu after the Dock-icon flag changes.
fn rebuild_tray_menu<R: tauri::Runtime>(app: &tauri::AppHandle<R>, settings: &dyn SettingsStore) {
    let Some(tray) = app.tray_by_id(TRAY_ID) else {
        return;
    };
    let variant = PlatformVariant::current();
    match build_tray_menu(app, variant, settings.get(PrefKey::ShowDockIcon)) {
        Ok(menu) => {
            if let Err(e) = tray.set_menu(Some(menu)) {
                warn!(error = %e, "Failed to update tray menu");
            }
        }
        Err(e) => warn!(error = %e, "Failed to rebuild tray menu"),
    }
}

/// Handles a tray menu click.
fn handle_tray_menu_event<R: tauri::Runtime>(app: &tauri::AppHandle<R>, event: MenuEvent) {
    match event.id().0.as_str() {
        "toggle-window" => {
            windows::toggle_main_window(app);
        }
        "disable-menu-bar-mode" => {
            let settings = app.state::<Settings>();
            settings.0.set(PrefKey::MenuBarMode, false);
            menu_bar_mode::apply_menu_bar_mode(app, settings.0.as_ref());
        }
        "show-dock-icon" => {
            let settings = app.state::<Settings>();
            let show = !settings.0.get(PrefKey::ShowDockIcon);
            settings.0.set(PrefKey::ShowDockIcon, show);
            crate::dock::set_dock_visible(app, show);
            // The "Menu" submenu is visible exactly while the Dock icon is
            // hidden; rebuilding applies both it and the checkbox state.
            rebuild_tray_menu(app, settings.0.as_ref());
        }
        "quit" => {
            app.exit(0);
        }
        _ => {}
    }
}

/// Handles direct clicks on the tray icon. On macOS the single click opens
/// the menu natively, so only the other platforms toggle the window here.
fn handle_tray_icon_event<R: tauri::Runtime>(
    tray: &tauri::tray::TrayIcon<R>,
    event: TrayIconEvent,
) {
    if PlatformVariant::current().is_macos() {
        return;
    }
    match event {
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        }
        | TrayIconEvent::DoubleClick {
            button: MouseButton::Left,
            ..
        } => {
            windows::main_window_tray_click(tray.app_handle());
        }
        _ => {}
    }
}
