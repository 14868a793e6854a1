//! Tray icon state machine.
//!
//! `TrayController` owns the single tray icon for the process and mirrors the
//! unread-message counter onto it (icon swap + tooltip). It is deliberately
//! free of Tauri types: the platform widget sits behind the `TrayHandle` trait
//! so the Absent/Present lifecycle, the redundant-update guard, and the
//! deferred destroy can be exercised with an in-memory fake. The Tauri-backed
//! handle and the menu/event wiring live in `tray_actions`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::icons::IconAsset;
use crate::platform::PlatformVariant;

/// Delay before the tray icon is actually released after `destroy`.
/// Tearing the icon down immediately while its menu/click events are still
/// being delivered corrupts tray state on some desktops, so removal is
/// deferred and the callback re-checks that the icon still exists.
pub const DESTROY_DELAY: Duration = Duration::from_millis(500);

/// The platform tray widget, as far as the controller is concerned.
pub trait TrayHandle {
    fn set_icon(&self, asset: IconAsset);
    fn set_tooltip(&self, tooltip: &str);
    /// Releases the underlying platform icon.
    fn dispose(&self);
}

/// Owns the process-wide tray icon and the last-rendered unread count.
///
/// States are Absent (`tray` is `None`) and Present. `install` is the only way
/// in, the guarded `finish_destroy` the only way out; `update` and `set_badge`
/// are no-ops while Absent.
pub struct TrayController<H: TrayHandle> {
    variant: PlatformVariant,
    tray: Option<H>,
    unread_count: u32,
}

/// Controller shared between event handlers and the deferred destroy task.
pub type SharedTrayController<H> = Arc<Mutex<TrayController<H>>>;

impl<H: TrayHandle> TrayController<H> {
    pub fn new(variant: PlatformVariant) -> Self {
        Self {
            variant,
            tray: None,
            unread_count: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.tray.is_some()
    }

    /// Adopts a freshly built tray widget, rendering the no-unread icon and
    /// the zero-count tooltip. Returns false (and drops the new handle) if a
    /// tray icon already exists; create is idempotent.
    pub fn install(&mut self, handle: H) -> bool {
        if self.tray.is_some() {
            debug!("Tray icon already exists, ignoring create");
            return false;
        }
        handle.set_icon(IconAsset::select(self.variant, false));
        handle.set_tooltip(&unread_tooltip(0));
        self.unread_count = 0;
        self.tray = Some(handle);
        true
    }

    /// Renders a new unread count. Skipped while Absent and when the count
    /// matches the last rendered one, so repeated pushes of the same value
    /// cost nothing.
    pub fn update(&mut self, unread_count: u32) {
        let Some(tray) = &self.tray else {
            return;
        };
        if self.unread_count == unread_count {
            return;
        }
        self.unread_count = unread_count;
        tray.set_icon(IconAsset::select(self.variant, unread_count > 0));
        tray.set_tooltip(&unread_tooltip(unread_count));
    }

    /// Swaps between the plain and unread full-color icons, independent of the
    /// numeric counter. On macOS the menu-bar icon already conveys unread
    /// state through `update`, so this is a no-op there.
    pub fn set_badge(&mut self, should_display_unread: bool) {
        if self.variant.is_macos() {
            return;
        }
        let Some(tray) = &self.tray else {
            return;
        };
        tray.set_icon(IconAsset::select(
            PlatformVariant::Other,
            should_display_unread,
        ));
    }

    /// Releases the tray icon if it still exists. This is the guarded tail of
    /// the deferred destroy; calling it in the Absent state (destroy never
    /// requested, or a second timer firing) is a safe no-op.
    pub fn finish_destroy(&mut self) -> bool {
        match self.tray.take() {
            Some(tray) => {
                tray.dispose();
                debug!("Tray icon destroyed");
                true
            }
            None => false,
        }
    }
}

/// Sleeps out the destroy delay, then releases the icon if it still exists.
/// Spawned (never awaited inline) by `tray_actions::destroy_tray`; a second
/// destroy call just queues a second timer whose firing is a no-op.
pub async fn destroy_after_delay<H: TrayHandle>(
    controller: SharedTrayController<H>,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;
    if let Ok(mut controller) = controller.lock() {
        controller.finish_destroy();
    }
}

/// Tray tooltip for an unread count.
///
/// The zero-count tooltip is just the app name; positive counts append
/// `- N unread message(s)`. The missing space before the dash matches the
/// tooltip users have seen for years, so it stays.
pub fn unread_tooltip(count: u32) -> String {
    let mut tooltip = String::from(crate::APP_NAME);
    if count > 0 {
        let noun = if count == 1 { "message" } else { "messages" };
        tooltip.push_str(&format!("- {count} unread {noun}"));
    }
    tooltip
}

/// One entry of the tray context menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuEntry {
    /// "Toggle" — show/hide the main window. Omitted on macOS, where a single
    /// click on the tray icon already opens this menu.
    ToggleWindow,
    /// "Disable Menu Bar Mode" (macOS only).
    DisableMenuBarMode,
    /// "Show Dock Icon" checkbox (macOS only).
    ShowDockIcon { checked: bool },
    /// "Menu" submenu mirroring the application menu; present only while the
    /// Dock icon is hidden, since the app menu is unreachable then.
    AppMenu,
    Separator,
    Quit,
}

/// Computes the tray menu for a platform and the persisted Dock-icon flag.
/// The menu is rebuilt from this layout whenever the flag changes.
pub fn tray_menu_layout(variant: PlatformVariant, show_dock_icon: bool) -> Vec<TrayMenuEntry> {
    let mut entries = Vec::new();
    if !variant.is_macos() {
        entries.push(TrayMenuEntry::ToggleWindow);
    }
    if variant.is_macos() {
        entries.push(TrayMenuEntry::DisableMenuBarMode);
        entries.push(TrayMenuEntry::ShowDockIcon {
            checked: show_dock_icon,
        });
        entries.push(TrayMenuEntry::Separator);
        if !show_dock_icon {
            entries.push(TrayMenuEntry::AppMenu);
        }
    }
    entries.push(TrayMenuEntry::Separator);
    entries.push(TrayMenuEntry::Quit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call the controller makes against the widget.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TrayOp {
        Icon(IconAsset),
        Tooltip(String),
        Dispose,
    }

    #[derive(Clone, Default)]
    struct FakeTray {
        ops: Arc<Mutex<Vec<TrayOp>>>,
    }

    impl FakeTray {
        fn ops(&self) -> Vec<TrayOp> {
            self.ops.lock().unwrap().clone()
        }

        fn icon_writes(&self) -> usize {
            self.ops()
                .iter()
                .filter(|op| matches!(op, TrayOp::Icon(_)))
                .count()
        }

        fn tooltip_writes(&self) -> usize {
            self.ops()
                .iter()
                .filter(|op| matches!(op, TrayOp::Tooltip(_)))
                .count()
        }

        fn dispose_count(&self) -> usize {
            self.ops()
                .iter()
                .filter(|op| matches!(op, TrayOp::Dispose))
                .count()
        }
    }

    impl TrayHandle for FakeTray {
        fn set_icon(&self, asset: IconAsset) {
            self.ops.lock().unwrap().push(TrayOp::Icon(asset));
        }

        fn set_tooltip(&self, tooltip: &str) {
            self.ops
                .lock()
                .unwrap()
                .push(TrayOp::Tooltip(tooltip.to_string()));
        }

        fn dispose(&self) {
            self.ops.lock().unwrap().push(TrayOp::Dispose);
        }
    }

    fn installed_controller(variant: PlatformVariant) -> (TrayController<FakeTray>, FakeTray) {
        let mut controller = TrayController::new(variant);
        let tray = FakeTray::default();
        assert!(controller.install(tray.clone()));
        (controller, tray)
    }

    #[test]
    fn test_install_renders_initial_state() {
        let (controller, tray) = installed_controller(PlatformVariant::Other);
        assert!(controller.is_present());
        assert_eq!(
            tray.ops(),
            vec![
                TrayOp::Icon(IconAsset::Tray),
                TrayOp::Tooltip("Courier".to_string()),
            ]
        );
    }

    #[test]
    fn test_create_is_idempotent() {
        let (mut controller, tray) = installed_controller(PlatformVariant::Other);
        let second = FakeTray::default();
        assert!(!controller.install(second.clone()));
        // The second widget was never touched and the first remains active.
        assert!(second.ops().is_empty());
        controller.update(1);
        assert_eq!(tray.icon_writes(), 2);
    }

    #[test]
    fn test_update_deduplicates_equal_counts() {
        let (mut controller, tray) = installed_controller(PlatformVariant::Other);
        controller.update(5);
        controller.update(5);
        // One write from install, exactly one more from the first update(5).
        assert_eq!(tray.icon_writes(), 2);
        assert_eq!(tray.tooltip_writes(), 2);
    }

    #[test]
    fn test_update_zero_after_unread_restores_plain_icon() {
        let (mut controller, tray) = installed_controller(PlatformVariant::Other);
        controller.update(3);
        controller.update(0);
        assert!(tray.ops().contains(&TrayOp::Icon(IconAsset::TrayUnread)));
        assert_eq!(
            tray.ops().last(),
            Some(&TrayOp::Tooltip("Courier".to_string()))
        );
        assert_eq!(tray.icon_writes(), 3);
    }

    #[test]
    fn test_update_selects_template_icons_on_macos() {
        let (mut controller, tray) = installed_controller(PlatformVariant::MacOs);
        controller.update(2);
        assert!(tray
            .ops()
            .contains(&TrayOp::Icon(IconAsset::MenuBarUnreadTemplate)));
    }

    #[test]
    fn test_tooltip_formatting() {
        assert_eq!(unread_tooltip(0), "Courier");
        assert_eq!(unread_tooltip(1), "Courier- 1 unread message");
        assert_eq!(unread_tooltip(2), "Courier- 2 unread messages");
    }

    #[test]
    fn test_operations_are_noops_while_absent() {
        let mut controller: TrayController<FakeTray> = TrayController::new(PlatformVariant::Other);
        controller.update(4);
        controller.set_badge(true);
        assert!(!controller.finish_destroy());
        assert!(!controller.is_present());
    }

    #[test]
    fn test_set_badge_swaps_full_color_icons() {
        let (mut controller, tray) = installed_controller(PlatformVariant::Other);
        controller.set_badge(true);
        controller.set_badge(false);
        assert!(tray.ops().contains(&TrayOp::Icon(IconAsset::TrayUnread)));
        assert_eq!(tray.ops().last(), Some(&TrayOp::Icon(IconAsset::Tray)));
    }

    #[test]
    fn test_set_badge_is_noop_on_macos() {
        let (mut controller, tray) = installed_controller(PlatformVariant::MacOs);
        controller.set_badge(true);
        // Only the install writes; the badge path never touches the widget.
        assert_eq!(tray.icon_writes(), 1);
    }

    #[test]
    fn test_finish_destroy_disposes_once() {
        let (mut controller, tray) = installed_controller(PlatformVariant::Other);
        assert!(controller.finish_destroy());
        assert!(!controller.finish_destroy());
        assert_eq!(tray.dispose_count(), 1);
        controller.update(9);
        assert_eq!(tray.icon_writes(), 1);
    }

    #[test]
    fn test_install_after_destroy_creates_again() {
        let (mut controller, _tray) = installed_controller(PlatformVariant::Other);
        controller.finish_destroy();
        let fresh = FakeTray::default();
        assert!(controller.install(fresh.clone()));
        assert!(controller.is_present());
        assert_eq!(fresh.icon_writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_delay_keeps_icon_usable_until_timer_fires() {
        let shared: SharedTrayController<FakeTray> =
            Arc::new(Mutex::new(TrayController::new(PlatformVariant::Other)));
        let tray = FakeTray::default();
        shared.lock().unwrap().install(tray.clone());

        let timer = tokio::spawn(destroy_after_delay(Arc::clone(&shared), DESTROY_DELAY));

        // Before the delay elapses the icon is still Present and updates render.
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        {
            let mut controller = shared.lock().unwrap();
            assert!(controller.is_present());
            controller.update(3);
        }
        assert_eq!(tray.icon_writes(), 2);

        // Let the timer fire; the singleton is cleared and updates become no-ops.
        timer.await.unwrap();
        {
            let mut controller = shared.lock().unwrap();
            assert!(!controller.is_present());
            controller.update(7);
        }
        assert_eq!(tray.icon_writes(), 2);
        assert_eq!(tray.dispose_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_destroy_second_timer_is_noop() {
        let shared: SharedTrayController<FakeTray> =
            Arc::new(Mutex::new(TrayController::new(PlatformVariant::Other)));
        let tray = FakeTray::default();
        shared.lock().unwrap().install(tray.clone());

        let first = tokio::spawn(destroy_after_delay(Arc::clone(&shared), DESTROY_DELAY));
        let second = tokio::spawn(destroy_after_delay(Arc::clone(&shared), DESTROY_DELAY));
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(tray.dispose_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_while_absent_schedules_harmless_timer() {
        let shared: SharedTrayController<FakeTray> =
            Arc::new(Mutex::new(TrayController::new(PlatformVariant::Other)));
        let timer = tokio::spawn(destroy_after_delay(Arc::clone(&shared), DESTROY_DELAY));
        timer.await.unwrap();
        assert!(!shared.lock().unwrap().is_present());
    }

    #[test]
    fn test_menu_layout_other_platforms() {
        let layout = tray_menu_layout(PlatformVariant::Other, true);
        assert_eq!(
            layout,
            vec![
                TrayMenuEntry::ToggleWindow,
                TrayMenuEntry::Separator,
                TrayMenuEntry::Quit,
            ]
        );
        // The Dock-icon flag is meaningless off macOS.
        assert_eq!(layout, tray_menu_layout(PlatformVariant::Other, false));
    }

    #[test]
    fn test_menu_layout_macos_with_dock_icon() {
        assert_eq!(
            tray_menu_layout(PlatformVariant::MacOs, true),
            vec![
                TrayMenuEntry::DisableMenuBarMode,
                TrayMenuEntry::ShowDockIcon { checked: true },
                TrayMenuEntry::Separator,
                TrayMenuEntry::Separator,
                TrayMenuEntry::Quit,
            ]
        );
    }

    #[test]
    fn test_menu_layout_macos_hidden_dock_exposes_app_menu() {
        assert_eq!(
            tray_menu_layout(PlatformVariant::MacOs, false),
            vec![
                TrayMenuEntry::DisableMenuBarMode,
                TrayMenuEntry::ShowDockIcon { checked: false },
                TrayMenuEntry::Separator,
                TrayMenuEntry::AppMenu,
                TrayMenuEntry::Separator,
                TrayMenuEntry::Quit,
            ]
        );
    }
}
