//! Tray icon assets and selection.
//!
//! The four tray images live in `static/` and are embedded at compile time so
//! the tray never depends on files being present next to the installed binary.
//! macOS uses the template pair (the OS tints them to match the menu bar);
//! other platforms use the full-color pair.

use crate::platform::PlatformVariant;

pub const ICON_TRAY: &[u8] = include_bytes!("../static/IconTray.png");
pub const ICON_TRAY_UNREAD: &[u8] = include_bytes!("../static/IconTrayUnread.png");
pub const ICON_MENU_BAR_TEMPLATE: &[u8] = include_bytes!("../static/IconMenuBarTemplate.png");
pub const ICON_MENU_BAR_UNREAD_TEMPLATE: &[u8] =
    include_bytes!("../static/IconMenuBarUnreadTemplate.png");

/// One of the four bundled tray images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAsset {
    Tray,
    TrayUnread,
    MenuBarTemplate,
    MenuBarUnreadTemplate,
}

impl IconAsset {
    /// Picks the image for the given platform and unread state.
    pub fn select(variant: PlatformVariant, has_unread: bool) -> Self {
        match (variant, has_unread) {
            (PlatformVariant::MacOs, false) => Self::MenuBarTemplate,
            (PlatformVariant::MacOs, true) => Self::MenuBarUnreadTemplate,
            (PlatformVariant::Other, false) => Self::Tray,
            (PlatformVariant::Other, true) => Self::TrayUnread,
        }
    }

    /// File name of the asset under `static/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Tray => "IconTray.png",
            Self::TrayUnread => "IconTrayUnread.png",
            Self::MenuBarTemplate => "IconMenuBarTemplate.png",
            Self::MenuBarUnreadTemplate => "IconMenuBarUnreadTemplate.png",
        }
    }

    /// Raw PNG bytes of the asset.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Self::Tray => ICON_TRAY,
            Self::TrayUnread => ICON_TRAY_UNREAD,
            Self::MenuBarTemplate => ICON_MENU_BAR_TEMPLATE,
            Self::MenuBarUnreadTemplate => ICON_MENU_BAR_UNREAD_TEMPLATE,
        }
    }

    /// True for the macOS template images, which the OS recolors itself.
    pub fn is_template(self) -> bool {
        matches!(self, Self::MenuBarTemplate | Self::MenuBarUnreadTemplate)
    }
}
