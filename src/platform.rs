//! Platform variant used for tray presentation decisions.
//!
//! macOS gets template (monochrome, OS-tinted) menu-bar icons, extra tray menu
//! entries, and native show-menu-on-single-click behavior; every other desktop
//! gets full-color icons and an explicit "Toggle" entry. Keeping the variant a
//! value (instead of scattered `cfg` checks) lets tests pin a variant without
//! depending on the host OS.

/// Which tray presentation rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformVariant {
    /// macOS menu bar: template icons, single-click opens the menu natively.
    MacOs,
    /// Everything else (Windows, Linux): full-color icons, click toggles the window.
    Other,
}

impl PlatformVariant {
    /// The variant for the OS this binary was compiled for.
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::MacOs
        }
        #[cfg(not(target_os = "macos"))]
        {
            Self::Other
        }
    }

    pub fn is_macos(self) -> bool {
        self == Self::MacOs
    }
}
