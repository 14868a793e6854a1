//! macOS Dock presence for menu bar mode.
//!
//! Hiding the Dock icon means flipping the activation policy to Accessory;
//! showing it again flips back to Regular. After Accessory -> Regular, macOS
//! sometimes renders a generic icon in the Dock, so we re-apply the bundled
//! logo through AppKit. On other platforms there is no Dock and everything
//! here is a no-op.

#[cfg(target_os = "macos")]
use tracing::warn;

/// Shows or hides the application's Dock presence.
pub fn set_dock_visible<R: tauri::Runtime>(app: &tauri::AppHandle<R>, visible: bool) {
    #[cfg(target_os = "macos")]
    {
        let policy = if visible {
            tauri::ActivationPolicy::Regular
        } else {
            tauri::ActivationPolicy::Accessory
        };
        if let Err(e) = app.set_activation_policy(policy) {
            warn!(error = %e, visible, "Failed to set activation policy");
        }
        if visible {
            restore_dock_icon(crate::APP_LOGO_PNG);
        }
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = (app, visible);
    }
}

/// Sets the application icon in the Dock from raw PNG bytes.
/// Call after switching back to the Regular activation policy.
#[cfg(target_os = "macos")]
pub fn restore_dock_icon(logo_png: &[u8]) {
    use objc::msg_send;
    use objc::runtime::{Class, Object};

    unsafe {
        let Some(ns_data_class) = Class::get("NSData") else {
            warn!("NSData class not available");
            return;
        };
        let Some(ns_image_class) = Class::get("NSImage") else {
            warn!("NSImage class not available");
            return;
        };
        let Some(ns_app_class) = Class::get("NSApplication") else {
            warn!("NSApplication class not available");
            return;
        };

        // NSData *data = [NSData dataWithBytes:bytes length:length];
        let data: *mut Object =
            msg_send![ns_data_class, dataWithBytes: logo_png.as_ptr() length: logo_png.len()];
        if data.is_null() {
            warn!("Failed to create NSData from logo bytes");
            return;
        }

        // NSImage *image = [[NSImage alloc] initWithData:data];
        let image_alloc: *mut Object = msg_send![ns_image_class, alloc];
        let image: *mut Object = msg_send![image_alloc, initWithData: data];
        if image.is_null() {
            let _: () = msg_send![image_alloc, release];
            warn!("Failed to create NSImage from logo data");
            return;
        }

        // [NSApp setApplicationIconImage:image]
        let ns_app: *mut Object = msg_send![ns_app_class, sharedApplication];
        let _: () = msg_send![ns_app, setApplicationIconImage: image];

        let _: () = msg_send![image, release];
    }
}
