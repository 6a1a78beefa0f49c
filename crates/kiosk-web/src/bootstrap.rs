#![forbid(unsafe_code)]

//! Page-load decisions that do not need a browser.

use kiosk_core::config::KioskConfig;
use kiosk_core::path::resolve_root;
use tracing::warn;

/// Global holding the deployment prefix (`window.APP_ROOT`).
pub const APP_ROOT_GLOBAL: &str = "APP_ROOT";
/// Optional global object overriding [`KioskConfig`] fields.
pub const CONFIG_GLOBAL: &str = "KIOSK_CONFIG";

/// Build the page configuration from the globals read at load.
///
/// An invalid override is logged and replaced by defaults; `APP_ROOT`, when
/// set, wins over any `app_root` in the override.
#[must_use]
pub fn resolve_config(app_root: Option<&str>, config_json: Option<&str>) -> KioskConfig {
    let mut config = match config_json {
        Some(json) => KioskConfig::from_json_str(json).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring invalid kiosk config; using defaults");
            KioskConfig::default()
        }),
        None => KioskConfig::default(),
    };
    if let Some(root) = app_root {
        config.app_root = resolve_root(Some(root));
    }
    config
}

/// Controllers that touch the DOM wait for `DOMContentLoaded` while the
/// document is still parsing.
#[must_use]
pub fn should_defer_init(ready_state: &str) -> bool {
    ready_state == "loading"
}
