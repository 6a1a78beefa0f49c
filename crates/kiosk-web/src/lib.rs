#![forbid(unsafe_code)]

//! Browser bindings for the kiosk controllers.
//!
//! The JS-facing surface is exported through `wasm-bindgen` and only
//! compiled on `wasm32`:
//!
//! - `applyInitialTheme()` from an inline `<head>` script, before first paint;
//! - `installThemeToggle()` once per page (defers to `DOMContentLoaded`);
//! - `installKiosk()` on kiosk screens: idle redirect and zoom suppression;
//! - `apiRequest(url, options)` and `formatCurrency(amount)` helpers.
//!
//! [`bootstrap`] holds the browser-independent page-load decisions.

pub mod bootstrap;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    KioskSession, api_request, apply_initial_theme, format_currency, install_kiosk,
    install_theme_toggle,
};
