#![forbid(unsafe_code)]

//! Kiosk configuration as data.
//!
//! Every field defaults to the production constants, so
//! `KioskConfig::default()` is the stock kiosk. A page may override any
//! subset through a JSON object:
//!
//! ```json
//! { "app_root": "/bimba", "idle": { "timeout_ms": 120000 } }
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::KioskPaths;
use crate::theme::Theme;

/// Inactivity threshold before the kiosk returns home (5 minutes).
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 300_000;
/// Two touch-ends closer than this are a double tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 300;
/// Storage key holding the persisted theme.
pub const DEFAULT_STORAGE_KEY: &str = "theme";
/// Root-element attribute consumed by the stylesheets.
pub const DEFAULT_THEME_ATTRIBUTE: &str = "data-theme";
/// Clickable theme toggles.
pub const DEFAULT_TOGGLE_SELECTOR: &str = ".theme-toggle";
/// Elements that display the toggle action.
pub const DEFAULT_LABEL_SELECTOR: &str = ".theme-toggle-label";

/// Error loading or validating a [`KioskConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document did not parse.
    #[error("invalid kiosk config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but holds unusable values.
    #[error("invalid kiosk config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Top-level kiosk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Deployment prefix the application is served under.
    pub app_root: String,
    /// Idle redirect settings.
    pub idle: IdleConfig,
    /// Theme toggle settings.
    pub theme: ThemeConfig,
    /// Touch and zoom suppression settings.
    pub touch: TouchConfig,
}

/// Idle controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Inactivity threshold in milliseconds.
    pub timeout_ms: u64,
    /// Home route segment relative to the app root; also the redirect target.
    pub home_segment: String,
    /// Products route segment relative to the app root.
    pub products_segment: String,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            home_segment: "kiosk".to_owned(),
            products_segment: "kiosk/products".to_owned(),
        }
    }
}

impl IdleConfig {
    /// Inactivity threshold.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Theme controller settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
    pub toggle_selector: String,
    pub label_selector: String,
    /// Label shown while the light theme is active (offers dark).
    pub label_when_light: String,
    /// Label shown while the dark theme is active (offers light).
    pub label_when_dark: String,
}

impl ThemeConfig {
    /// Toggle label for `theme`: the action a click would take, not the state.
    #[must_use]
    pub fn label_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.label_when_light,
            Theme::Dark => &self.label_when_dark,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            attribute: DEFAULT_THEME_ATTRIBUTE.to_owned(),
            toggle_selector: DEFAULT_TOGGLE_SELECTOR.to_owned(),
            label_selector: DEFAULT_LABEL_SELECTOR.to_owned(),
            label_when_light: "Oscuro".to_owned(),
            label_when_dark: "Claro".to_owned(),
        }
    }
}

/// Touch guard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    pub double_tap_window_ms: u64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
        }
    }
}

impl TouchConfig {
    #[must_use]
    pub const fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

impl KioskConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the given application root.
    #[must_use]
    pub fn with_app_root(app_root: &str) -> Self {
        Self {
            app_root: app_root.to_owned(),
            ..Self::default()
        }
    }

    /// Check every field, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.idle.timeout_ms == 0 {
            errors.push("idle.timeout_ms must be greater than zero".to_owned());
        }
        let required = [
            ("idle.home_segment", &self.idle.home_segment),
            ("idle.products_segment", &self.idle.products_segment),
            ("theme.storage_key", &self.theme.storage_key),
            ("theme.attribute", &self.theme.attribute),
            ("theme.toggle_selector", &self.theme.toggle_selector),
            ("theme.label_selector", &self.theme.label_selector),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Kiosk routes resolved against [`Self::app_root`].
    #[must_use]
    pub fn kiosk_paths(&self) -> KioskPaths {
        KioskPaths::new(
            &self.app_root,
            &self.idle.home_segment,
            &self.idle.products_segment,
        )
    }
}
