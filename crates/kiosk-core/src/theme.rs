#![forbid(unsafe_code)]

//! Manual light/dark theme toggle with a persisted preference.
//!
//! The root-element attribute (`data-theme` by default) is the single source
//! of truth consumed by the stylesheets. It is only ever absent, `dark` or
//! `light`; absent reads back as [`Theme::Dark`].
//!
//! Initialization is split in two so the page never flashes the wrong theme:
//!
//! 1. [`preflight`] runs inline from `<head>` and applies the persisted theme
//!    or the `dark` default before first paint.
//! 2. [`ThemeController::init`] runs once the document is ready, re-applies a
//!    valid persisted value, syncs the toggle labels and registers the
//!    delegated toggle route.
//!
//! There is no OS-preference detection: the theme only changes on user action.

use core::fmt;

use tracing::debug;

use crate::config::ThemeConfig;
use crate::delegate::{Dispatcher, KioskAction};
use crate::host::{DocumentHost, KeyValueStore};
use crate::storage::PersistenceAdapter;

/// Visual mode of the interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Attribute/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse the exact strings `"dark"` and `"light"`; anything else is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Early page-load step: apply the persisted theme, or `dark` when nothing
/// valid is stored. Returns the theme now on the root element.
pub fn preflight<D, S>(
    document: &mut D,
    store: &PersistenceAdapter<S>,
    config: &ThemeConfig,
) -> Theme
where
    D: DocumentHost + ?Sized,
    S: KeyValueStore,
{
    let theme = store
        .read(&config.storage_key)
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_default();
    document.set_root_attribute(&config.attribute, theme.as_str());
    theme
}

/// Owns the theme state of one page.
#[derive(Debug, Clone)]
pub struct ThemeController<D, S> {
    document: D,
    store: PersistenceAdapter<S>,
    config: ThemeConfig,
}

impl<D: DocumentHost, S: KeyValueStore> ThemeController<D, S> {
    #[must_use]
    pub fn new(document: D, store: S, config: ThemeConfig) -> Self {
        Self {
            document,
            store: PersistenceAdapter::new(store),
            config,
        }
    }

    /// Theme currently reflected on the root element; anything but `light`
    /// (including a missing attribute) is `dark`.
    #[must_use]
    pub fn current_theme(&self) -> Theme {
        self.document
            .root_attribute(&self.config.attribute)
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    /// Set the root attribute to `theme`, or remove it for `None`.
    pub fn apply(&mut self, theme: Option<Theme>) {
        match theme {
            Some(theme) => {
                self.document
                    .set_root_attribute(&self.config.attribute, theme.as_str());
            }
            None => self.document.remove_root_attribute(&self.config.attribute),
        }
    }

    /// [`Self::apply`] for a raw value: only `dark`/`light` are set, anything
    /// else clears the attribute.
    pub fn apply_raw(&mut self, value: &str) {
        self.apply(Theme::parse(value));
    }

    /// Label text for `theme`: the action a click would take, not the state.
    #[must_use]
    pub fn label_for(&self, theme: Theme) -> &str {
        self.config.label_for(theme)
    }

    /// Rewrite every toggle label for `theme`. Returns how many were updated.
    pub fn update_labels(&mut self, theme: Theme) -> usize {
        let text = self.config.label_for(theme);
        self.document
            .set_text_all(&self.config.label_selector, text)
    }

    /// Valid persisted theme, if any.
    #[must_use]
    pub fn persisted_theme(&self) -> Option<Theme> {
        self.store
            .read(&self.config.storage_key)
            .as_deref()
            .and_then(Theme::parse)
    }

    /// Switch to the other theme: apply, persist, relabel.
    ///
    /// A failed write leaves the applied theme and labels in place.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current_theme().toggled();
        self.apply(Some(next));
        self.store.write(&self.config.storage_key, next.as_str());
        let labels = self.update_labels(next);
        debug!(theme = next.as_str(), labels, "theme toggled");
        next
    }

    /// Apply a valid persisted theme (otherwise keep what the page already
    /// shows), sync labels and register the delegated toggle route.
    pub fn init(&mut self, dispatcher: &mut Dispatcher<KioskAction>) -> Theme {
        if let Some(saved) = self.persisted_theme() {
            self.apply(Some(saved));
        }
        let current = self.current_theme();
        self.update_labels(current);
        dispatcher.route(&self.config.toggle_selector, KioskAction::ToggleTheme);
        debug!(theme = current.as_str(), "theme controller initialized");
        current
    }

    #[must_use]
    pub const fn config(&self) -> &ThemeConfig {
        &self.config
    }

    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub const fn storage(&self) -> &PersistenceAdapter<S> {
        &self.store
    }
}
