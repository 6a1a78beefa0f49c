#![forbid(unsafe_code)]

//! Delegated event dispatch.
//!
//! A single listener on a stable root (the document) observes every event and
//! asks the [`Dispatcher`] which action, if any, the event's target maps to.
//! Controls added to the page later are matched without re-binding.

use tracing::trace;

use crate::host::DelegateTarget;

/// Action produced by the kiosk's delegated click listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskAction {
    /// Switch between the dark and light theme.
    ToggleTheme,
}

/// Selector-to-action routing table.
#[derive(Debug, Clone)]
pub struct Dispatcher<A> {
    routes: Vec<(String, A)>,
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<A> Dispatcher<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route targets inside `selector` to `action`.
    ///
    /// Registering the same selector again replaces its action.
    pub fn route(&mut self, selector: &str, action: A) {
        if let Some(slot) = self.routes.iter_mut().find(|(s, _)| s == selector) {
            slot.1 = action;
        } else {
            self.routes.push((selector.to_owned(), action));
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Action for the first route whose selector matches `target` or an ancestor.
    pub fn dispatch(&self, target: &impl DelegateTarget) -> Option<&A> {
        let (selector, action) = self
            .routes
            .iter()
            .find(|(selector, _)| target.closest(selector))?;
        trace!(selector = selector.as_str(), "delegated event matched");
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementChain, MemoryElement};
    use pretty_assertions::assert_eq;

    fn label_inside_toggle() -> ElementChain {
        ElementChain::new(vec![
            MemoryElement::new("span").with_class("theme-toggle-label"),
            MemoryElement::new("a").with_class("theme-toggle"),
            MemoryElement::new("header"),
        ])
    }

    #[test]
    fn dispatch_matches_ancestor() {
        let mut d = Dispatcher::new();
        d.route(".theme-toggle", KioskAction::ToggleTheme);
        assert_eq!(d.dispatch(&label_inside_toggle()), Some(&KioskAction::ToggleTheme));
    }

    #[test]
    fn dispatch_ignores_unrelated_targets() {
        let mut d = Dispatcher::new();
        d.route(".theme-toggle", KioskAction::ToggleTheme);
        let chain = ElementChain::new(vec![MemoryElement::new("button").with_class("add-to-cart")]);
        assert_eq!(d.dispatch(&chain), None);
    }

    #[test]
    fn rerouting_same_selector_does_not_duplicate() {
        let mut d = Dispatcher::new();
        d.route(".theme-toggle", 1);
        d.route(".theme-toggle", 2);
        assert_eq!(d.len(), 1);
        assert_eq!(d.dispatch(&label_inside_toggle()), Some(&2));
    }

    #[test]
    fn first_registered_route_wins() {
        let mut d = Dispatcher::new();
        d.route("header", "header");
        d.route(".theme-toggle", "toggle");
        assert_eq!(d.dispatch(&label_inside_toggle()), Some(&"header"));
    }
}
