#![forbid(unsafe_code)]

//! Property-based invariants for the kiosk controllers.
//!
//! 1. **Joining** never produces a doubled slash at the seam; an empty base
//!    yields an absolute path.
//! 2. **Toggle round trip**: two toggles restore the root attribute.
//! 3. **Label idempotence**: relabeling with the same theme is stable.
//! 4. **Normalization**: any persisted value other than `dark`/`light` is
//!    indistinguishable from no persisted value.
//! 5. **Double tap**: a touch-end is prevented exactly when it follows the
//!    previous one within the window.

use core::time::Duration;

use kiosk_core::config::ThemeConfig;
use kiosk_core::delegate::Dispatcher;
use kiosk_core::host::DocumentHost;
use kiosk_core::memory::{MemoryDocument, MemoryElement, MemoryStorage};
use kiosk_core::path::join;
use kiosk_core::theme::{Theme, ThemeController};
use kiosk_core::touch::{TouchGuard, Verdict};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "/{0,3}[a-z]{0,8}(/[a-z]{1,8}){0,2}/{0,3}"
}

fn starting_attribute() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(None), Just(Some("dark")), Just(Some("light"))]
}

fn labelled_document(attr: Option<&str>, labels: usize) -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    if let Some(value) = attr {
        doc.set_root_attribute("data-theme", value);
    }
    for _ in 0..labels {
        doc.append(MemoryElement::new("span").with_class("theme-toggle-label"), "?");
    }
    doc
}

proptest! {
    #[test]
    fn join_has_single_seam(base in segment(), seg in segment()) {
        let joined = join(&base, &seg);
        let trimmed_base = base.trim_end_matches('/');
        let trimmed_seg = seg.trim_start_matches('/');
        if trimmed_base.is_empty() {
            prop_assert!(joined.starts_with('/'));
        } else {
            prop_assert!(joined.starts_with(trimmed_base));
        }
        prop_assert!(!joined[trimmed_base.len()..].starts_with("//"));
        prop_assert!(joined.ends_with(trimmed_seg));
    }

    #[test]
    fn double_toggle_restores_attribute(attr in starting_attribute(), labels in 0usize..4) {
        let mut theme = ThemeController::new(
            labelled_document(attr, labels),
            MemoryStorage::new(),
            ThemeConfig::default(),
        );
        let before = theme.current_theme();
        let first = theme.toggle();
        prop_assert_ne!(first, before);
        let second = theme.toggle();
        prop_assert_eq!(second, before);
        prop_assert_eq!(
            theme.document().root_attribute("data-theme"),
            Some(before.as_str().to_owned())
        );
    }

    #[test]
    fn relabeling_is_idempotent(light in any::<bool>(), labels in 0usize..5) {
        let target = if light { Theme::Light } else { Theme::Dark };
        let mut theme = ThemeController::new(
            labelled_document(None, labels),
            MemoryStorage::new(),
            ThemeConfig::default(),
        );
        theme.update_labels(target);
        let once: Vec<String> = theme
            .document()
            .texts(".theme-toggle-label")
            .into_iter()
            .map(str::to_owned)
            .collect();
        theme.update_labels(target);
        let twice: Vec<String> = theme
            .document()
            .texts(".theme-toggle-label")
            .into_iter()
            .map(str::to_owned)
            .collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unknown_persisted_value_acts_as_absent(
        value in "[a-zA-Z]{0,10}".prop_filter("not a theme", |v| v != "dark" && v != "light"),
        attr in starting_attribute(),
    ) {
        let mut seeded = MemoryStorage::new();
        seeded.insert("theme", &value);
        let mut with_value =
            ThemeController::new(labelled_document(attr, 1), seeded, ThemeConfig::default());
        let mut without_value = ThemeController::new(
            labelled_document(attr, 1),
            MemoryStorage::new(),
            ThemeConfig::default(),
        );

        prop_assert_eq!(
            with_value.init(&mut Dispatcher::new()),
            without_value.init(&mut Dispatcher::new())
        );
        prop_assert_eq!(
            with_value.document().root_attribute("data-theme"),
            without_value.document().root_attribute("data-theme")
        );
        prop_assert_eq!(
            with_value.document().texts(".theme-toggle-label"),
            without_value.document().texts(".theme-toggle-label")
        );
    }

    #[test]
    fn double_tap_window_is_respected(gaps in prop::collection::vec(0u64..1_000, 1..20)) {
        let mut guard = TouchGuard::default();
        let mut now = Duration::from_secs(1);
        prop_assert_eq!(guard.on_touch_end(now), Verdict::Allow);
        for gap in gaps {
            now += Duration::from_millis(gap);
            let expected = if gap <= 300 { Verdict::Prevent } else { Verdict::Allow };
            prop_assert_eq!(guard.on_touch_end(now), expected);
        }
    }
}
