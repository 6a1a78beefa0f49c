#![forbid(unsafe_code)]

//! Capabilities the embedding environment provides to the controllers.
//!
//! Controllers never touch a browser directly. The host (a real page through
//! `kiosk-web`, or the in-memory implementations in [`crate::memory`]) hands
//! them exactly these seams: key-value storage, the root document, a one-shot
//! timer scheduler, navigation, and ancestor matching for delegated clicks.

use core::time::Duration;

use thiserror::Error;

/// Failure reported by a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage is disabled or inaccessible in this context (sandboxed frame,
    /// private mode, blocked cookies).
    #[error("storage unavailable")]
    Unavailable,
    /// The backend rejected the operation (quota exceeded, security error).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key-value storage (e.g. `localStorage`).
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The parts of the document the controllers read and mutate.
pub trait DocumentHost {
    /// Read an attribute of the root element.
    fn root_attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute on the root element.
    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Remove an attribute from the root element. Absent attributes are a no-op.
    fn remove_root_attribute(&mut self, name: &str);

    /// Replace the text content of every element matching `selector`.
    ///
    /// Returns how many elements were updated; zero is not an error.
    fn set_text_all(&mut self, selector: &str, text: &str) -> usize;
}

/// Opaque identifier of one scheduled timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// One-shot timer scheduling on the host's event queue.
pub trait Scheduler {
    /// Schedule a timeout firing once after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending timeout. Unknown or already-fired ids are a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Current location and page navigation.
pub trait Navigator {
    /// Path component of the current location.
    fn current_path(&self) -> String;

    /// Navigate to `href`, tearing the current page down.
    fn navigate(&mut self, href: &str);
}

/// Event target that can be tested against a selector, including its ancestors.
pub trait DelegateTarget {
    /// Whether this target or any of its ancestors matches `selector`.
    fn closest(&self, selector: &str) -> bool;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<T: DocumentHost + ?Sized> DocumentHost for &mut T {
    fn root_attribute(&self, name: &str) -> Option<String> {
        (**self).root_attribute(name)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        (**self).set_root_attribute(name, value);
    }

    fn remove_root_attribute(&mut self, name: &str) {
        (**self).remove_root_attribute(name);
    }

    fn set_text_all(&mut self, selector: &str, text: &str) -> usize {
        (**self).set_text_all(selector, text)
    }
}

impl<T: Navigator + ?Sized> Navigator for &mut T {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn navigate(&mut self, href: &str) {
        (**self).navigate(href);
    }
}
