#![forbid(unsafe_code)]

//! Persistence adapter that never fails outward.
//!
//! Storage can be disabled, sandboxed or over quota at any time. Callers of
//! [`PersistenceAdapter`] only ever see "a value" or "no value"; backend
//! errors are logged at `debug` and dropped.

use tracing::debug;

use crate::host::KeyValueStore;

/// Narrow, infallible view over a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct PersistenceAdapter<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Read `key`; absent and failed reads are both `None`.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                debug!(key, error = %err, "storage read failed; treating as absent");
                None
            }
        }
    }

    /// Best-effort write of `value` under `key`. Failures are not retried.
    pub fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set_item(key, value) {
            debug!(key, error = %err, "storage write failed; preference not persisted");
        }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwrap the adapter.
    pub fn into_inner(self) -> S {
        self.store
    }
}
