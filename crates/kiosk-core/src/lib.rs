#![forbid(unsafe_code)]

//! `kiosk-core` holds the stateful presentation glue of the kiosk ordering
//! interface, independent of any browser.
//!
//! - [`theme`]: manual light/dark toggle with a persisted preference and
//!   flash-free initialization.
//! - [`idle`]: inactivity timer that returns the kiosk to its home screen.
//! - [`touch`]: pinch, double-tap and double-click suppression.
//! - [`delegate`]: single-listener event delegation by selector.
//!
//! Everything the controllers need from the environment goes through the
//! traits in [`host`]; [`memory`] provides deterministic in-memory hosts.
//! `kiosk-web` binds the same controllers to a real page.

pub mod api;
pub mod config;
pub mod currency;
pub mod delegate;
pub mod host;
pub mod idle;
pub mod memory;
pub mod path;
pub mod storage;
pub mod theme;
pub mod touch;

pub use config::{ConfigError, KioskConfig};
pub use delegate::{Dispatcher, KioskAction};
pub use host::{
    DelegateTarget, DocumentHost, KeyValueStore, Navigator, Scheduler, StorageError, TimerId,
};
pub use idle::{IdleController, IdleOutcome, InteractionKind};
pub use path::KioskPaths;
pub use storage::PersistenceAdapter;
pub use theme::{Theme, ThemeController};
pub use touch::{TouchGuard, Verdict};
