#![forbid(unsafe_code)]

//! Kiosk inactivity controller.
//!
//! One timeout is pending at a time. Every qualifying interaction re-arms it;
//! when it expires the kiosk returns to its home screen, but only if the
//! current location is the home or products screen. Elsewhere (cart,
//! checkout, admin) expiry is a no-op and the controller stays idle until the
//! next interaction re-arms it.
//!
//! The location guard is evaluated at expiry only, so a stale timer left
//! behind by a navigation that produced no interaction fires harmlessly.

use core::time::Duration;

use tracing::{debug, trace};

use crate::config::IdleConfig;
use crate::host::{Navigator, Scheduler, TimerId};
use crate::path::{KioskPaths, normalize_location};

/// Input events that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

impl InteractionKind {
    /// Every qualifying interaction.
    pub const ALL: [Self; 5] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
    ];

    /// DOM event type the host listens to.
    #[must_use]
    pub const fn dom_event(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::PointerMove => "mousemove",
            Self::KeyPress => "keypress",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
        }
    }

    /// Map a DOM event type back to its kind.
    #[must_use]
    pub fn from_dom_event(event_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.dom_event() == event_type)
    }
}

/// What happened when a timeout fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleOutcome {
    /// The location was guarded; navigated to the contained home path.
    Redirected(String),
    /// The location was not guarded; nothing happened.
    Ignored,
    /// The timeout was not the pending one (already cancelled or replaced).
    Stale,
}

/// Owns the single inactivity timeout of one page session.
#[derive(Debug, Clone)]
pub struct IdleController<S> {
    scheduler: S,
    pending: Option<TimerId>,
    timeout: Duration,
    paths: KioskPaths,
}

impl<S: Scheduler> IdleController<S> {
    /// Controller for the given routes. Nothing is armed yet.
    #[must_use]
    pub fn new(scheduler: S, paths: KioskPaths, timeout: Duration) -> Self {
        Self {
            scheduler,
            pending: None,
            timeout,
            paths,
        }
    }

    /// Controller configured from `config`, with routes under `app_root`.
    #[must_use]
    pub fn from_config(scheduler: S, app_root: &str, config: &IdleConfig) -> Self {
        let paths = KioskPaths::new(app_root, &config.home_segment, &config.products_segment);
        Self::new(scheduler, paths, config.timeout())
    }

    /// Cancel any pending timeout and schedule a fresh one.
    pub fn arm(&mut self) -> TimerId {
        self.cancel();
        let id = self.scheduler.schedule(self.timeout);
        trace!(timer = id.0, timeout_ms = self.timeout.as_millis() as u64, "idle timer armed");
        self.pending = Some(id);
        id
    }

    /// Cancel the pending timeout, if any.
    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Record user activity.
    pub fn on_interaction(&mut self, kind: InteractionKind) -> TimerId {
        trace!(?kind, "interaction");
        self.arm()
    }

    /// Handle the timeout `fired`, redirecting home when the current location
    /// is the home or products screen.
    pub fn expire(&mut self, fired: TimerId, navigator: &mut impl Navigator) -> IdleOutcome {
        if self.pending != Some(fired) {
            trace!(timer = fired.0, "stale idle timer ignored");
            return IdleOutcome::Stale;
        }
        self.pending = None;

        let location = navigator.current_path();
        if self.paths.is_idle_guarded(&location) {
            let home = self.paths.home().to_owned();
            debug!(
                location = normalize_location(&location),
                target = home.as_str(),
                "idle timeout; returning to kiosk home"
            );
            navigator.navigate(&home);
            IdleOutcome::Redirected(home)
        } else {
            debug!(location = location.as_str(), "idle timeout outside kiosk screens; no redirect");
            IdleOutcome::Ignored
        }
    }

    /// The pending timeout, if armed.
    #[must_use]
    pub const fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn paths(&self) -> &KioskPaths {
        &self.paths
    }

    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
