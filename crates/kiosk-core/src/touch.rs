#![forbid(unsafe_code)]

//! Zoom suppression for the kiosk viewport.
//!
//! Pinch (multi-touch start), double tap (two touch-ends within the window)
//! and double click are rejected so the layout stays fixed on the kiosk
//! screen.

use core::time::Duration;

use crate::config::TouchConfig;

/// Whether the host should let an event through or call `preventDefault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Prevent,
}

impl Verdict {
    #[must_use]
    pub const fn is_prevent(self) -> bool {
        matches!(self, Self::Prevent)
    }
}

/// Tracks the last touch-end to detect double taps.
#[derive(Debug, Clone)]
pub struct TouchGuard {
    window: Duration,
    last_touch_end: Option<Duration>,
}

impl Default for TouchGuard {
    fn default() -> Self {
        Self::new(TouchConfig::default().double_tap_window())
    }
}

impl TouchGuard {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_touch_end: None,
        }
    }

    #[must_use]
    pub const fn from_config(config: &TouchConfig) -> Self {
        Self::new(config.double_tap_window())
    }

    /// A touch starting with more than one finger is a pinch.
    #[must_use]
    pub const fn on_touch_start(&self, touches: u32) -> Verdict {
        if touches > 1 {
            Verdict::Prevent
        } else {
            Verdict::Allow
        }
    }

    /// A touch-end at `now` (monotonic) within the window of the previous one
    /// is a double tap. The first touch-end is always allowed.
    pub fn on_touch_end(&mut self, now: Duration) -> Verdict {
        let verdict = match self.last_touch_end {
            Some(last) if now.saturating_sub(last) <= self.window => Verdict::Prevent,
            _ => Verdict::Allow,
        };
        self.last_touch_end = Some(now);
        verdict
    }

    /// Double clicks are always rejected.
    #[must_use]
    pub const fn on_double_click(&self) -> Verdict {
        Verdict::Prevent
    }
}
