#![forbid(unsafe_code)]

//! Degraded paths are logged, never surfaced.
//!
//! Captures `tracing` events while driving the controllers over failing
//! storage and idle expiry, and checks the levels and fields emitted.
//!
//! Run:
//!   cargo test -p kiosk-core --test tracing_degradation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kiosk_core::api::interpret_response;
use kiosk_core::config::{KioskConfig, ThemeConfig};
use kiosk_core::delegate::Dispatcher;
use kiosk_core::host::DocumentHost;
use kiosk_core::idle::IdleController;
use kiosk_core::memory::{ManualScheduler, MemoryDocument, MemoryStorage, RecordingNavigator};
use kiosk_core::storage::PersistenceAdapter;
use kiosk_core::theme::{Theme, ThemeController, preflight};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn storage_failures_log_at_debug() {
    let events = capture(|| {
        let mut theme = ThemeController::new(
            MemoryDocument::new(),
            MemoryStorage::unavailable(),
            ThemeConfig::default(),
        );
        assert_eq!(theme.init(&mut Dispatcher::new()), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
    });

    let failures: Vec<_> = events
        .iter()
        .filter(|e| e.message.starts_with("storage "))
        .collect();
    assert_eq!(failures.len(), 2, "one failed read and one failed write: {events:?}");
    assert!(failures.iter().all(|e| e.level == tracing::Level::DEBUG));
    assert!(
        failures
            .iter()
            .all(|e| e.fields.get("key").map(String::as_str) == Some("theme"))
    );
    assert!(!events.iter().any(|e| e.level <= tracing::Level::WARN));
}

#[test]
fn head_preflight_logs_unreadable_storage() {
    let mut doc = MemoryDocument::new();
    let events = capture(|| {
        let store = PersistenceAdapter::new(MemoryStorage::unavailable());
        assert_eq!(preflight(&mut doc, &store, &ThemeConfig::default()), Theme::Dark);
    });

    assert_eq!(events.len(), 1, "{events:?}");
    assert_eq!(events[0].level, tracing::Level::DEBUG);
    assert!(events[0].message.starts_with("storage read failed"));
    assert_eq!(events[0].fields.get("key").map(String::as_str), Some("theme"));
    assert_eq!(doc.root_attribute("data-theme").as_deref(), Some("dark"));
}

#[test]
fn idle_redirect_is_logged_with_target() {
    let events = capture(|| {
        let config = KioskConfig::default();
        let mut idle =
            IdleController::from_config(ManualScheduler::new(), &config.app_root, &config.idle);
        let mut nav = RecordingNavigator::at("/kiosk/");
        idle.arm();
        for id in idle.scheduler_mut().advance(config.idle.timeout()) {
            idle.expire(id, &mut nav);
        }
    });

    let redirect = events
        .iter()
        .find(|e| e.message.contains("returning to kiosk home"))
        .expect("redirect should be logged");
    assert_eq!(redirect.level, tracing::Level::DEBUG);
    assert_eq!(redirect.fields.get("target").map(String::as_str), Some("/kiosk"));
    assert_eq!(redirect.fields.get("location").map(String::as_str), Some("/kiosk"));
}

#[test]
fn api_errors_log_once_at_error() {
    let events = capture(|| {
        assert!(interpret_response("/kiosk/api/cart", 503, "").is_err());
    });
    let errors: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "API request error");
    assert_eq!(
        errors[0].fields.get("url").map(String::as_str),
        Some("/kiosk/api/cart")
    );
}
