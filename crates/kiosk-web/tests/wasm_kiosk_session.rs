#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

//! Browser tests for `installKiosk`: page globals, capture-phase activity
//! tracking, zoom suppression and the `setTimeout`-backed countdown.
//!
//! Every session is installed under `APP_ROOT = "/bimba/"` so the test page
//! itself is never a guarded kiosk screen and expiry does not navigate away.
//!
//! Run:
//!   wasm-pack test --headless --chrome crates/kiosk-web

use js_sys::{JSON, Promise, Reflect};
use kiosk_web::{KioskSession, install_kiosk};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Element, Event, EventInit, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().expect("test runs in a browser")
}

fn document() -> Document {
    window().document().expect("window has a document")
}

fn set_global(name: &str, value: &JsValue) {
    Reflect::set(&window(), &name.into(), value).expect("set global");
}

fn clear_globals() {
    for name in ["APP_ROOT", "KIOSK_CONFIG"] {
        let _ = Reflect::delete_property(&window(), &name.into());
    }
}

/// Install a session under `/bimba/`, optionally with a `KIOSK_CONFIG` object.
fn install(config_json: Option<&str>) -> KioskSession {
    clear_globals();
    set_global("APP_ROOT", &"/bimba/".into());
    if let Some(json) = config_json {
        set_global("KIOSK_CONFIG", &JSON::parse(json).expect("config json"));
    }
    let session = install_kiosk().expect("installKiosk");
    clear_globals();
    session
}

fn event(kind: &str, cancelable: bool) -> Event {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(cancelable);
    Event::new_with_event_init_dict(kind, &init).expect("event")
}

fn child_of_body() -> Element {
    let doc = document();
    let child = doc.create_element("div").expect("div");
    doc.body()
        .expect("body")
        .append_child(&child)
        .expect("append child");
    child
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("timer resolves");
}

#[wasm_bindgen_test]
fn install_arms_and_honours_app_root() {
    let session = install(None);
    assert!(session.armed());
    assert_eq!(session.home_path(), "/bimba/kiosk");
    session.cancel();
    assert!(!session.armed());
}

#[wasm_bindgen_test]
fn activity_rearms_even_when_propagation_stops() {
    let session = install(None);
    session.cancel();

    let child = child_of_body();
    let stop = Closure::<dyn FnMut(Event)>::new(|event: Event| event.stop_propagation());
    child
        .add_event_listener_with_callback("mousemove", stop.as_ref().unchecked_ref())
        .expect("listen");

    child.dispatch_event(&event("mousemove", false)).expect("dispatch");
    assert!(session.armed(), "capture listener should see the move");

    session.cancel();
    child.remove();
}

#[wasm_bindgen_test]
fn double_click_default_is_prevented() {
    let session = install(None);
    session.cancel();

    let dblclick = event("dblclick", true);
    let delivered = document()
        .body()
        .expect("body")
        .dispatch_event(&dblclick)
        .expect("dispatch");
    assert!(!delivered);
    assert!(dblclick.default_prevented());
}

#[wasm_bindgen_test]
async fn countdown_expires_through_the_browser_timer() {
    let session = install(Some(r#"{"idle":{"timeout_ms":40}}"#));
    assert!(session.armed());

    sleep(150).await;
    assert!(!session.armed(), "timeout should have fired and cleared");

    session.rearm();
    assert!(session.armed());
    session.cancel();
    assert!(!session.armed());

    sleep(150).await;
    assert!(!session.armed(), "a cleared timeout must not re-arm");

    session.rearm();
    session.rearm();
    sleep(150).await;
    assert!(!session.armed(), "only the latest timeout stays live");
}
