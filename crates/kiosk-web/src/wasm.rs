#![forbid(unsafe_code)]

//! `wasm-bindgen` exports binding the kiosk controllers to the page.
//!
//! Only compiled on `wasm32` targets. Listeners registered here live for the
//! whole page and their closures are leaked with `Closure::forget`.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, JSON, Object, Reflect};
use kiosk_core::api::{ApiError, ApiRequest, interpret_response, report};
use kiosk_core::config::KioskConfig;
use kiosk_core::currency::format_clp;
use kiosk_core::delegate::{Dispatcher, KioskAction};
use kiosk_core::host::{
    DelegateTarget, DocumentHost, KeyValueStore, Navigator, Scheduler, StorageError, TimerId,
};
use kiosk_core::idle::{IdleController, InteractionKind};
use kiosk_core::storage::PersistenceAdapter;
use kiosk_core::theme::{ThemeController, preflight};
use kiosk_core::touch::TouchGuard;
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, Headers, Request, RequestInit, Response,
    Storage, TouchEvent, Window,
};
use web_time::Instant;

use crate::bootstrap::{APP_ROOT_GLOBAL, CONFIG_GLOBAL, resolve_config, should_defer_init};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

/// Route panics and `warn`/`error` events to the browser console. Idempotent;
/// every export calls it first.
fn install_hooks() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        // A logger installed by the embedding page wins.
        let _ = console_log::init_with_level(log::Level::Warn);
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

fn page_config(window: &Window) -> KioskConfig {
    let app_root = Reflect::get(window, &JsValue::from_str(APP_ROOT_GLOBAL))
        .ok()
        .and_then(|value| value.as_string());
    let config_json = Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL))
        .ok()
        .filter(JsValue::is_object)
        .and_then(|value| JSON::stringify(&value).ok())
        .and_then(|json| json.as_string());
    resolve_config(app_root.as_deref(), config_json.as_deref())
}

fn listen(
    target: &web_sys::EventTarget,
    event_type: &str,
    options: Option<&AddEventListenerOptions>,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    match options {
        Some(options) => target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            callback.as_ref().unchecked_ref(),
            options,
        )?,
        None => {
            target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        }
    }
    callback.forget();
    Ok(())
}

/// `window.localStorage`, possibly unavailable.
struct WebStorage {
    storage: Option<Storage>,
}

impl WebStorage {
    fn new(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                debug!(error = js_error_message(&err).as_str(), "localStorage unavailable");
                None
            }
        };
        Self { storage }
    }
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|err| StorageError::Backend(js_error_message(&err)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(js_error_message(&err)))
    }
}

/// The live document; the root element is `document.documentElement`.
struct WebDocument {
    document: Document,
}

impl DocumentHost for WebDocument {
    fn root_attribute(&self, name: &str) -> Option<String> {
        self.document.document_element()?.get_attribute(name)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(name, value);
        }
    }

    fn remove_root_attribute(&mut self, name: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.remove_attribute(name);
        }
    }

    fn set_text_all(&mut self, selector: &str, text: &str) -> usize {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return 0;
        };
        let mut updated = 0;
        for idx in 0..nodes.length() {
            if let Some(node) = nodes.item(idx) {
                node.set_text_content(Some(text));
                updated += 1;
            }
        }
        updated
    }
}

struct WebLocation {
    window: Window,
}

impl Navigator for WebLocation {
    fn current_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn navigate(&mut self, href: &str) {
        if let Err(err) = self.window.location().set_href(href) {
            warn!(href, error = js_error_message(&err).as_str(), "navigation failed");
        }
    }
}

struct WebTarget(Element);

impl DelegateTarget for WebTarget {
    fn closest(&self, selector: &str) -> bool {
        matches!(self.0.closest(selector), Ok(Some(_)))
    }
}

type WebIdle = IdleController<WebScheduler>;

struct PendingTimeout {
    id: TimerId,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// `setTimeout`-backed scheduler whose timeouts call back into the owning
/// idle controller. Holds at most one live timeout.
struct WebScheduler {
    window: Window,
    controller: Weak<RefCell<WebIdle>>,
    next_id: u64,
    current: Option<PendingTimeout>,
}

impl WebScheduler {
    fn new(window: Window, controller: Weak<RefCell<WebIdle>>) -> Self {
        Self {
            window,
            controller,
            next_id: 0,
            current: None,
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let controller = self.controller.clone();
        let window = self.window.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(idle) = controller.upgrade() else {
                return;
            };
            let Ok(mut idle) = idle.try_borrow_mut() else {
                trace!(timer = id.0, "idle controller busy; timeout dropped");
                return;
            };
            let mut location = WebLocation {
                window: window.clone(),
            };
            idle.expire(id, &mut location);
        });

        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms,
            ) {
            Ok(handle) => {
                self.current = Some(PendingTimeout {
                    id,
                    handle,
                    _callback: callback,
                });
            }
            Err(err) => {
                warn!(error = js_error_message(&err).as_str(), "setTimeout failed");
                self.current = None;
            }
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.current.as_ref().is_some_and(|pending| pending.id == id) {
            if let Some(pending) = self.current.take() {
                self.window.clear_timeout_with_handle(pending.handle);
            }
        }
    }
}

/// Apply the persisted theme (or `dark`) to the root element before first
/// paint. Returns the applied theme.
#[wasm_bindgen(js_name = applyInitialTheme)]
pub fn apply_initial_theme() -> Result<String, JsValue> {
    install_hooks();
    let window = window()?;
    let config = page_config(&window);
    let storage = PersistenceAdapter::new(WebStorage::new(&window));
    let mut doc = WebDocument {
        document: document(&window)?,
    };
    Ok(preflight(&mut doc, &storage, &config.theme).to_string())
}

fn init_theme(window: &Window, document: &Document) -> Result<(), JsValue> {
    let config = page_config(window);
    let mut dispatcher = Dispatcher::new();
    let mut controller = ThemeController::new(
        WebDocument {
            document: document.clone(),
        },
        WebStorage::new(window),
        config.theme,
    );
    controller.init(&mut dispatcher);

    let controller = Rc::new(RefCell::new(controller));
    listen(document, "click", None, move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if dispatcher.dispatch(&WebTarget(target)) == Some(&KioskAction::ToggleTheme) {
            event.prevent_default();
            if let Ok(mut theme) = controller.try_borrow_mut() {
                theme.toggle();
            }
        }
    })
}

/// Initialize the theme toggle once the document is ready and register the
/// delegated click listener.
#[wasm_bindgen(js_name = installThemeToggle)]
pub fn install_theme_toggle() -> Result<(), JsValue> {
    install_hooks();
    let window = window()?;
    let document = document(&window)?;
    if should_defer_init(&document.ready_state()) {
        let deferred_window = window.clone();
        let deferred_document = document.clone();
        let callback = Closure::once_into_js(move || {
            if let Err(err) = init_theme(&deferred_window, &deferred_document) {
                console_error(&js_error_message(&err));
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    } else {
        init_theme(&window, &document)
    }
}

/// Handle to the kiosk idle controller of this page.
#[wasm_bindgen]
pub struct KioskSession {
    idle: Rc<RefCell<WebIdle>>,
}

#[wasm_bindgen]
impl KioskSession {
    /// Restart the inactivity countdown.
    pub fn rearm(&self) {
        if let Ok(mut idle) = self.idle.try_borrow_mut() {
            idle.arm();
        }
    }

    /// Stop the countdown until the next interaction.
    pub fn cancel(&self) {
        if let Ok(mut idle) = self.idle.try_borrow_mut() {
            idle.cancel();
        }
    }

    /// Whether a countdown is pending.
    #[wasm_bindgen(getter)]
    pub fn armed(&self) -> bool {
        self.idle
            .try_borrow()
            .map(|idle| idle.pending().is_some())
            .unwrap_or(false)
    }

    /// Redirect target used on idle expiry.
    #[wasm_bindgen(getter, js_name = homePath)]
    pub fn home_path(&self) -> String {
        self.idle
            .try_borrow()
            .map(|idle| idle.paths().home().to_owned())
            .unwrap_or_default()
    }
}

/// Install zoom suppression and the idle redirect on a kiosk screen. The
/// countdown starts immediately.
#[wasm_bindgen(js_name = installKiosk)]
pub fn install_kiosk() -> Result<KioskSession, JsValue> {
    install_hooks();
    let window = window()?;
    let document = document(&window)?;
    let config = page_config(&window);

    let blocking = AddEventListenerOptions::new();
    blocking.set_passive(false);

    let guard = Rc::new(RefCell::new(TouchGuard::from_config(&config.touch)));
    let epoch = Instant::now();

    let start_guard = Rc::clone(&guard);
    listen(&document, "touchstart", Some(&blocking), move |event: Event| {
        let touches = event
            .dyn_ref::<TouchEvent>()
            .map_or(0, |touch| touch.touches().length());
        if start_guard.borrow().on_touch_start(touches).is_prevent() {
            event.prevent_default();
        }
    })?;

    let end_guard = Rc::clone(&guard);
    listen(&document, "touchend", None, move |event: Event| {
        if end_guard
            .borrow_mut()
            .on_touch_end(epoch.elapsed())
            .is_prevent()
        {
            event.prevent_default();
        }
    })?;

    let click_guard = Rc::clone(&guard);
    listen(&document, "dblclick", None, move |event: Event| {
        if click_guard.borrow().on_double_click().is_prevent() {
            event.prevent_default();
        }
    })?;

    let idle = Rc::new_cyclic(|weak: &Weak<RefCell<WebIdle>>| {
        RefCell::new(IdleController::from_config(
            WebScheduler::new(window.clone(), weak.clone()),
            &config.app_root,
            &config.idle,
        ))
    });

    let capture = AddEventListenerOptions::new();
    capture.set_capture(true);
    for kind in InteractionKind::ALL {
        let idle = Rc::clone(&idle);
        listen(&document, kind.dom_event(), Some(&capture), move |_event: Event| {
            if let Ok(mut idle) = idle.try_borrow_mut() {
                idle.on_interaction(kind);
            }
        })?;
    }

    idle.borrow_mut().arm();
    debug!(
        home = idle.borrow().paths().home(),
        "kiosk session installed"
    );
    Ok(KioskSession { idle })
}

/// Format an amount as Chilean pesos.
#[wasm_bindgen(js_name = formatCurrency)]
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format_clp(amount)
}

/// Kiosk-side view of a `fetch` options object: method, string headers and a
/// string body. Everything else stays on the options object.
fn request_from_options(url: &str, options: &JsValue) -> ApiRequest {
    let mut request = ApiRequest::new(url);
    if !options.is_object() {
        return request;
    }
    if let Some(method) = Reflect::get(options, &"method".into())
        .ok()
        .and_then(|m| m.as_string())
    {
        request = request.method(&method);
    }
    if let Ok(headers) = Reflect::get(options, &"headers".into()) {
        for (name, value) in header_pairs(&headers) {
            request = request.header(&name, &value);
        }
    }
    if let Some(text) = Reflect::get(options, &"body".into())
        .ok()
        .and_then(|body| body.as_string())
    {
        request = request.body(text);
    }
    request
}

/// String pairs of a `Headers` instance or a plain object.
fn header_pairs(headers: &JsValue) -> Vec<(String, String)> {
    let entries: Vec<JsValue> = if headers.is_instance_of::<Headers>() {
        match js_sys::try_iter(headers) {
            Ok(Some(iter)) => iter.filter_map(Result::ok).collect(),
            _ => Vec::new(),
        }
    } else if let Some(object) = headers.dyn_ref::<Object>() {
        Object::entries(object).iter().collect()
    } else {
        Vec::new()
    };
    entries
        .iter()
        .filter_map(|entry| {
            let pair = Array::from(entry);
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

/// `RequestInit` for `request`: a shallow copy of the caller's options
/// (`credentials`, `mode`, `signal`, non-string bodies, ...) with method,
/// merged headers and the string body set from `request`.
fn request_init(request: &ApiRequest, options: &JsValue) -> Result<RequestInit, JsValue> {
    let init: RequestInit = match options.dyn_ref::<Object>() {
        Some(options) => Object::assign(&Object::new(), options).unchecked_into(),
        None => RequestInit::new(),
    };
    init.set_method(request.method_name());
    let headers = Headers::new()?;
    for (name, value) in request.headers() {
        headers.append(name, value)?;
    }
    init.set_headers(&headers);
    if let Some(body) = request.body_text() {
        init.set_body(&JsValue::from_str(body));
    }
    Ok(init)
}

async fn send(request: &ApiRequest, options: &JsValue) -> Result<serde_json::Value, ApiError> {
    let transport = |err: JsValue| report(request.url(), ApiError::Transport(js_error_message(&err)));

    let init = request_init(request, options).map_err(transport)?;
    let js_request = Request::new_with_str_and_init(request.url(), &init).map_err(transport)?;
    let window = window().map_err(transport)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&js_request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .unwrap_or_default();
    interpret_response(request.url(), response.status(), &text)
}

/// `fetch` wrapper: JSON content type by default, non-2xx, transport and
/// body-decoding failures reject with an `Error`. String bodies are sent
/// verbatim; other `fetch` options pass through.
#[wasm_bindgen(js_name = apiRequest)]
pub async fn api_request(url: String, options: JsValue) -> Result<JsValue, JsValue> {
    install_hooks();
    let request = request_from_options(&url, &options);
    let value = send(&request, &options)
        .await
        .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string())))?;
    JSON::parse(&value.to_string())
}
