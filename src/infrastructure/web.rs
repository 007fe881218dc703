//! Browser host
//!
//! `web-sys` implementations of [`Dom`] and [`Scheduler`], listener binding,
//! and the wasm entry point that installs the router once the document has
//! loaded.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise, Reflect};
use tokio::sync::mpsc;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, FocusOptions, HtmlElement, ScrollToOptions, Window};

use crate::{
    core::{
        raw_msg::{LinkTarget, RawMsg},
        route::ViewId,
        router::ViewRouter,
        translator::translate_raw_to_domain,
        view::{
            ScrollBehavior, ViewState, ACTIVE_CLASS, ARIA_HIDDEN, HIDDEN_CLASS, LEAVING_CLASS,
        },
    },
    infrastructure::{config::Config, dom::Dom, scheduler::Scheduler},
    integration::runtime::RouterRuntime,
};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const HEADING_SELECTOR: &str = "h1, h2, h3";

pub type WebRouter = ViewRouter<WebDom, WebScheduler>;

thread_local! {
    static ROUTER: RefCell<Option<Rc<WebRouter>>> = const { RefCell::new(None) };
}

/// Document access through `web-sys`
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn apply(element: &Element, state: ViewState) -> Result<(), JsValue> {
        let classes = element.class_list();
        match state {
            ViewState::Hidden => {
                classes.remove_1(LEAVING_CLASS)?;
                classes.remove_1(ACTIVE_CLASS)?;
                classes.add_1(HIDDEN_CLASS)?;
            }
            ViewState::Leaving => {
                classes.remove_1(ACTIVE_CLASS)?;
                classes.add_1(LEAVING_CLASS)?;
            }
            ViewState::Revealed => {
                classes.remove_1(HIDDEN_CLASS)?;
            }
            ViewState::Active => {
                classes.remove_1(HIDDEN_CLASS)?;
                classes.add_1(ACTIVE_CLASS)?;
            }
        }
        if let Some(value) = state.aria_hidden() {
            element.set_attribute(ARIA_HIDDEN, value)?;
        }
        Ok(())
    }
}

impl Dom for WebDom {
    fn fragment(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_fragment(&self, fragment: &str) {
        if let Err(e) = self.window.location().set_hash(fragment) {
            log::warn!("cannot set fragment {fragment:?}: {e:?}");
        }
    }

    fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn set_view_state(&self, view: &ViewId, state: ViewState) {
        if let Some(element) = self.element(view.as_str()) {
            if let Err(e) = Self::apply(&element, state) {
                log::warn!("cannot set {view} to {state}: {e:?}");
            }
        }
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        self.element(id)
            .map(|element| element.get_bounding_client_rect().top())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn focus_first_heading(&self, view: &ViewId) -> bool {
        let heading = self
            .element(view.as_str())
            .and_then(|element| element.query_selector(HEADING_SELECTOR).ok().flatten())
            .and_then(|heading| heading.dyn_into::<HtmlElement>().ok());
        let Some(heading) = heading else {
            return false;
        };

        if let Err(e) = heading.set_attribute("tabindex", "-1") {
            log::debug!("cannot make heading focusable: {e:?}");
        }
        let options = FocusOptions::new();
        options.set_prevent_scroll(true);
        heading.focus_with_options(&options).is_ok()
    }

    fn image_lists(&self, view: &ViewId, attribute: &str) -> Vec<String> {
        let Some(root) = self.element(view.as_str()) else {
            return Vec::new();
        };
        let Ok(nodes) = root.query_selector_all(&format!("[{attribute}]")) else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| {
                element
                    .get_attribute(attribute)
                    .unwrap_or_else(|| "[]".to_string())
            })
            .collect()
    }

    fn prefetch_image(&self, url: &str) {
        match web_sys::HtmlImageElement::new() {
            Ok(image) => image.set_src(url),
            Err(e) => log::debug!("cannot create image for {url}: {e:?}"),
        }
    }

    fn invoke_hook(&self, name: &str) -> bool {
        let hook = Reflect::get(&self.window, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok());
        match hook {
            Some(hook) => {
                if let Err(e) = hook.call0(&JsValue::NULL) {
                    log::warn!("hook {name} failed: {e:?}");
                }
                true
            }
            None => false,
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }
}

/// `setTimeout` and `requestAnimationFrame` as futures
pub struct WebScheduler {
    window: Window,
}

impl WebScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn wait(promise: Promise) -> LocalBoxFuture<'static, ()> {
        Box::pin(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("scheduler wait rejected: {e:?}");
            }
        })
    }
}

impl Scheduler for WebScheduler {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        Self::wait(Promise::new(&mut |resolve, _reject| {
            if let Err(e) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            {
                log::warn!("setTimeout failed: {e:?}");
            }
        }))
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        Self::wait(Promise::new(&mut |resolve, _reject| {
            if let Err(e) = window.request_animation_frame(&resolve) {
                log::warn!("requestAnimationFrame failed: {e:?}");
            }
        }))
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

fn closest_link(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(selector).ok().flatten())
}

fn link_target(element: Element) -> LinkTarget {
    LinkTarget {
        href: element.get_attribute("href"),
        is_anchor: element.tag_name().eq_ignore_ascii_case("a"),
    }
}

/// Forward body and window events to the runtime channel
fn bind_listeners(
    window: &Window,
    document: &Document,
    link_marker: &str,
    events: mpsc::UnboundedSender<RawMsg>,
) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let anchor_selector = format!("a[{link_marker}]");
    let marker_selector = format!("[{link_marker}]");

    let tx = events.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let link = closest_link(&event, &anchor_selector).map(link_target);
        let raw = RawMsg::Click { link };
        if translate_raw_to_domain(&raw).is_some_and(|msg| msg.intercepts_default()) {
            event.prevent_default();
        }
        let _ = tx.send(raw);
    });
    body.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    for (kind, is_focus) in [("mouseover", false), ("focusin", true)] {
        let tx = events.clone();
        let selector = marker_selector.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(link) = closest_link(&event, &selector).map(link_target) else {
                return;
            };
            let raw = if is_focus {
                RawMsg::FocusIn { link: Some(link) }
            } else {
                RawMsg::MouseOver { link: Some(link) }
            };
            let _ = tx.send(raw);
        });
        body.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        listener.forget();
    }

    let location = window.location();
    let on_hash_change = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let fragment = location.hash().unwrap_or_default();
        let _ = events.send(RawMsg::HashChange { fragment });
    });
    window.add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())?;
    on_hash_change.forget();

    Ok(())
}

/// Install the router on the current page. Subsequent calls are no-ops.
pub fn install(config: &Config) -> Result<(), JsValue> {
    if ROUTER.with(|router| router.borrow().is_some()) {
        return Ok(());
    }

    let routes = config
        .route_table()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let dom = Rc::new(WebDom::new()?);
    let window = dom.window.clone();
    let document = dom.document.clone();
    let scheduler = Rc::new(WebScheduler::new(window.clone()));
    let router = Rc::new(ViewRouter::new(
        routes,
        config.router_options(),
        dom,
        Rc::clone(&scheduler),
    ));

    let (tx, rx) = mpsc::unbounded_channel();
    bind_listeners(&window, &document, &config.link_marker, tx.clone())?;

    let mut runtime = RouterRuntime::new(Rc::clone(&router), scheduler, rx);
    wasm_bindgen_futures::spawn_local(async move { runtime.run().await });

    ROUTER.with(|slot| *slot.borrow_mut() = Some(router));
    let _ = tx.send(RawMsg::DomContentLoaded);
    Ok(())
}

/// Fragment the router currently tracks
#[wasm_bindgen(js_name = currentFragment)]
pub fn current_fragment() -> Option<String> {
    ROUTER.with(|router| router.borrow().as_ref().map(|r| r.current_fragment()))
}

struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
    }
}

fn initialize_console_logging() {
    let result = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter(Vec::new()))
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}=info",
            env!("CARGO_CRATE_NAME")
        )))
        .try_init();
    if result.is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logging already initialized"));
    }
}

/// `readyState` values past `"loading"` mean `DOMContentLoaded` already fired
fn document_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    initialize_console_logging();

    let config = Config::embedded().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // The module usually finishes instantiating after parsing is done
    if document_parsed(&document.ready_state()) {
        return install(&config);
    }

    let on_loaded = Closure::once(move || {
        if let Err(e) = install(&config) {
            log::error!("router installation failed: {e:?}");
        }
    });
    let options = web_sys::AddEventListenerOptions::new();
    options.set_once(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        on_loaded.as_ref().unchecked_ref(),
        &options,
    )?;
    on_loaded.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("loading", false)]
    #[case("interactive", true)]
    #[case("complete", true)]
    fn test_document_parsed(#[case] ready_state: &str, #[case] expected: bool) {
        assert_eq!(document_parsed(ready_state), expected);
    }
}
