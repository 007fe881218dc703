//! In-memory document for tests and script replay
//!
//! [`HeadlessPage`] implements [`Dom`] without a browser. It keeps view
//! states, scroll offset and fragment history, records every mutation with a
//! timestamp, and behaves like a browser when the fragment is written: the
//! change is pushed to history and a [`RawMsg::HashChange`] is sent to the
//! event channel, if one is attached.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::{
    core::{
        raw_msg::{LinkTarget, RawMsg},
        route::ViewId,
        view::{ScrollBehavior, ViewState},
    },
    infrastructure::{config::PageConfig, dom::Dom},
};

/// One recorded document operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomOp {
    SetFragment { fragment: String },
    ViewState { view: ViewId, state: ViewState },
    ScrollTo { top: f64, behavior: ScrollBehavior },
    Focus { view: ViewId },
    Prefetch { url: String },
    Hook { name: String, registered: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Milliseconds since the page was created
    pub at_ms: u64,
    #[serde(flatten)]
    pub op: DomOp,
}

#[derive(Debug, Default)]
struct PageState {
    fragment: String,
    history: Vec<String>,
    scroll_y: f64,
    views: BTreeMap<ViewId, ViewState>,
    sections: HashMap<String, f64>,
    headings: BTreeSet<ViewId>,
    focused: Option<ViewId>,
    images: HashMap<ViewId, Vec<String>>,
    hooks: HashMap<String, u32>,
    prefetched: Vec<String>,
    reduced_motion: bool,
    trace: Vec<TraceEntry>,
}

pub struct HeadlessPage {
    state: RefCell<PageState>,
    events: Option<mpsc::UnboundedSender<RawMsg>>,
    created: Instant,
}

impl HeadlessPage {
    pub fn builder() -> HeadlessPageBuilder {
        HeadlessPageBuilder::default()
    }

    /// Build a page from the replay section of the configuration
    pub fn from_config<'a>(
        page: &PageConfig,
        views: impl IntoIterator<Item = &'a ViewId>,
    ) -> HeadlessPageBuilder {
        let mut builder = Self::builder().reduced_motion(page.reduced_motion);
        for view in views {
            builder = builder.view(view.as_str());
        }
        for (id, offset) in &page.sections {
            builder = builder.section(id, *offset);
        }
        for view in &page.headings {
            builder = builder.heading(view);
        }
        for (view, lists) in &page.images {
            for list in lists {
                builder = builder.images(view, list);
            }
        }
        for hook in &page.hooks {
            builder = builder.hook(hook);
        }
        builder
    }

    fn record(&self, op: DomOp) {
        let at_ms = self.created.elapsed().as_millis() as u64;
        self.state.borrow_mut().trace.push(TraceEntry { at_ms, op });
    }

    fn emit(&self, msg: RawMsg) {
        if let Some(events) = &self.events {
            if events.send(msg).is_err() {
                log::debug!("event channel closed; dropping host event");
            }
        }
    }

    /// User clicks a marked anchor
    pub fn click_link(&self, href: &str) {
        self.emit(RawMsg::Click {
            link: Some(LinkTarget::anchor(href)),
        });
    }

    /// User moves the pointer over a marked link
    pub fn hover_link(&self, href: &str) {
        self.emit(RawMsg::MouseOver {
            link: Some(LinkTarget::anchor(href)),
        });
    }

    /// Keyboard focus lands on a marked link
    pub fn focus_link(&self, href: &str) {
        self.emit(RawMsg::FocusIn {
            link: Some(LinkTarget::anchor(href)),
        });
    }

    pub fn load(&self) {
        self.emit(RawMsg::DomContentLoaded);
    }

    /// User scrolls the document
    pub fn user_scroll(&self, top: f64) {
        self.state.borrow_mut().scroll_y = top.max(0.0);
    }

    /// Browser back button: restore the previous fragment
    pub fn back(&self) -> bool {
        let previous = self.state.borrow_mut().history.pop();
        match previous {
            Some(fragment) => {
                self.state.borrow_mut().fragment.clone_from(&fragment);
                self.record(DomOp::SetFragment {
                    fragment: fragment.clone(),
                });
                self.emit(RawMsg::HashChange { fragment });
                true
            }
            None => false,
        }
    }

    pub fn view_state(&self, view: &str) -> Option<ViewState> {
        self.state.borrow().views.get(&ViewId::new(view)).copied()
    }

    pub fn active_views(&self) -> Vec<ViewId> {
        self.views_in(ViewState::Active)
    }

    pub fn visible_views(&self) -> Vec<ViewId> {
        self.state
            .borrow()
            .views
            .iter()
            .filter(|(_, state)| state.is_visible())
            .map(|(view, _)| view.clone())
            .collect()
    }

    fn views_in(&self, wanted: ViewState) -> Vec<ViewId> {
        self.state
            .borrow()
            .views
            .iter()
            .filter(|(_, state)| **state == wanted)
            .map(|(view, _)| view.clone())
            .collect()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.state.borrow().focused.clone()
    }

    pub fn prefetched(&self) -> Vec<String> {
        self.state.borrow().prefetched.clone()
    }

    pub fn hook_calls(&self, name: &str) -> u32 {
        self.state.borrow().hooks.get(name).copied().unwrap_or(0)
    }

    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    pub fn trace(&self) -> Vec<TraceEntry> {
        self.state.borrow().trace.clone()
    }

    pub fn scroll_ops(&self) -> Vec<(f64, ScrollBehavior)> {
        self.state
            .borrow()
            .trace
            .iter()
            .filter_map(|entry| match entry.op {
                DomOp::ScrollTo { top, behavior } => Some((top, behavior)),
                _ => None,
            })
            .collect()
    }

    /// Time at which `view` was last set to `state`
    pub fn last_state_change(&self, view: &str, state: ViewState) -> Option<Duration> {
        self.state
            .borrow()
            .trace
            .iter()
            .rev()
            .find(|entry| {
                entry.op
                    == DomOp::ViewState {
                        view: ViewId::new(view),
                        state,
                    }
            })
            .map(|entry| Duration::from_millis(entry.at_ms))
    }

    pub fn clear_trace(&self) {
        self.state.borrow_mut().trace.clear();
    }
}

impl Dom for HeadlessPage {
    fn fragment(&self) -> String {
        self.state.borrow().fragment.clone()
    }

    fn set_fragment(&self, fragment: &str) {
        {
            let mut state = self.state.borrow_mut();
            if state.fragment == fragment {
                return;
            }
            let previous = std::mem::replace(&mut state.fragment, fragment.to_string());
            state.history.push(previous);
        }
        self.record(DomOp::SetFragment {
            fragment: fragment.to_string(),
        });
        self.emit(RawMsg::HashChange {
            fragment: fragment.to_string(),
        });
    }

    fn has_element(&self, id: &str) -> bool {
        let state = self.state.borrow();
        state.views.contains_key(&ViewId::new(id)) || state.sections.contains_key(id)
    }

    fn set_view_state(&self, view: &ViewId, new_state: ViewState) {
        {
            let mut state = self.state.borrow_mut();
            let Some(current) = state.views.get_mut(view) else {
                return;
            };
            *current = new_state;
        }
        self.record(DomOp::ViewState {
            view: view.clone(),
            state: new_state,
        });
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        let state = self.state.borrow();
        state
            .sections
            .get(id)
            .map(|document_top| document_top - state.scroll_y)
    }

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        self.state.borrow_mut().scroll_y = top.max(0.0);
        self.record(DomOp::ScrollTo { top, behavior });
    }

    fn focus_first_heading(&self, view: &ViewId) -> bool {
        if !self.state.borrow().headings.contains(view) {
            return false;
        }
        self.state.borrow_mut().focused = Some(view.clone());
        self.record(DomOp::Focus { view: view.clone() });
        true
    }

    fn image_lists(&self, view: &ViewId, _attribute: &str) -> Vec<String> {
        self.state
            .borrow()
            .images
            .get(view)
            .cloned()
            .unwrap_or_default()
    }

    fn prefetch_image(&self, url: &str) {
        self.state.borrow_mut().prefetched.push(url.to_string());
        self.record(DomOp::Prefetch {
            url: url.to_string(),
        });
    }

    fn invoke_hook(&self, name: &str) -> bool {
        let registered = match self.state.borrow_mut().hooks.get_mut(name) {
            Some(calls) => {
                *calls += 1;
                true
            }
            None => false,
        };
        self.record(DomOp::Hook {
            name: name.to_string(),
            registered,
        });
        registered
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.state.borrow().reduced_motion
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPageBuilder {
    state: PageState,
    events: Option<mpsc::UnboundedSender<RawMsg>>,
}

impl HeadlessPageBuilder {
    pub fn fragment(mut self, fragment: &str) -> Self {
        self.state.fragment = fragment.to_string();
        self
    }

    /// Add a view element; views start hidden
    pub fn view(mut self, id: &str) -> Self {
        self.state.views.insert(ViewId::new(id), ViewState::Hidden);
        self
    }

    /// Add a view in a given initial state
    pub fn view_in(mut self, id: &str, state: ViewState) -> Self {
        self.state.views.insert(ViewId::new(id), state);
        self
    }

    /// Add an anchor element at `document_top`
    pub fn section(mut self, id: &str, document_top: f64) -> Self {
        self.state.sections.insert(id.to_string(), document_top);
        self
    }

    pub fn heading(mut self, view: &str) -> Self {
        self.state.headings.insert(ViewId::new(view));
        self
    }

    /// Add an element carrying a raw image-list attribute value
    pub fn images(mut self, view: &str, raw: &str) -> Self {
        self.state
            .images
            .entry(ViewId::new(view))
            .or_default()
            .push(raw.to_string());
        self
    }

    /// Register a global hook function
    pub fn hook(mut self, name: &str) -> Self {
        self.state.hooks.insert(name.to_string(), 0);
        self
    }

    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.state.reduced_motion = enabled;
        self
    }

    pub fn scroll_y(mut self, top: f64) -> Self {
        self.state.scroll_y = top;
        self
    }

    pub fn events(mut self, sender: mpsc::UnboundedSender<RawMsg>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn build(self) -> HeadlessPage {
        HeadlessPage {
            state: RefCell::new(self.state),
            events: self.events,
            created: Instant::now(),
        }
    }
}
