//! Hash-fragment view router
//!
//! [`ViewRouter`] owns the mapping from address fragment to the visible view,
//! runs the fade-out/fade-in choreography for route changes, remembers scroll
//! offsets per fragment and triggers post-render hooks. It is a page-lifetime
//! singleton driven from a single thread: every method takes `&self`, state
//! lives in cells, and the only mutual exclusion is the transition flag.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use crate::{
    core::{
        route::{NavigationTarget, RouteTable, ViewId, HOME_ROUTE, ROUTE_PREFIX},
        scroll_memory::ScrollMemory,
        transition::{TransitionFlag, TransitionPhase},
        view::{ScrollBehavior, ViewState},
    },
    infrastructure::{
        dom::Dom,
        scheduler::{frames, Scheduler},
    },
};

/// Animation-frame boundaries awaited before a revealed view turns active
const LAYOUT_FRAMES: usize = 2;

/// Tunables of the transition choreography
#[derive(Debug, Clone, PartialEq)]
pub struct RouterOptions {
    /// Must match the CSS fade-out duration of a view
    pub fade_out: Duration,
    /// Delay before scrolling to a section after a view swap
    pub section_settle: Duration,
    /// Height of the fixed header covering the top of the viewport
    pub header_offset: f64,
    /// Global initializer invoked after the gallery view is shown
    pub gallery_hook: Option<String>,
    /// Attribute holding a JSON list of image URLs to prefetch
    pub images_attribute: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            fade_out: Duration::from_millis(400),
            section_settle: Duration::from_millis(50),
            header_offset: 100.0,
            gallery_hook: Some("initProjectCarousels".to_string()),
            images_attribute: "data-images".to_string(),
        }
    }
}

/// What `initialize` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Initialization {
    /// Fragment was absent or malformed and has been set to the home route;
    /// the resulting change notification renders the first view
    Canonicalized,
    /// The initial route was rendered directly
    Rendered,
    AlreadyInitialized,
}

/// What a `navigate` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavigationOutcome {
    /// Another transition was in flight; the call had no effect
    Dropped,
    /// Same route, only the scroll position changed
    SectionScroll,
    /// Full view swap
    Transitioned,
}

/// What activating a link did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkOutcome {
    /// Fragment written; the change notification drives the navigation
    FragmentWritten,
    /// Link pointed at the current fragment; scrolled in place
    ScrolledInPlace,
}

/// Counters for diagnostics and replay summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouterStats {
    pub transitions: u32,
    pub dropped: u32,
    pub section_scrolls: u32,
    pub prefetched_images: u32,
}

pub struct ViewRouter<D: Dom, S: Scheduler> {
    routes: RouteTable,
    options: RouterOptions,
    dom: Rc<D>,
    scheduler: Rc<S>,
    current: RefCell<String>,
    scroll_memory: RefCell<ScrollMemory>,
    transition: TransitionFlag,
    prefetched: Cell<bool>,
    initialized: Cell<bool>,
    first_render_pending: Cell<bool>,
    stats: Cell<RouterStats>,
}

impl<D: Dom + 'static, S: Scheduler + 'static> ViewRouter<D, S> {
    pub fn new(routes: RouteTable, options: RouterOptions, dom: Rc<D>, scheduler: Rc<S>) -> Self {
        let current = match dom.fragment() {
            fragment if fragment.is_empty() => HOME_ROUTE.to_string(),
            fragment => fragment,
        };
        Self {
            routes,
            options,
            dom,
            scheduler,
            current: RefCell::new(current),
            scroll_memory: RefCell::new(ScrollMemory::new()),
            transition: TransitionFlag::new(),
            prefetched: Cell::new(false),
            initialized: Cell::new(false),
            first_render_pending: Cell::new(false),
            stats: Cell::new(RouterStats::default()),
        }
    }

    /// Canonicalize the fragment or render the initial route. Runs once.
    pub async fn initialize(&self) -> Initialization {
        if self.initialized.replace(true) {
            return Initialization::AlreadyInitialized;
        }

        let fragment = self.dom.fragment();
        if !fragment.starts_with(ROUTE_PREFIX) {
            log::info!("canonicalizing fragment {fragment:?} to {HOME_ROUTE:?}");
            self.first_render_pending.set(true);
            self.dom.set_fragment(HOME_ROUTE);
            return Initialization::Canonicalized;
        }

        self.navigate(&fragment, true).await;
        Initialization::Rendered
    }

    pub fn resolve(&self, raw: &str) -> NavigationTarget {
        self.routes.resolve(raw)
    }

    /// Navigate to the live address fragment after a change notification
    pub async fn on_fragment_changed(&self) -> NavigationOutcome {
        let fragment = self.dom.fragment();
        self.navigate(&fragment, false).await
    }

    /// Move from the tracked fragment to `fragment`.
    ///
    /// Calls made while a transition is in flight are dropped.
    pub async fn navigate(&self, fragment: &str, is_initial: bool) -> NavigationOutcome {
        if self.transition.is_active() {
            log::debug!("navigation to {fragment:?} dropped: transition in flight");
            self.bump(|stats| stats.dropped += 1);
            return NavigationOutcome::Dropped;
        }

        let initial = is_initial || self.first_render_pending.replace(false);
        let old = self.routes.resolve(&self.current.borrow());
        let new = self.routes.resolve(fragment);

        if old.route == new.route && !initial {
            self.set_current(fragment);
            self.scroll_to_target(&new);
            self.bump(|stats| stats.section_scrolls += 1);
            return NavigationOutcome::SectionScroll;
        }

        let Some(guard) = self.transition.try_begin() else {
            self.bump(|stats| stats.dropped += 1);
            return NavigationOutcome::Dropped;
        };
        log::info!(
            "transition {:?} -> {:?} (initial: {initial})",
            old.route,
            new.route
        );

        let new_view_id = self.routes.view_for(&new.route);
        let new_view = new_view_id.filter(|view| self.dom.has_element(view.as_str()));
        let old_view = self
            .routes
            .view_for(&old.route)
            .filter(|view| self.dom.has_element(view.as_str()));

        let mut transitioned_out = false;
        if let Some(old_view) = old_view {
            if Some(old_view) != new_view && !initial {
                guard.enter(TransitionPhase::LeavingOld);
                self.dom.set_view_state(old_view, ViewState::Leaving);
                if self.dom.prefers_reduced_motion() {
                    log::debug!("reduced motion: hiding {old_view} immediately");
                } else {
                    self.scheduler.sleep(self.options.fade_out).await;
                }
                self.dom.set_view_state(old_view, ViewState::Hidden);
                transitioned_out = true;
            }
        }

        guard.enter(TransitionPhase::Settling);
        if initial || !transitioned_out {
            self.hide_all_except(new_view_id);
        }

        self.set_current(fragment);

        if let Some(view) = new_view {
            self.dom.set_view_state(view, ViewState::Revealed);
            frames(self.scheduler.as_ref(), LAYOUT_FRAMES).await;

            guard.enter(TransitionPhase::EnteringNew);
            self.dom.set_view_state(view, ViewState::Active);
            self.run_hooks(&new.route, view);
        } else {
            log::warn!("no view element for route {:?}", new.route);
        }

        if !new.has_section() {
            if let Some(offset) = self.remembered_offset(fragment, initial) {
                self.dom.scroll_to(offset, ScrollBehavior::Instant);
            } else if initial {
                self.dom.scroll_to(0.0, ScrollBehavior::Instant);
            } else {
                self.dom.scroll_to(0.0, ScrollBehavior::Smooth);
            }
        }

        self.bump(|stats| stats.transitions += 1);
        drop(guard);

        // The settle wait runs outside the guard; navigations arriving in
        // the meantime proceed
        if new.has_section() {
            self.scheduler.sleep(self.options.section_settle).await;
            self.scroll_to_target(&new);
        }
        NavigationOutcome::Transitioned
    }

    /// Post-activation side effects for `route`
    pub fn run_hooks(&self, route: &str, view: &ViewId) {
        if self.routes.is_gallery(route) {
            if let Some(hook) = self.options.gallery_hook.clone() {
                let dom = Rc::clone(&self.dom);
                let scheduler = Rc::clone(&self.scheduler);
                self.scheduler.spawn_local(Box::pin(async move {
                    frames(scheduler.as_ref(), LAYOUT_FRAMES).await;
                    if !dom.invoke_hook(&hook) {
                        log::debug!("gallery hook {hook:?} is not registered");
                    }
                }));
            }
        }

        if !self.dom.focus_first_heading(view) {
            log::debug!("view {view} has no heading to focus");
        }
    }

    /// Handle activation of a marked link pointing at `href`
    pub fn on_link_activated(&self, href: &str) -> LinkOutcome {
        let current = self.current_fragment();
        if current != href {
            let offset = self.dom.scroll_y();
            self.scroll_memory.borrow_mut().record(current, offset);
            self.dom.set_fragment(href);
            LinkOutcome::FragmentWritten
        } else {
            self.scroll_to_section(href);
            LinkOutcome::ScrolledInPlace
        }
    }

    /// Handle hover or focus of a marked link. Returns the number of image
    /// requests issued.
    pub fn on_link_hovered(&self, href: &str) -> usize {
        if self.routes.gallery_route() == Some(href) {
            self.prefetch_gallery()
        } else {
            0
        }
    }

    /// Request every image listed in the gallery view, once per session
    pub fn prefetch_gallery(&self) -> usize {
        if self.prefetched.replace(true) {
            return 0;
        }
        let Some(view) = self.routes.gallery_view() else {
            return 0;
        };

        let mut issued = 0;
        for raw in self.dom.image_lists(view, &self.options.images_attribute) {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(urls) => {
                    for url in urls {
                        self.dom.prefetch_image(&url);
                        issued += 1;
                    }
                }
                Err(e) => log::debug!("ignoring malformed image list {raw:?}: {e}"),
            }
        }

        self.bump(|stats| stats.prefetched_images += issued as u32);
        issued
    }

    /// Scroll to the section `fragment` points at, or to the top
    pub fn scroll_to_section(&self, fragment: &str) {
        let target = self.routes.resolve(fragment);
        self.scroll_to_target(&target);
    }

    fn scroll_to_target(&self, target: &NavigationTarget) {
        let element_top = target
            .section
            .as_deref()
            .and_then(|section| self.dom.element_top(section));

        let top = match element_top {
            Some(element_top) => element_top + self.dom.scroll_y() - self.options.header_offset,
            None => 0.0,
        };
        self.dom.scroll_to(top, ScrollBehavior::Smooth);
    }

    fn hide_all_except(&self, keep: Option<&ViewId>) {
        for view in self.routes.views() {
            if Some(view) != keep && self.dom.has_element(view.as_str()) {
                self.dom.set_view_state(view, ViewState::Hidden);
            }
        }
    }

    fn remembered_offset(&self, fragment: &str, initial: bool) -> Option<f64> {
        if initial {
            return None;
        }
        self.scroll_memory.borrow().get(fragment)
    }

    fn set_current(&self, fragment: &str) {
        *self.current.borrow_mut() = fragment.to_string();
    }

    fn bump(&self, f: impl FnOnce(&mut RouterStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    pub fn current_fragment(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    pub fn remembered_scroll(&self, fragment: &str) -> Option<f64> {
        self.scroll_memory.borrow().get(fragment)
    }

    pub fn has_prefetched(&self) -> bool {
        self.prefetched.get()
    }

    pub fn stats(&self) -> RouterStats {
        self.stats.get()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn dom(&self) -> &Rc<D> {
        &self.dom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{headless::HeadlessPage, scheduler::TokioScheduler};
    use pretty_assertions::assert_eq;

    fn router(fragment: &str) -> ViewRouter<HeadlessPage, TokioScheduler> {
        let page = HeadlessPage::builder()
            .fragment(fragment)
            .view("view-home")
            .view("view-projects")
            .build();
        ViewRouter::new(
            RouteTable::default(),
            RouterOptions::default(),
            Rc::new(page),
            Rc::new(TokioScheduler::default()),
        )
    }

    #[tokio::test]
    async fn test_new_tracks_live_fragment() {
        assert_eq!(router("").current_fragment(), "#/");
        assert_eq!(router("#/projects").current_fragment(), "#/projects");
        assert_eq!(router("#contact").current_fragment(), "#contact");
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let router = router("#/");
        assert!(!router.is_transitioning());
        assert_eq!(router.phase(), TransitionPhase::Idle);
        assert_eq!(router.stats(), RouterStats::default());
        assert!(!router.has_prefetched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_route_skips_transition_flag() {
        let router = router("#/");
        let outcome = router.navigate("#/work", false).await;
        assert_eq!(outcome, NavigationOutcome::SectionScroll);
        assert_eq!(router.stats().section_scrolls, 1);
        assert_eq!(router.stats().transitions, 0);
    }

    #[tokio::test]
    async fn test_prefetch_without_images_consumes_flag() {
        let router = router("#/");
        assert_eq!(router.prefetch_gallery(), 0);
        assert!(router.has_prefetched());
    }
}
