use std::rc::Rc;
use std::time::Duration;

use hashview::{
    core::{
        raw_msg::{LinkTarget, RawMsg},
        route::{RouteTable, ViewId},
        router::{RouterOptions, ViewRouter},
        view::ScrollBehavior,
    },
    infrastructure::{
        dom::Dom,
        headless::{HeadlessPage, HeadlessPageBuilder},
        scheduler::TokioScheduler,
    },
    integration::runtime::{RouterRuntime, RuntimeStats},
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

type Router = ViewRouter<HeadlessPage, TokioScheduler>;
type Runtime = RouterRuntime<HeadlessPage, TokioScheduler>;

fn site(fragment: &str) -> HeadlessPageBuilder {
    HeadlessPage::builder()
        .fragment(fragment)
        .view("view-home")
        .view("view-projects")
        .section("work", 1400.0)
        .heading("view-home")
        .heading("view-projects")
        .images("view-projects", r#"["/img/a.webp", "/img/b.webp"]"#)
        .hook("initProjectCarousels")
}

/// Wire a page, router and runtime through a shared event channel
fn boot(page: HeadlessPageBuilder) -> (Rc<HeadlessPage>, Rc<Router>, Runtime) {
    let (tx, rx) = mpsc::unbounded_channel();
    let page = Rc::new(page.events(tx).build());
    let scheduler = Rc::new(TokioScheduler::default());
    let router = Rc::new(ViewRouter::new(
        RouteTable::default(),
        RouterOptions::default(),
        Rc::clone(&page),
        Rc::clone(&scheduler),
    ));
    let runtime = RouterRuntime::new(Rc::clone(&router), scheduler, rx);
    (page, router, runtime)
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn test_load_then_click_swaps_views() {
    LocalSet::new()
        .run_until(async {
            let (page, router, mut runtime) = boot(site("#/"));

            page.load();
            assert_eq!(runtime.pump(), 1);
            wait(100).await;
            assert_eq!(page.active_views(), vec![ViewId::new("view-home")]);

            page.click_link("#/projects");
            // The click writes the fragment; the change lands in the same pump
            assert_eq!(runtime.pump(), 2);
            wait(600).await;

            assert_eq!(page.fragment(), "#/projects");
            assert_eq!(router.current_fragment(), "#/projects");
            assert_eq!(page.active_views(), vec![ViewId::new("view-projects")]);
            assert_eq!(page.hook_calls("initProjectCarousels"), 1);
            assert_eq!(
                runtime.stats(),
                RuntimeStats {
                    events: 3,
                    ignored: 0
                }
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_load_canonicalizes_then_renders_home() {
    LocalSet::new()
        .run_until(async {
            let (page, _router, mut runtime) = boot(site(""));

            page.load();
            runtime.pump();
            wait(10).await;
            assert_eq!(page.fragment(), "#/");

            assert_eq!(runtime.pump(), 1);
            wait(100).await;
            assert_eq!(page.active_views(), vec![ViewId::new("view-home")]);
            assert_eq!(page.scroll_ops(), vec![(0.0, ScrollBehavior::Instant)]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_link_during_transition_is_dropped() {
    LocalSet::new()
        .run_until(async {
            let (page, router, mut runtime) = boot(site("#/"));
            page.load();
            runtime.pump();
            wait(100).await;

            page.click_link("#/projects");
            runtime.pump();
            wait(100).await;
            assert!(router.is_transitioning());

            page.click_link("#/work");
            runtime.pump();
            wait(600).await;

            // The address bar moved on but the router kept the first target
            assert_eq!(page.fragment(), "#/work");
            assert_eq!(router.current_fragment(), "#/projects");
            assert_eq!(page.active_views(), vec![ViewId::new("view-projects")]);
            assert_eq!(router.stats().dropped, 1);
            assert!(!router.is_transitioning());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_hover_and_focus_prefetch_once() {
    LocalSet::new()
        .run_until(async {
            let (page, _router, mut runtime) = boot(site("#/"));

            page.hover_link("#/");
            page.hover_link("#/projects");
            page.focus_link("#/projects");
            assert_eq!(runtime.pump(), 3);

            assert_eq!(
                page.prefetched(),
                vec!["/img/a.webp".to_string(), "/img/b.webp".to_string()]
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_handle_raw_reports_default_interception() {
    LocalSet::new()
        .run_until(async {
            let (page, _router, mut runtime) = boot(site("#/"));

            assert!(runtime.handle_raw(RawMsg::Click {
                link: Some(LinkTarget::anchor("#/projects")),
            }));
            assert!(!runtime.handle_raw(RawMsg::Click {
                link: Some(LinkTarget::anchor("https://example.com/")),
            }));
            assert!(!runtime.handle_raw(RawMsg::Click { link: None }));
            assert!(!runtime.handle_raw(RawMsg::MouseOver { link: None }));

            assert_eq!(
                runtime.stats(),
                RuntimeStats {
                    events: 4,
                    ignored: 3
                }
            );
            assert_eq!(page.fragment(), "#/projects");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_senders_drop() {
    LocalSet::new()
        .run_until(async {
            let page = Rc::new(site("#/").build());
            let scheduler = Rc::new(TokioScheduler::default());
            let router = Rc::new(ViewRouter::new(
                RouteTable::default(),
                RouterOptions::default(),
                Rc::clone(&page),
                Rc::clone(&scheduler),
            ));
            let (tx, rx) = mpsc::unbounded_channel();
            let mut runtime = RouterRuntime::new(router, scheduler, rx);

            tx.send(RawMsg::MouseOver {
                link: Some(LinkTarget::anchor("#/projects")),
            })
            .unwrap();
            drop(tx);

            runtime.run().await;
            assert_eq!(runtime.stats().events, 1);
            assert_eq!(page.prefetched().len(), 2);
        })
        .await;
}
