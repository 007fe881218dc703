//! Headless replay of navigation scripts

use std::rc::Rc;
use std::time::Duration;

use color_eyre::eyre::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use crate::{
    core::{
        route::ViewId,
        router::{RouterStats, ViewRouter},
        transition::TransitionPhase,
    },
    infrastructure::{
        config::Config,
        dom::Dom,
        headless::{HeadlessPage, TraceEntry},
        scheduler::{Scheduler, TokioScheduler},
        script::{Script, Step},
    },
    integration::runtime::{RouterRuntime, RuntimeStats},
};

/// Upper bound on waiting for the router to go idle after the last step
const SETTLE_LIMIT: Duration = Duration::from_secs(5);
const SETTLE_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Override the page's reduced-motion preference
    pub reduced_motion: Option<bool>,
    /// Fragment in the address bar at load time
    pub initial_fragment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub fragment: String,
    pub active_views: Vec<ViewId>,
    pub scroll_y: f64,
    pub prefetched: Vec<String>,
    pub router: RouterStats,
    pub runtime: RuntimeStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub trace: Vec<TraceEntry>,
    pub summary: ReplaySummary,
}

pub struct ReplayRunner {
    config: Config,
    options: ReplayOptions,
}

impl ReplayRunner {
    pub fn new(config: Config, options: ReplayOptions) -> Self {
        Self { config, options }
    }

    /// Load the page, play every step, and wait for the router to settle
    pub async fn run(&self, script: &Script) -> Result<ReplayReport> {
        let routes = self.config.route_table()?;
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();

        let mut page = HeadlessPage::from_config(&self.config.page, routes.views())
            .fragment(&self.options.initial_fragment)
            .events(raw_tx);
        if let Some(reduced_motion) = self.options.reduced_motion {
            page = page.reduced_motion(reduced_motion);
        }
        let page = Rc::new(page.build());
        let scheduler = Rc::new(TokioScheduler::new(self.config.frame()));
        let router = Rc::new(ViewRouter::new(
            routes,
            self.config.router_options(),
            Rc::clone(&page),
            Rc::clone(&scheduler),
        ));
        let mut runtime = RouterRuntime::new(Rc::clone(&router), scheduler, raw_rx);

        let local = LocalSet::new();
        local
            .run_until(async {
                page.load();
                drain(&mut runtime).await;

                for step in &script.steps {
                    tracing::debug!(?step, "replay step");
                    play(&page, step).await;
                    runtime.pump();
                    yield_to_tasks().await;
                    // Events written by the router itself (link clicks)
                    runtime.pump();
                    yield_to_tasks().await;
                }

                drain(&mut runtime).await;
            })
            .await;

        let summary = ReplaySummary {
            fragment: router.current_fragment(),
            active_views: page.active_views(),
            scroll_y: page.scroll_y(),
            prefetched: page.prefetched(),
            router: router.stats(),
            runtime: runtime.stats(),
        };
        Ok(ReplayReport {
            trace: page.trace(),
            summary,
        })
    }
}

async fn play(page: &HeadlessPage, step: &Step) {
    match step {
        Step::Click(href) => page.click_link(href),
        Step::Hover(href) => page.hover_link(href),
        Step::Focus(href) => page.focus_link(href),
        Step::Scroll(top) => page.user_scroll(*top),
        Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
        Step::Back => {
            if !page.back() {
                tracing::warn!("back step with empty history");
            }
        }
        Step::Navigate(fragment) => page.set_fragment(fragment),
    }
}

async fn yield_to_tasks() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// Handle queued events and wait for the transitions they start, until the
/// queue stays empty
async fn drain<D, S>(runtime: &mut RouterRuntime<D, S>)
where
    D: Dom + 'static,
    S: Scheduler + 'static,
{
    loop {
        let handled = runtime.pump();
        let router = Rc::clone(runtime.router());
        settle(&router).await;
        if handled == 0 {
            break;
        }
    }
}

async fn settle<D, S>(router: &ViewRouter<D, S>)
where
    D: Dom + 'static,
    S: Scheduler + 'static,
{
    yield_to_tasks().await;
    let deadline = tokio::time::Instant::now() + SETTLE_LIMIT;
    while router.phase() != TransitionPhase::Idle && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(SETTLE_POLL).await;
    }
    // Gallery hooks run a couple of frames after activation and section
    // scrolls land after the settle delay, both past the guard release
    let tail = (SETTLE_POLL * 4).max(router.options().section_settle + SETTLE_POLL);
    tokio::time::sleep(tail).await;
}
