use std::rc::Rc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::{
    core::{msg::Msg, raw_msg::RawMsg, router::ViewRouter, translator::translate_raw_to_domain},
    infrastructure::{dom::Dom, scheduler::Scheduler},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeStats {
    /// Raw events received
    pub events: u32,
    /// Raw events with no navigation meaning
    pub ignored: u32,
}

/// Event loop feeding host events into a [`ViewRouter`].
///
/// Navigations run as detached local tasks so that events arriving during a
/// transition reach the router immediately and meet its single-flight guard
/// instead of queueing behind it.
pub struct RouterRuntime<D: Dom + 'static, S: Scheduler + 'static> {
    router: Rc<ViewRouter<D, S>>,
    scheduler: Rc<S>,
    raw_rx: mpsc::UnboundedReceiver<RawMsg>,
    stats: RuntimeStats,
}

impl<D: Dom + 'static, S: Scheduler + 'static> RouterRuntime<D, S> {
    pub fn new(
        router: Rc<ViewRouter<D, S>>,
        scheduler: Rc<S>,
        raw_rx: mpsc::UnboundedReceiver<RawMsg>,
    ) -> Self {
        Self {
            router,
            scheduler,
            raw_rx,
            stats: RuntimeStats::default(),
        }
    }

    pub fn router(&self) -> &Rc<ViewRouter<D, S>> {
        &self.router
    }

    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    /// Process events until every sender is dropped
    pub async fn run(&mut self) {
        while let Some(raw) = self.raw_rx.recv().await {
            self.handle_raw(raw);
        }
        log::debug!("event channel closed; runtime stopped");
    }

    /// Process every event already queued. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(raw) = self.raw_rx.try_recv() {
            self.handle_raw(raw);
            handled += 1;
        }
        handled
    }

    /// Translate and dispatch one raw event. Returns whether the host should
    /// prevent the event's default action.
    pub fn handle_raw(&mut self, raw: RawMsg) -> bool {
        self.stats.events += 1;
        if raw.is_frequent() {
            tracing::trace!(?raw, "host event");
        } else {
            tracing::debug!(?raw, "host event");
        }

        match translate_raw_to_domain(&raw) {
            Some(msg) => {
                let intercept = msg.intercepts_default();
                dispatch(&self.router, self.scheduler.as_ref(), msg);
                intercept
            }
            None => {
                self.stats.ignored += 1;
                false
            }
        }
    }
}

/// Route one navigation message to the router
pub fn dispatch<D, S>(router: &Rc<ViewRouter<D, S>>, scheduler: &S, msg: Msg)
where
    D: Dom + 'static,
    S: Scheduler + 'static,
{
    match msg {
        Msg::Loaded => {
            let router = Rc::clone(router);
            scheduler.spawn_local(Box::pin(async move {
                let init = router.initialize().await;
                tracing::info!(?init, "router initialized");
            }));
        }
        Msg::FragmentChanged => {
            let router = Rc::clone(router);
            scheduler.spawn_local(Box::pin(async move {
                let outcome = router.on_fragment_changed().await;
                tracing::debug!(?outcome, "fragment change handled");
            }));
        }
        Msg::LinkActivated { href } => {
            let outcome = router.on_link_activated(&href);
            tracing::debug!(%href, ?outcome, "link activated");
        }
        Msg::LinkHovered { href } => {
            let issued = router.on_link_hovered(&href);
            if issued > 0 {
                tracing::info!(issued, "prefetched gallery images");
            }
        }
    }
}
