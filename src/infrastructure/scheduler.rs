use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Timer, paint-cycle and task capabilities for cooperative transitions
pub trait Scheduler {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
    /// Resolve at the next animation-frame boundary
    fn next_frame(&self) -> LocalBoxFuture<'static, ()>;
    /// Run a detached task on the current thread
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
}

/// Wait for `count` consecutive animation-frame boundaries
pub async fn frames<S: Scheduler + ?Sized>(scheduler: &S, count: usize) {
    for _ in 0..count {
        scheduler.next_frame().await;
    }
}

/// Tokio-backed scheduler with a fixed frame pace.
///
/// `spawn_local` must be called from within a [`tokio::task::LocalSet`].
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    frame: Duration,
}

impl TokioScheduler {
    pub fn new(frame: Duration) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl Scheduler for TokioScheduler {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(self.frame))
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}
