use super::{DeferredFn, DelayScheduler, ScheduledTask};
use std::time::Duration;

/// Scheduler backed by tokio timers on the current thread.
///
/// Tasks are spawned with [`tokio::task::spawn_local`], so scheduling must
/// happen inside a [`tokio::task::LocalSet`]. Cancelling a handle aborts the
/// spawned timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTokioScheduler;

impl LocalTokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl DelayScheduler for LocalTokioScheduler {
    fn schedule(&self, delay: Duration, task: DeferredFn) -> ScheduledTask {
        let handle = ScheduledTask::new();
        let claim = handle.clone();
        let join = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if claim.try_fire() {
                task();
            }
        });
        handle.attach_abort(join.abort_handle());
        handle
    }
}
