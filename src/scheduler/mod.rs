//! # Deferred Tasks
//!
//! Cancellable, single-threaded scheduling used for delayed deactivation.
//!
//! A [`DelayScheduler`] runs a closure once a delay has elapsed and hands back
//! a [`ScheduledTask`] handle. Cancelling the handle before the delay elapses
//! guarantees the closure never runs.
//!
//! - [`ManualScheduler`]: virtual clock advanced by the host loop
//! - [`LocalTokioScheduler`]: `tokio::task::spawn_local` timers

mod manual;
mod tokio_local;

pub use manual::ManualScheduler;
pub use tokio_local::LocalTokioScheduler;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Deferred work
pub type DeferredFn = Box<dyn FnOnce()>;

/// Runs deferred work after a delay on the calling thread
pub trait DelayScheduler {
    fn schedule(&self, delay: Duration, task: DeferredFn) -> ScheduledTask;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Fired,
    Cancelled,
}

/// Handle to a scheduled task. Clones refer to the same task.
#[derive(Clone)]
pub struct ScheduledTask {
    inner: Rc<TaskInner>,
}

struct TaskInner {
    status: Cell<TaskStatus>,
    abort: RefCell<Option<tokio::task::AbortHandle>>,
}

impl ScheduledTask {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(TaskInner {
                status: Cell::new(TaskStatus::Pending),
                abort: RefCell::new(None),
            }),
        }
    }

    /// Cancel the task. Returns `true` if it was still pending.
    pub fn cancel(&self) -> bool {
        if self.inner.status.get() != TaskStatus::Pending {
            return false;
        }
        self.inner.status.set(TaskStatus::Cancelled);
        if let Some(abort) = self.inner.abort.borrow_mut().take() {
            abort.abort();
        }
        true
    }

    pub fn status(&self) -> TaskStatus {
        self.inner.status.get()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == TaskStatus::Pending
    }

    /// Claim the right to run. Only the first claim on a pending task succeeds.
    pub(crate) fn try_fire(&self) -> bool {
        if self.inner.status.get() != TaskStatus::Pending {
            return false;
        }
        self.inner.status.set(TaskStatus::Fired);
        self.inner.abort.borrow_mut().take();
        true
    }

    pub(crate) fn attach_abort(&self, abort: tokio::task::AbortHandle) {
        if self.is_pending() {
            *self.inner.abort.borrow_mut() = Some(abort);
        } else {
            abort.abort();
        }
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_only_once() {
        let task = ScheduledTask::new();
        assert!(task.is_pending());
        assert!(task.cancel());
        assert!(!task.cancel());
        assert!(!task.try_fire());
        assert_eq!(task.status(), TaskStatus::Cancelled);
    }

    #[test]
    fn test_fired_task_cannot_be_cancelled() {
        let task = ScheduledTask::new();
        let clone = task.clone();
        assert!(clone.try_fire());
        assert!(!task.cancel());
        assert_eq!(task.status(), TaskStatus::Fired);
    }
}
