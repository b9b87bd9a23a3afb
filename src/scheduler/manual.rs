use super::{DeferredFn, DelayScheduler, ScheduledTask};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// Scheduler driven by an explicit virtual clock.
///
/// Nothing fires until the host calls [`advance`](Self::advance), which makes
/// it suitable for frame-driven loops and deterministic tests. Clones share
/// the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ClockState>>,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_sequence: u64,
    queue: Vec<Entry>,
}

struct Entry {
    due: Duration,
    sequence: u64,
    handle: ScheduledTask,
    task: DeferredFn,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Tasks that are scheduled and neither fired nor cancelled
    pub fn pending_count(&self) -> usize {
        self.inner
            .borrow()
            .queue
            .iter()
            .filter(|entry| entry.handle.is_pending())
            .count()
    }

    /// Move the clock forward, running every task that falls due, earliest
    /// first. Tasks scheduled by a running task are picked up in the same
    /// call when they fall due within `elapsed`. Returns the number of tasks
    /// run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut fired = 0;

        while let Some(entry) = self.pop_due(target) {
            if entry.handle.try_fire() {
                trace!(due = ?entry.due, "Running deferred task");
                (entry.task)();
                fired += 1;
            }
        }

        self.inner.borrow_mut().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut state = self.inner.borrow_mut();
        state.queue.retain(|entry| entry.handle.is_pending());
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(index, _)| index)?;
        let entry = state.queue.swap_remove(index);
        state.now = state.now.max(entry.due);
        Some(entry)
    }
}

impl DelayScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: DeferredFn) -> ScheduledTask {
        let handle = ScheduledTask::new();
        let mut state = self.inner.borrow_mut();
        let entry = Entry {
            due: state.now + delay,
            sequence: state.next_sequence,
            handle: handle.clone(),
            task,
        };
        state.next_sequence += 1;
        state.queue.push(entry);
        handle
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending_count())
            .finish()
    }
}
