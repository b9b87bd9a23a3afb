use super::Enableable;
use crate::scheduler::{DelayScheduler, ScheduledTask};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Applies enable/disable decisions to a target, deferring deactivation on
/// request.
///
/// At most one deactivation is outstanding. Enabling, or an immediate
/// disable, cancels it so its effect never happens.
pub struct EnableGate<T: Enableable> {
    target: Rc<T>,
    scheduler: Rc<dyn DelayScheduler>,
    duration: Duration,
    pending: Rc<RefCell<Option<ScheduledTask>>>,
}

impl<T: Enableable + 'static> EnableGate<T> {
    pub fn new(target: Rc<T>, scheduler: Rc<dyn DelayScheduler>, duration: Duration) -> Self {
        Self {
            target,
            scheduler,
            duration,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn handle_enable(&self) {
        self.cancel_pending();
        self.target.set_enabled(true);
    }

    /// Disable the target, now or after the configured duration.
    ///
    /// A request while the target is already disabled does nothing. A delayed
    /// request replaces any deactivation already pending.
    pub fn handle_disable(&self, delayed: bool) {
        if !self.target.is_enabled() {
            return;
        }

        self.cancel_pending();
        if !delayed {
            self.target.set_enabled(false);
            return;
        }

        let target = Rc::clone(&self.target);
        let slot = Rc::clone(&self.pending);
        let task = self.scheduler.schedule(
            self.duration,
            Box::new(move || {
                target.set_enabled(false);
                slot.borrow_mut().take();
            }),
        );
        debug!(delay = ?self.duration, "Deactivation deferred");
        *self.pending.borrow_mut() = Some(task);
    }

    pub fn has_pending_disable(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(ScheduledTask::is_pending)
    }

    pub fn target(&self) -> &Rc<T> {
        &self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.pending.borrow_mut().take() {
            if task.cancel() {
                debug!("Pending deactivation cancelled");
            }
        }
    }
}
