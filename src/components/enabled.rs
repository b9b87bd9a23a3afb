use super::{EnableGate, Enableable};
use crate::scheduler::DelayScheduler;
use crate::state_machine::{
    DelayPolicy, MultiStateComparison, MultiStateListener, MultiStateManager, MultiStateSet,
    SingleStateComparison, State, StateLike, StateListener, StateManager,
};
use std::rc::Rc;

/// Enables a target while a single-state manager sits in one of the watched
/// states (or outside them, for [`SingleStateComparison::NoneActive`]).
///
/// Deactivation is deferred only when the delay policy is active and the
/// manager moved into one of the policy's delayed states.
pub struct StateEnabledListener<T: Enableable, S: StateLike = State> {
    watched: Vec<S>,
    enable_when: SingleStateComparison,
    delay: DelayPolicy<S>,
    gate: EnableGate<T>,
}

impl<T: Enableable + 'static, S: StateLike> StateEnabledListener<T, S> {
    pub fn new(
        watched: impl IntoIterator<Item = S>,
        enable_when: SingleStateComparison,
        delay: DelayPolicy<S>,
        target: Rc<T>,
        scheduler: Rc<dyn DelayScheduler>,
    ) -> Self {
        let gate = EnableGate::new(target, scheduler, delay.duration);
        Self {
            watched: watched.into_iter().collect(),
            enable_when,
            delay,
            gate,
        }
    }

    /// Register with `manager` and immediately apply its current state
    pub fn attach(listener: &Rc<Self>, manager: &StateManager<S>)
    where
        S: 'static,
    {
        manager.register_listener(Rc::clone(listener) as Rc<dyn StateListener<S>>);
        listener.sync_with(manager);
    }

    /// Re-evaluate against the manager's current state without waiting for a
    /// transition
    pub fn sync_with(&self, manager: &StateManager<S>) {
        self.apply(manager.current_state());
    }

    pub fn gate(&self) -> &EnableGate<T> {
        &self.gate
    }

    fn apply(&self, current: Option<&S>) {
        if self.enable_when.evaluate(&self.watched, current) {
            self.gate.handle_enable();
        } else {
            self.gate.handle_disable(self.delay.applies_to(current));
        }
    }
}

impl<T: Enableable + 'static, S: StateLike> StateListener<S> for StateEnabledListener<T, S> {
    fn on_state_changed(&self, _previous: Option<&S>, current: Option<&S>) {
        self.apply(current);
    }
}

/// Enables a target while a multi-state selection satisfies the configured
/// comparison against the watched list.
pub struct MultiStateEnabledListener<T: Enableable, S: StateLike = State> {
    watched: Vec<S>,
    enable_when: MultiStateComparison,
    delay: DelayPolicy<S>,
    gate: EnableGate<T>,
}

impl<T: Enableable + 'static, S: StateLike> MultiStateEnabledListener<T, S> {
    pub fn new(
        watched: impl IntoIterator<Item = S>,
        enable_when: MultiStateComparison,
        delay: DelayPolicy<S>,
        target: Rc<T>,
        scheduler: Rc<dyn DelayScheduler>,
    ) -> Self {
        let gate = EnableGate::new(target, scheduler, delay.duration);
        Self {
            watched: watched.into_iter().collect(),
            enable_when,
            delay,
            gate,
        }
    }

    pub fn attach(listener: &Rc<Self>, manager: &MultiStateManager<S>)
    where
        S: 'static,
    {
        manager.register_listener(Rc::clone(listener) as Rc<dyn MultiStateListener<S>>);
        listener.sync_with(manager);
    }

    pub fn sync_with(&self, manager: &MultiStateManager<S>) {
        self.apply(manager.current_active_states());
    }

    pub fn gate(&self) -> &EnableGate<T> {
        &self.gate
    }

    fn apply(&self, current: &MultiStateSet<S>) {
        if self.enable_when.evaluate(&self.watched, current) {
            self.gate.handle_enable();
        } else {
            self.gate.handle_disable(self.delay.is_active());
        }
    }
}

impl<T: Enableable + 'static, S: StateLike> MultiStateListener<S>
    for MultiStateEnabledListener<T, S>
{
    fn on_state_changed(&self, _previous: &MultiStateSet<S>, current: &MultiStateSet<S>) {
        self.apply(current);
    }
}
