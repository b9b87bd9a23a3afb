use super::errors::{StateMachineError, StateMachineResult};
use super::listeners::{ListenerRegistry, MultiStateListener, MultiStateListenerRegistry};
use super::multi_state::MultiStateSet;
use super::states::{ManagerPhase, State, StateCatalog, StateLike};
use crate::constants::operations;
use crate::logging::{log_error, log_transition};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Holds a [`MultiStateSet`] as the current selection plus its predecessor.
///
/// Every observable mutation goes through one commit gate: snapshot the
/// current selection, apply the change, and only if something changed record
/// the snapshot as `previous` and notify listeners.
///
/// [`set_all_active`](Self::set_all_active) and
/// [`set_all_inactive`](Self::set_all_inactive) are the exception: they write
/// to the current selection directly and are never observed by listeners.
pub struct MultiStateManager<S: StateLike = State> {
    name: String,
    catalog: StateCatalog<S>,
    default_active: MultiStateSet<S>,
    current: MultiStateSet<S>,
    previous: MultiStateSet<S>,
    last_committed: MultiStateSet<S>,
    phase: ManagerPhase,
    listeners: Rc<MultiStateListenerRegistry<S>>,
}

impl<S: StateLike> MultiStateManager<S> {
    /// Create a manager whose default selection is `default_active`
    pub fn new<'a>(
        name: impl Into<String>,
        catalog: StateCatalog<S>,
        default_active: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<Self>
    where
        S: 'a,
    {
        let default_active = MultiStateSet::with_active(catalog.clone(), default_active)?;
        Ok(Self {
            name: name.into(),
            current: default_active.clone(),
            previous: default_active.clone(),
            last_committed: default_active.clone(),
            default_active,
            catalog,
            phase: ManagerPhase::Uninitialized,
            listeners: Rc::new(ListenerRegistry::new()),
        })
    }

    /// Begin the session: current becomes the default, previous is empty, and
    /// listeners are notified once.
    pub fn activate(&mut self) {
        self.phase = ManagerPhase::Active;
        self.reseed();
        self.previous.set_all_inactive();
        info!(
            manager = %self.name,
            default_active = %self.default_active,
            "Multi-state manager activated"
        );
        self.notify(operations::ACTIVATE);
    }

    pub fn end(&mut self) {
        self.phase = ManagerPhase::Ended;
        self.listeners.clear();
        info!(manager = %self.name, operation = operations::END, "Multi-state manager ended");
    }

    /// Replace the selection with exactly `states`
    pub fn set<'a>(&mut self, states: impl IntoIterator<Item = &'a S>) -> StateMachineResult<bool>
    where
        S: 'a,
    {
        let states: Vec<&S> = states.into_iter().collect();
        self.apply_change(operations::HARD_SET, |current| current.set(states))
    }

    pub fn set_state_active(&mut self, state: &S) -> StateMachineResult<bool> {
        self.apply_change(operations::SET_ACTIVE, |current| current.set_active(state))
    }

    pub fn unset_state_active(&mut self, state: &S) -> StateMachineResult<bool> {
        self.apply_change(operations::SET_INACTIVE, |current| current.set_inactive(state))
    }

    pub fn toggle_state_active(&mut self, state: &S) -> StateMachineResult<bool> {
        self.apply_change(operations::TOGGLE, |current| current.toggle(state))
    }

    /// Clear the selection if everything is active, otherwise select everything
    pub fn toggle_all_active(&mut self) -> StateMachineResult<bool> {
        let target: Vec<S> = if self.current.are_all_active() {
            Vec::new()
        } else {
            self.catalog.as_slice().to_vec()
        };
        self.apply_change(operations::HARD_SET, |current| current.set(target.iter()))
    }

    pub fn set_to_previous_active_states(&mut self) -> StateMachineResult<bool> {
        let previous = self.previous.clone();
        self.apply_change(operations::HARD_SET, |current| current.set_from(&previous))
    }

    pub fn reset_to_default(&mut self) -> StateMachineResult<bool> {
        let default_active = self.default_active.clone();
        self.apply_change(operations::HARD_SET, |current| current.set_from(&default_active))
    }

    /// Activate every state without recording a predecessor or notifying
    pub fn set_all_active(&mut self) -> bool {
        let changed = self.current.set_all_active();
        debug!(
            manager = %self.name,
            operation = operations::SET_ALL_ACTIVE,
            changed,
            "set_all_active bypassed the commit gate, listeners not notified"
        );
        changed
    }

    /// Deactivate every state without recording a predecessor or notifying
    pub fn set_all_inactive(&mut self) -> bool {
        let changed = self.current.set_all_inactive();
        debug!(
            manager = %self.name,
            operation = operations::SET_ALL_INACTIVE,
            changed,
            "set_all_inactive bypassed the commit gate, listeners not notified"
        );
        changed
    }

    /// Change the default selection from design-time tooling.
    ///
    /// Outside an active session the selection is reseeded to the new default.
    pub fn set_default_active_states<'a>(
        &mut self,
        states: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<()>
    where
        S: 'a,
    {
        self.default_active.set(states)?;
        if !self.phase.is_active() {
            self.reseed();
        }
        Ok(())
    }

    /// Force the current selection from external tooling.
    ///
    /// The predecessor is the last committed selection, and listeners are
    /// notified.
    pub fn override_current_active_states<'a>(
        &mut self,
        states: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<()>
    where
        S: 'a,
    {
        self.ensure_active(operations::OVERRIDE_CURRENT)?;
        self.current.set(states)?;
        self.previous.set_from(&self.last_committed)?;
        self.last_committed.set_from(&self.current)?;
        self.notify(operations::OVERRIDE_CURRENT);
        Ok(())
    }

    /// Swap in a new catalog.
    ///
    /// The default keeps the members that survive, and current/previous are
    /// reset to it without notifying.
    pub fn replace_catalog(&mut self, catalog: StateCatalog<S>) {
        if self.phase.is_active() {
            warn!(
                manager = %self.name,
                operation = operations::REPLACE_CATALOG,
                "Available states changed during an active session, resetting to default"
            );
        }
        let surviving: Vec<S> = self
            .default_active
            .active_states()
            .iter()
            .filter(|s| catalog.contains(s))
            .cloned()
            .collect();
        let default_active = MultiStateSet::with_active(catalog.clone(), surviving.iter())
            .unwrap_or_else(|_| MultiStateSet::new(catalog.clone()));
        self.catalog = catalog;
        self.default_active = default_active;
        self.reseed();
    }

    pub fn register_listener(&self, listener: Rc<dyn MultiStateListener<S>>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener(&self, listener: &Rc<dyn MultiStateListener<S>>) -> bool {
        self.listeners.unregister(listener)
    }

    /// Shared registry handle, usable from inside listener callbacks
    pub fn listeners(&self) -> Rc<MultiStateListenerRegistry<S>> {
        Rc::clone(&self.listeners)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &StateCatalog<S> {
        &self.catalog
    }

    pub fn default_active_states(&self) -> &MultiStateSet<S> {
        &self.default_active
    }

    pub fn current_active_states(&self) -> &MultiStateSet<S> {
        &self.current
    }

    pub fn previous_active_states(&self) -> &MultiStateSet<S> {
        &self.previous
    }

    pub fn phase(&self) -> ManagerPhase {
        self.phase
    }

    pub fn is_active(&self, state: &S) -> bool {
        self.current.is_active(state)
    }

    pub fn are_all_active(&self) -> bool {
        self.current.are_all_active()
    }

    fn apply_change(
        &mut self,
        operation: &str,
        change: impl FnOnce(&mut MultiStateSet<S>) -> StateMachineResult<bool>,
    ) -> StateMachineResult<bool> {
        self.ensure_active(operation)?;
        let snapshot = self.current.clone();
        if !change(&mut self.current)? {
            debug!(manager = %self.name, operation, "No change, commit skipped");
            return Ok(false);
        }
        self.previous = snapshot;
        self.last_committed = self.current.clone();
        self.notify(operation);
        Ok(true)
    }

    fn reseed(&mut self) {
        self.current = self.default_active.clone();
        self.previous = self.default_active.clone();
        self.last_committed = self.default_active.clone();
    }

    fn ensure_active(&self, operation: &str) -> StateMachineResult<()> {
        if self.phase.is_active() {
            return Ok(());
        }
        let err = StateMachineError::ManagerNotActive {
            phase: self.phase.to_string(),
        };
        log_error(&self.name, operation, &err.to_string(), None);
        Err(err)
    }

    fn notify(&self, operation: &str) {
        log_transition(
            &self.name,
            operation,
            &self.previous.to_string(),
            &self.current.to_string(),
            self.listeners.len(),
        );
        let (previous, current) = (&self.previous, &self.current);
        self.listeners
            .notify_each(|listener| listener.on_state_changed(previous, current));
    }
}

impl<S: StateLike> std::fmt::Debug for MultiStateManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiStateManager")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
