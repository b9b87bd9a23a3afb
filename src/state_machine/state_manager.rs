use super::errors::{absent_state, invalid_state_reference, StateMachineError, StateMachineResult};
use super::listeners::{ChangedCallback, ListenerRegistry, StateListener, StateListenerRegistry};
use super::states::{ManagerPhase, State, StateCatalog, StateLike};
use crate::constants::operations;
use crate::logging::{log_error, log_transition};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Holds exactly one active state from a catalog plus its predecessor.
///
/// Besides `current` and `previous`, the manager tracks the last committed
/// state separately. External tooling can overwrite `current` without going
/// through [`set_state`](Self::set_state) (see
/// [`override_current_state`](Self::override_current_state)), and the next
/// transition must still see the correct predecessor.
pub struct StateManager<S: StateLike = State> {
    name: String,
    catalog: StateCatalog<S>,
    default_state: Option<S>,
    current: Option<S>,
    previous: Option<S>,
    last_committed: Option<S>,
    phase: ManagerPhase,
    listeners: Rc<StateListenerRegistry<S>>,
    on_changed: Rc<ListenerRegistry<ChangedCallback>>,
}

impl<S: StateLike> StateManager<S> {
    /// Create a manager seeded to its default state.
    ///
    /// The default must belong to the catalog when set.
    pub fn new(
        name: impl Into<String>,
        catalog: StateCatalog<S>,
        default_state: Option<S>,
    ) -> StateMachineResult<Self> {
        if let Some(state) = &default_state {
            if !catalog.contains(state) {
                return Err(invalid_state_reference(state, "default_state"));
            }
        }
        Ok(Self {
            name: name.into(),
            catalog,
            current: default_state.clone(),
            previous: default_state.clone(),
            last_committed: default_state.clone(),
            default_state,
            phase: ManagerPhase::Uninitialized,
            listeners: Rc::new(ListenerRegistry::new()),
            on_changed: Rc::new(ListenerRegistry::new()),
        })
    }

    /// Begin the session: seed from the default and notify once.
    ///
    /// The notification happens even when the default is unset.
    pub fn activate(&mut self) {
        self.phase = ManagerPhase::Active;
        self.reseed();
        info!(
            manager = %self.name,
            default_state = ?self.default_state,
            "State manager activated"
        );
        self.notify(operations::ACTIVATE);
    }

    /// End the session and drop every subscription
    pub fn end(&mut self) {
        self.phase = ManagerPhase::Ended;
        self.listeners.clear();
        self.on_changed.clear();
        info!(manager = %self.name, operation = operations::END, "State manager ended");
    }

    /// Transition to `state`.
    ///
    /// Returns `Ok(false)` when `state` is already current.
    pub fn set_state(&mut self, state: &S) -> StateMachineResult<bool> {
        self.ensure_active(operations::SET_STATE)?;
        self.validate(state, operations::SET_STATE)?;
        if self.current.as_ref() == Some(state) {
            debug!(manager = %self.name, state = %state, "Redundant transition ignored");
            return Ok(false);
        }
        self.previous = self.current.replace(state.clone());
        self.last_committed = self.current.clone();
        self.notify(operations::SET_STATE);
        Ok(true)
    }

    pub fn set_to_previous_state(&mut self) -> StateMachineResult<bool> {
        let previous = self
            .previous
            .clone()
            .ok_or_else(|| absent_state("set_to_previous_state"))?;
        self.set_state(&previous)
    }

    pub fn reset_to_default(&mut self) -> StateMachineResult<bool> {
        let default_state = self
            .default_state
            .clone()
            .ok_or_else(|| absent_state("reset_to_default"))?;
        self.set_state(&default_state)
    }

    /// Move forward (positive) or backward (negative) through the catalog,
    /// wrapping at both ends. An unset current state counts as the position
    /// just before the first entry.
    pub fn shift_state(&mut self, delta: isize) -> StateMachineResult<bool> {
        if self.catalog.is_empty() {
            return Err(StateMachineError::EmptyCatalog {
                operation: operations::SHIFT_STATE.to_string(),
            });
        }
        let len = self.catalog.len() as i128;
        let base = self
            .current
            .as_ref()
            .and_then(|s| self.catalog.index_of(s))
            .map_or(-1, |i| i as i128);
        let index = (base + delta as i128).rem_euclid(len) as usize;
        let target = self
            .catalog
            .get(index)
            .cloned()
            .ok_or_else(|| absent_state(operations::SHIFT_STATE))?;
        self.set_state(&target)
    }

    /// Change the default state from design-time tooling.
    ///
    /// Outside an active session the selection is reseeded to the new default.
    pub fn set_default_state(&mut self, default_state: Option<S>) -> StateMachineResult<()> {
        if let Some(state) = &default_state {
            self.validate(state, "set_default_state")?;
        }
        self.default_state = default_state;
        if !self.phase.is_active() {
            self.reseed();
        }
        Ok(())
    }

    /// Force `current` from external tooling, bypassing the transition path.
    ///
    /// The predecessor comes from the last committed state rather than from
    /// whatever `current` held, and listeners are notified.
    pub fn override_current_state(&mut self, state: Option<S>) -> StateMachineResult<()> {
        self.ensure_active(operations::OVERRIDE_CURRENT)?;
        if let Some(state) = &state {
            self.validate(state, operations::OVERRIDE_CURRENT)?;
        }
        self.current = state;
        self.previous = self.last_committed.take();
        self.last_committed = self.current.clone();
        self.notify(operations::OVERRIDE_CURRENT);
        Ok(())
    }

    /// Repair the default after the catalog or default was edited.
    ///
    /// An empty catalog clears every field; a missing default becomes the
    /// first catalog entry. Outside an active session the selection is
    /// reseeded.
    pub fn validate_configuration(&mut self) {
        if self.catalog.is_empty() {
            self.default_state = None;
            self.current = None;
            self.previous = None;
            self.last_committed = None;
            return;
        }
        let default_valid = self
            .default_state
            .as_ref()
            .is_some_and(|s| self.catalog.contains(s));
        if !default_valid {
            self.default_state = self.catalog.first().cloned();
        }
        if !self.phase.is_active() {
            self.reseed();
        }
    }

    /// Swap in a new catalog.
    ///
    /// Doing so during an active session is not supported incrementally: the
    /// default is kept if it survives (else the first entry) and the
    /// selection is reset to it without notifying.
    pub fn replace_catalog(&mut self, catalog: StateCatalog<S>) {
        if self.phase.is_active() {
            warn!(
                manager = %self.name,
                operation = operations::REPLACE_CATALOG,
                "Available states changed during an active session, resetting to default"
            );
        }
        self.catalog = catalog;
        let keep_default = self
            .default_state
            .as_ref()
            .is_some_and(|s| self.catalog.contains(s));
        if !keep_default {
            self.default_state = self.catalog.first().cloned();
        }
        self.reseed();
    }

    pub fn register_listener(&self, listener: Rc<dyn StateListener<S>>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener(&self, listener: &Rc<dyn StateListener<S>>) -> bool {
        self.listeners.unregister(listener)
    }

    /// Shared registry handle, usable from inside listener callbacks
    pub fn listeners(&self) -> Rc<StateListenerRegistry<S>> {
        Rc::clone(&self.listeners)
    }

    /// Subscribe to the zero-argument change signal
    pub fn add_on_changed_listener(&self, callback: Rc<ChangedCallback>) {
        self.on_changed.register(callback);
    }

    pub fn remove_on_changed_listener(&self, callback: &Rc<ChangedCallback>) -> bool {
        self.on_changed.unregister(callback)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &StateCatalog<S> {
        &self.catalog
    }

    pub fn default_state(&self) -> Option<&S> {
        self.default_state.as_ref()
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn previous_state(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    pub fn phase(&self) -> ManagerPhase {
        self.phase
    }

    /// Whether `state` is the current state
    pub fn is_active(&self, state: &S) -> bool {
        self.current.as_ref() == Some(state)
    }

    fn reseed(&mut self) {
        self.current = self.default_state.clone();
        self.previous = self.default_state.clone();
        self.last_committed = self.default_state.clone();
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

    fn validate(&self, state: &S, operation: &str) -> StateMachineResult<()> {
        if self.catalog.contains(state) {
            return Ok(());
        }
        let err = invalid_state_reference(state, operation);
        log_error(&self.name, operation, &err.to_string(), None);
        Err(err)
    }

    fn notify(&self, operation: &str) {
        log_transition(
            &self.name,
            operation,
            &describe(self.previous.as_ref()),
            &describe(self.current.as_ref()),
            self.listeners.len(),
        );
        let (previous, current) = (self.previous.as_ref(), self.current.as_ref());
        self.listeners
            .notify_each(|listener| listener.on_state_changed(previous, current));
        self.on_changed.notify_each(|callback| callback());
    }
}

impl<S: StateLike> std::fmt::Debug for StateManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn describe<S: StateLike>(state: Option<&S>) -> String {
    state.map_or_else(|| "<none>".to_string(), ToString::to_string)
}
