use super::errors::{invalid_state_reference, StateMachineResult};
use super::states::{State, StateCatalog, StateLike};
use crate::constants::operations;
use crate::logging::log_error;
use std::fmt;

/// Subset of a catalog representing which states are currently active.
///
/// Active members are always kept in catalog order, whatever order they were
/// added in, so two sets with the same members compare equal.
///
/// Every mutating operation reports whether the active members actually
/// changed. A state outside the catalog is rejected with
/// [`StateMachineError::InvalidStateReference`](super::StateMachineError) and
/// leaves the set untouched. Batch operations validate every member before
/// applying any of them.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiStateSet<S = State> {
    available: StateCatalog<S>,
    active: Vec<S>,
}

impl<S: StateLike> MultiStateSet<S> {
    /// Empty selection over the given catalog
    pub fn new(available: StateCatalog<S>) -> Self {
        Self {
            available,
            active: Vec::new(),
        }
    }

    /// Selection over the given catalog with `initial` active
    pub fn with_active<'a>(
        available: StateCatalog<S>,
        initial: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<Self>
    where
        S: 'a,
    {
        let mut set = Self::new(available);
        set.set(initial)?;
        Ok(set)
    }

    pub fn is_active(&self, state: &S) -> bool {
        self.active.contains(state)
    }

    /// Whether every given state is active (true for an empty input)
    pub fn are_active<'a>(&self, states: impl IntoIterator<Item = &'a S>) -> bool
    where
        S: 'a,
    {
        states.into_iter().all(|s| self.is_active(s))
    }

    pub fn are_all_active(&self) -> bool {
        self.are_active(self.available.iter())
    }

    pub fn active_states(&self) -> &[S] {
        &self.active
    }

    pub fn available_states(&self) -> &StateCatalog<S> {
        &self.available
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Add a state. Returns whether it was newly added.
    pub fn set_active(&mut self, state: &S) -> StateMachineResult<bool> {
        self.validate(state, operations::SET_ACTIVE)?;
        Ok(self.insert(state))
    }

    /// Add every given state, left to right. Returns whether any was added.
    pub fn set_active_many<'a>(
        &mut self,
        states: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<bool>
    where
        S: 'a,
    {
        let states = self.validate_all(states, operations::SET_ACTIVE)?;
        Ok(states
            .into_iter()
            .fold(false, |changed, state| self.insert(state) | changed))
    }

    /// Union `other`'s active members into this set
    pub fn set_active_from(&mut self, other: &MultiStateSet<S>) -> StateMachineResult<bool> {
        self.set_active_many(other.active.iter())
    }

    /// Remove a state. Returns whether it was active.
    pub fn set_inactive(&mut self, state: &S) -> StateMachineResult<bool> {
        self.validate(state, operations::SET_INACTIVE)?;
        Ok(self.remove(state))
    }

    pub fn set_inactive_many<'a>(
        &mut self,
        states: impl IntoIterator<Item = &'a S>,
    ) -> StateMachineResult<bool>
    where
        S: 'a,
    {
        let states = self.validate_all(states, operations::SET_INACTIVE)?;
        Ok(states
            .into_iter()
            .fold(false, |changed, state| self.remove(state) | changed))
    }

    /// Remove `other`'s active members from this set
    pub fn set_inactive_from(&mut self, other: &MultiStateSet<S>) -> StateMachineResult<bool> {
        self.set_inactive_many(other.active.iter())
    }

    /// Remove the state if active, add it otherwise. Always a change when valid.
    pub fn toggle(&mut self, state: &S) -> StateMachineResult<bool> {
        self.validate(state, operations::TOGGLE)?;
        if self.is_active(state) {
            Ok(self.remove(state))
        } else {
            Ok(self.insert(state))
        }
    }

    /// Replace the active members with exactly `states`.
    ///
    /// Input order and duplicates are irrelevant: the members are compared in
    /// catalog order, and an identical membership is reported as no change.
    pub fn set<'a>(&mut self, states: impl IntoIterator<Item = &'a S>) -> StateMachineResult<bool>
    where
        S: 'a,
    {
        let states = self.validate_all(states, operations::HARD_SET)?;
        let replacement = self.available.canonicalize(states);
        if replacement == self.active {
            return Ok(false);
        }
        self.active = replacement;
        Ok(true)
    }

    /// Replace the active members with `other`'s
    pub fn set_from(&mut self, other: &MultiStateSet<S>) -> StateMachineResult<bool> {
        self.set(other.active.iter())
    }

    pub fn set_all_active(&mut self) -> bool {
        if self.are_all_active() {
            return false;
        }
        self.active = self.available.as_slice().to_vec();
        true
    }

    pub fn set_all_inactive(&mut self) -> bool {
        if self.active.is_empty() {
            return false;
        }
        self.active.clear();
        true
    }

    fn insert(&mut self, state: &S) -> bool {
        if self.is_active(state) {
            return false;
        }
        self.active.push(state.clone());
        self.active = self.available.canonicalize(self.active.iter());
        true
    }

    fn remove(&mut self, state: &S) -> bool {
        match self.active.iter().position(|s| s == state) {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    fn validate(&self, state: &S, operation: &str) -> StateMachineResult<()> {
        if self.available.contains(state) {
            return Ok(());
        }
        let err = invalid_state_reference(state, operation);
        log_error("MultiStateSet", operation, &err.to_string(), None);
        Err(err)
    }

    fn validate_all<'a>(
        &self,
        states: impl IntoIterator<Item = &'a S>,
        operation: &str,
    ) -> StateMachineResult<Vec<&'a S>>
    where
        S: 'a,
    {
        let states: Vec<&'a S> = states.into_iter().collect();
        for state in &states {
            self.validate(state, operation)?;
        }
        Ok(states)
    }
}

impl<S: StateLike> fmt::Display for MultiStateSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.active.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{state}")?;
        }
        Ok(())
    }
}

impl<S: StateLike> fmt::Debug for MultiStateSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiStateSet")
            .field("active", &self.active)
            .field("available", &self.available.len())
            .finish()
    }
}
