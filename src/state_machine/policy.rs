//! Comparison rules listener components use to turn a selection into an
//! enabled/disabled decision. All functions here are pure.

use super::multi_state::MultiStateSet;
use super::states::StateLike;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a watched list is compared against a multi-state selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiStateComparison {
    /// At least one watched state is active
    #[default]
    AnyActive,
    /// Every watched state is active
    AllActive,
    /// No watched state is active
    NoneActive,
    /// At least one, but not every, watched state is active
    SomeActive,
}

impl MultiStateComparison {
    pub fn evaluate<S: StateLike>(&self, watched: &[S], selection: &MultiStateSet<S>) -> bool {
        let any = watched.iter().any(|s| selection.is_active(s));
        let all = watched.iter().all(|s| selection.is_active(s));
        match self {
            Self::AnyActive => any,
            Self::AllActive => all,
            Self::NoneActive => !any,
            Self::SomeActive => any && !all,
        }
    }
}

/// How a watched list is compared against a single current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleStateComparison {
    /// The current state is one of the watched states
    #[default]
    AnyActive,
    /// The current state is none of the watched states
    NoneActive,
}

impl SingleStateComparison {
    pub fn evaluate<S: StateLike>(&self, watched: &[S], current: Option<&S>) -> bool {
        let watched_is_current = current.is_some_and(|c| watched.contains(c));
        match self {
            Self::AnyActive => watched_is_current,
            Self::NoneActive => !watched_is_current,
        }
    }
}

/// Whether and how long deactivation is deferred
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPolicy<S> {
    pub enabled: bool,
    pub duration: Duration,
    /// Single-state listeners only delay deactivation into these states
    pub delayed_states: Vec<S>,
}

impl<S> DelayPolicy<S> {
    pub fn new(enabled: bool, duration: Duration) -> Self {
        Self {
            enabled,
            duration,
            delayed_states: Vec::new(),
        }
    }

    /// Immediate deactivation
    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO)
    }

    pub fn with_delayed_states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.delayed_states = states.into_iter().collect();
        self
    }

    /// Delay applies at all
    pub fn is_active(&self) -> bool {
        self.enabled && !self.duration.is_zero()
    }
}

impl<S: StateLike> DelayPolicy<S> {
    /// Delay applies to a single-state transition into `new_state`
    pub fn applies_to(&self, new_state: Option<&S>) -> bool {
        self.is_active() && new_state.is_some_and(|s| self.delayed_states.contains(s))
    }
}

impl<S> Default for DelayPolicy<S> {
    fn default() -> Self {
        Self::disabled()
    }
}
