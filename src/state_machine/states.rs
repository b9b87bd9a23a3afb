use super::errors::{StateMachineError, StateMachineResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Capabilities a state identifier needs to live in a catalog
pub trait StateLike: Clone + Eq + fmt::Debug + fmt::Display {}

impl<T> StateLike for T where T: Clone + Eq + fmt::Debug + fmt::Display {}

/// Named state identifier.
///
/// Equality and hashing use the generated identity, never the display name, so
/// two states created with the same name are distinct.
#[derive(Clone)]
pub struct State {
    id: Uuid,
    name: Arc<str>,
}

impl State {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Lifecycle of a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManagerPhase {
    /// Constructed and seeded from the default, not yet activated
    #[default]
    Uninitialized,
    /// Accepting transitions and notifying listeners
    Active,
    /// Torn down; the listener registry has been cleared
    Ended,
}

impl ManagerPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ManagerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Active => write!(f, "active"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Ordered, duplicate-free universe of states for one manager.
///
/// Cloning shares the underlying storage.
#[derive(Clone, PartialEq, Eq)]
pub struct StateCatalog<S = State> {
    states: Arc<[S]>,
}

impl<S: StateLike> StateCatalog<S> {
    /// Build a catalog, rejecting duplicate entries
    pub fn new(states: impl IntoIterator<Item = S>) -> StateMachineResult<Self> {
        let mut collected: Vec<S> = Vec::new();
        for state in states {
            if collected.contains(&state) {
                return Err(StateMachineError::DuplicateState {
                    state: state.to_string(),
                });
            }
            collected.push(state);
        }
        Ok(Self {
            states: collected.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            states: Arc::from(Vec::new()),
        }
    }

    /// Position of a state in canonical order
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.index_of(state).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.states.get(index)
    }

    pub fn first(&self) -> Option<&S> {
        self.states.first()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.states
    }

    /// Sort a list of members into catalog order, dropping duplicates
    pub(crate) fn canonicalize<'a>(&self, members: impl IntoIterator<Item = &'a S>) -> Vec<S>
    where
        S: 'a,
    {
        let mut indices: Vec<usize> = members
            .into_iter()
            .filter_map(|state| self.index_of(state))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| self.states[i].clone()).collect()
    }
}

impl<S: StateLike> fmt::Debug for StateCatalog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.states.iter()).finish()
    }
}

impl<'a, S> IntoIterator for &'a StateCatalog<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = State::new("Menu");
        let b = State::new("Menu");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Menu");
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let a = State::new("A");
        let err = StateCatalog::new([a.clone(), State::new("B"), a]).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::DuplicateState {
                state: "A".to_string()
            }
        );
    }

    #[test]
    fn test_index_of_and_canonicalize() {
        let (a, b, c) = (State::new("A"), State::new("B"), State::new("C"));
        let catalog = StateCatalog::new([a.clone(), b.clone(), c.clone()]).unwrap();

        assert_eq!(catalog.index_of(&c), Some(2));
        assert_eq!(catalog.index_of(&State::new("A")), None);
        assert_eq!(catalog.canonicalize([&c, &a, &c]), vec![a, c]);
    }

    #[test]
    fn test_catalog_over_plain_strings() {
        let catalog = StateCatalog::new(["idle", "busy"].map(String::from)).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first().map(String::as_str), Some("idle"));
        assert!(StateCatalog::<String>::empty().is_empty());
    }
}
