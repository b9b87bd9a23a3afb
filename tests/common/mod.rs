#![allow(dead_code)]

pub mod strategies;

use state_notify::{MultiStateListener, MultiStateSet, State, StateCatalog, StateListener};
use std::cell::RefCell;
use std::rc::Rc;

/// Catalog of freshly created states with the given names, in order
pub fn catalog_of(names: &[&str]) -> (Vec<State>, StateCatalog) {
    let states: Vec<State> = names.iter().map(|name| State::new(*name)).collect();
    let catalog = StateCatalog::new(states.iter().cloned()).expect("names are unique states");
    (states, catalog)
}

/// Shared log of `(listener label, previous, current)` rendered as strings
pub type EventLog = Rc<RefCell<Vec<(String, String, String)>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn render(state: Option<&State>) -> String {
    state.map_or_else(|| "-".to_string(), |s| s.name().to_string())
}

/// Single-state listener appending every notification to a shared log
pub struct TransitionRecorder {
    label: String,
    log: EventLog,
}

impl TransitionRecorder {
    pub fn new(label: &str, log: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            log: Rc::clone(log),
        })
    }
}

impl StateListener<State> for TransitionRecorder {
    fn on_state_changed(&self, previous: Option<&State>, current: Option<&State>) {
        self.log
            .borrow_mut()
            .push((self.label.clone(), render(previous), render(current)));
    }
}

/// Multi-state listener appending every notification to a shared log
pub struct SelectionRecorder {
    label: String,
    log: EventLog,
}

impl SelectionRecorder {
    pub fn new(label: &str, log: &EventLog) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            log: Rc::clone(log),
        })
    }
}

impl MultiStateListener<State> for SelectionRecorder {
    fn on_state_changed(&self, previous: &MultiStateSet<State>, current: &MultiStateSet<State>) {
        self.log
            .borrow_mut()
            .push((self.label.clone(), previous.to_string(), current.to_string()));
    }
}

pub fn labels(log: &EventLog) -> Vec<String> {
    log.borrow().iter().map(|(label, _, _)| label.clone()).collect()
}
