mod common;

use common::{catalog_of, event_log, labels, EventLog, SelectionRecorder};
use state_notify::{MultiStateManager, State, StateCatalog, StateMachineError};

fn entries(log: &EventLog) -> Vec<(String, String)> {
    log.borrow()
        .iter()
        .map(|(_, previous, current)| (previous.clone(), current.clone()))
        .collect()
}

fn pair(previous: &str, current: &str) -> (String, String) {
    (previous.to_string(), current.to_string())
}

#[test]
fn test_session_commits_in_catalog_order() {
    let (s, catalog) = catalog_of(&["Hud", "Map", "Chat"]);
    let mut manager = MultiStateManager::new("overlays", catalog, [&s[0]]).unwrap();
    let log = event_log();
    manager.register_listener(SelectionRecorder::new("l", &log));

    manager.activate();
    manager.set_state_active(&s[2]).unwrap();
    manager.set_state_active(&s[1]).unwrap();
    manager.set_state_active(&s[1]).unwrap();
    manager.unset_state_active(&s[0]).unwrap();
    manager.toggle_state_active(&s[2]).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            pair("", "Hud"),
            pair("Hud", "Hud, Chat"),
            pair("Hud, Chat", "Hud, Map, Chat"),
            pair("Hud, Map, Chat", "Map, Chat"),
            pair("Map, Chat", "Map"),
        ]
    );
}

#[test]
fn test_hard_set_uses_given_states() {
    let (s, catalog) = catalog_of(&["A", "B", "C"]);
    let mut manager = MultiStateManager::new("m", catalog, [&s[0]]).unwrap();
    manager.activate();

    assert!(manager.set([&s[2], &s[1], &s[2]]).unwrap());
    assert_eq!(manager.current_active_states().to_string(), "B, C");
    assert!(!manager.set([&s[1], &s[2]]).unwrap());
    assert!(manager.set([]).unwrap());
    assert!(manager.current_active_states().is_empty());
}

#[test]
fn test_bypass_setters_skip_listeners_and_history() {
    let (s, catalog) = catalog_of(&["A", "B", "C"]);
    let mut manager = MultiStateManager::new("m", catalog, [&s[0]]).unwrap();
    manager.activate();
    let log = event_log();
    manager.register_listener(SelectionRecorder::new("l", &log));

    assert!(manager.set_all_active());
    assert!(manager.are_all_active());
    assert!(log.borrow().is_empty());
    assert_eq!(manager.previous_active_states().to_string(), "");

    manager.unset_state_active(&s[1]).unwrap();
    assert_eq!(entries(&log), vec![pair("A, B, C", "A, C")]);

    assert!(manager.set_all_inactive());
    assert!(!manager.set_all_inactive());
    assert_eq!(labels(&log).len(), 1);
}

#[test]
fn test_toggle_all_and_history_navigation() {
    let (s, catalog) = catalog_of(&["A", "B"]);
    let mut manager = MultiStateManager::new("m", catalog, [&s[1]]).unwrap();
    manager.activate();

    manager.toggle_all_active().unwrap();
    assert!(manager.are_all_active());
    manager.toggle_all_active().unwrap();
    assert!(manager.current_active_states().is_empty());

    manager.set_to_previous_active_states().unwrap();
    assert!(manager.are_all_active());

    manager.reset_to_default().unwrap();
    assert_eq!(manager.current_active_states().to_string(), "B");
    assert!(!manager.reset_to_default().unwrap());
}

#[test]
fn test_invalid_member_rejects_whole_batch() {
    let (s, catalog) = catalog_of(&["A", "B"]);
    let mut manager = MultiStateManager::new("m", catalog, []).unwrap();
    manager.activate();
    let log = event_log();
    manager.register_listener(SelectionRecorder::new("l", &log));

    let stranger = State::new("Stranger");
    let err = manager.set([&s[0], &stranger]).unwrap_err();
    assert!(matches!(err, StateMachineError::InvalidStateReference { .. }));
    assert!(manager.current_active_states().is_empty());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_listeners_hear_newest_first() {
    let (s, catalog) = catalog_of(&["A", "B"]);
    let mut manager = MultiStateManager::new("m", catalog, []).unwrap();
    manager.activate();
    let log = event_log();
    for label in ["a", "b", "c"] {
        manager.register_listener(SelectionRecorder::new(label, &log));
    }

    manager.set_state_active(&s[0]).unwrap();
    assert_eq!(labels(&log), vec!["c", "b", "a"]);
}

#[test]
fn test_override_and_catalog_replacement() {
    let (s, catalog) = catalog_of(&["A", "B", "C"]);
    let mut manager = MultiStateManager::new("m", catalog, [&s[0], &s[2]]).unwrap();
    manager.activate();
    manager.set_state_active(&s[1]).unwrap();

    let log = event_log();
    manager.register_listener(SelectionRecorder::new("l", &log));
    manager.override_current_active_states([&s[1]]).unwrap();
    assert_eq!(entries(&log), vec![pair("A, B, C", "B")]);

    let trimmed = StateCatalog::new([s[2].clone(), s[1].clone()]).unwrap();
    manager.replace_catalog(trimmed);
    assert_eq!(manager.default_active_states().to_string(), "C");
    assert_eq!(manager.current_active_states().to_string(), "C");
    assert_eq!(labels(&log).len(), 1);
}
