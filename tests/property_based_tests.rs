mod common;

use common::strategies::*;
use common::{catalog_of, event_log, labels, TransitionRecorder};
use proptest::prelude::*;
use state_notify::{MultiStateSet, State, StateCatalog, StateManager};

fn catalog_sized(size: usize) -> (Vec<State>, StateCatalog) {
    let names: Vec<String> = (0..size).map(|i| format!("S{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    catalog_of(&refs)
}

fn apply(set: &mut MultiStateSet, states: &[State], op: &SelectionOp) -> bool {
    match op {
        SelectionOp::Activate(i) => set.set_active(&states[*i]).unwrap(),
        SelectionOp::Deactivate(i) => set.set_inactive(&states[*i]).unwrap(),
        SelectionOp::Toggle(i) => set.toggle(&states[*i]).unwrap(),
        SelectionOp::Set(indices) => set.set(indices.iter().map(|i| &states[*i])).unwrap(),
    }
}

fn catalog_indices(set: &MultiStateSet, catalog: &StateCatalog) -> Vec<usize> {
    set.active_states()
        .iter()
        .map(|s| catalog.index_of(s).unwrap())
        .collect()
}

proptest! {
    /// Property: the active list is always strictly in catalog order
    #[test]
    fn active_states_stay_in_catalog_order((size, ops) in selection_script_strategy()) {
        let (states, catalog) = catalog_sized(size);
        let mut set = MultiStateSet::new(catalog.clone());

        for op in &ops {
            apply(&mut set, &states, op);
            let indices = catalog_indices(&set, &catalog);
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]), "out of order: {:?}", indices);
        }
    }

    /// Property: a reported change always alters membership, and vice versa
    #[test]
    fn change_flag_matches_membership_change((size, ops) in selection_script_strategy()) {
        let (states, catalog) = catalog_sized(size);
        let mut set = MultiStateSet::new(catalog);

        for op in &ops {
            let before = set.active_states().to_vec();
            let changed = apply(&mut set, &states, op);
            prop_assert_eq!(changed, before != set.active_states());
        }
    }

    /// Property: toggling the same state twice restores the selection
    #[test]
    fn toggle_is_its_own_inverse((size, indices) in index_subset_strategy(), pick in any::<prop::sample::Index>()) {
        let (states, catalog) = catalog_sized(size);
        let mut set = MultiStateSet::new(catalog);
        set.set(indices.iter().map(|i| &states[*i])).unwrap();
        let before = set.active_states().to_vec();

        let target = &states[pick.index(size)];
        prop_assert!(set.toggle(target).unwrap());
        prop_assert!(set.toggle(target).unwrap());
        prop_assert_eq!(set.active_states(), &before[..]);
    }

    /// Property: a hard set ignores input order and duplicates
    #[test]
    fn hard_set_is_order_insensitive((size, indices) in index_subset_strategy()) {
        let (states, catalog) = catalog_sized(size);
        let mut set = MultiStateSet::new(catalog);
        set.set(indices.iter().map(|i| &states[*i])).unwrap();

        let mut reordered = indices.clone();
        reordered.reverse();
        reordered.extend(indices.iter().copied());
        prop_assert!(!set.set(reordered.iter().map(|i| &states[*i])).unwrap());
    }

    /// Property: activating an active state is a no-op
    #[test]
    fn set_active_is_idempotent((size, indices) in index_subset_strategy()) {
        let (states, catalog) = catalog_sized(size);
        let mut set = MultiStateSet::new(catalog);
        set.set_active_many(indices.iter().map(|i| &states[*i])).unwrap();
        let before = set.active_states().to_vec();

        prop_assert!(!set.set_active_many(indices.iter().map(|i| &states[*i])).unwrap());
        prop_assert_eq!(set.active_states(), &before[..]);
    }

    /// Property: shifting forward then back lands on the starting state
    #[test]
    fn shift_round_trips(size in catalog_size_strategy(), start in any::<prop::sample::Index>(), delta in shift_delta_strategy()) {
        let (states, catalog) = catalog_sized(size);
        let start = states[start.index(size)].clone();
        let mut manager = StateManager::new("prop", catalog, Some(start.clone())).unwrap();
        manager.activate();

        manager.shift_state(delta).unwrap();
        manager.shift_state(-delta).unwrap();
        prop_assert_eq!(manager.current_state(), Some(&start));
    }

    /// Property: shifting by a multiple of the catalog length never notifies
    #[test]
    fn full_cycle_shift_is_redundant(size in catalog_size_strategy(), cycles in -3isize..4) {
        let (states, catalog) = catalog_sized(size);
        let mut manager = StateManager::new("prop", catalog, Some(states[0].clone())).unwrap();
        manager.activate();

        prop_assert!(!manager.shift_state(cycles * size as isize).unwrap());
    }

    /// Property: listeners always hear about a change newest-first
    #[test]
    fn listeners_notified_in_reverse_registration_order(count in 1usize..12) {
        let (states, catalog) = catalog_of(&["A", "B"]);
        let mut manager = StateManager::new("prop", catalog, Some(states[0].clone())).unwrap();
        manager.activate();

        let log = event_log();
        for i in 0..count {
            manager.register_listener(TransitionRecorder::new(&i.to_string(), &log));
        }
        manager.set_state(&states[1]).unwrap();

        let expected: Vec<String> = (0..count).rev().map(|i| i.to_string()).collect();
        prop_assert_eq!(labels(&log), expected);
    }

    /// Property: catalogs built from unique names keep their order
    #[test]
    fn catalog_preserves_insertion_order(names in state_names_strategy()) {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (states, catalog) = catalog_of(&refs);
        for (i, state) in states.iter().enumerate() {
            prop_assert_eq!(catalog.index_of(state), Some(i));
        }
    }
}
