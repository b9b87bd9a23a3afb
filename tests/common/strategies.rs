use proptest::prelude::*;

/// Operation applied to a multi-state selection, by catalog index
#[derive(Debug, Clone)]
pub enum SelectionOp {
    Activate(usize),
    Deactivate(usize),
    Toggle(usize),
    Set(Vec<usize>),
}

/// Strategy for generating catalog sizes
pub fn catalog_size_strategy() -> impl Strategy<Value = usize> {
    1usize..10
}

/// Strategy for generating unique, identifier-like state names
pub fn state_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Z][a-z]{2,8}", 1..10)
        .prop_map(|names| names.into_iter().collect())
}

/// Strategy for generating a single selection operation against a catalog of `size`
pub fn selection_op_strategy(size: usize) -> impl Strategy<Value = SelectionOp> {
    prop_oneof![
        (0..size).prop_map(SelectionOp::Activate),
        (0..size).prop_map(SelectionOp::Deactivate),
        (0..size).prop_map(SelectionOp::Toggle),
        prop::collection::vec(0..size, 0..=size * 2).prop_map(SelectionOp::Set),
    ]
}

/// Strategy for generating a catalog size together with operations against it
pub fn selection_script_strategy() -> impl Strategy<Value = (usize, Vec<SelectionOp>)> {
    catalog_size_strategy().prop_flat_map(|size| {
        (
            Just(size),
            prop::collection::vec(selection_op_strategy(size), 0..40),
        )
    })
}

/// Strategy for generating index subsets (with repeats, in any order)
pub fn index_subset_strategy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    catalog_size_strategy()
        .prop_flat_map(|size| (Just(size), prop::collection::vec(0..size, 0..=size * 2)))
}

/// Strategy for generating shift deltas, including multiples of any catalog size
pub fn shift_delta_strategy() -> impl Strategy<Value = isize> {
    -50isize..50
}
