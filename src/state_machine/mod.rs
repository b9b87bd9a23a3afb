// State machine module for state catalogs, selections and change propagation
//
// Single-state and multi-state managers share one notification protocol:
// validate against the catalog, diff, commit current -> previous, then notify
// listeners last-registered first.

pub mod errors;
pub mod listeners;
pub mod multi_state;
pub mod multi_state_manager;
pub mod policy;
pub mod state_manager;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use listeners::{
    ChangedCallback, ListenerRegistry, MultiStateListener, MultiStateListenerRegistry,
    StateListener, StateListenerRegistry,
};
pub use multi_state::MultiStateSet;
pub use multi_state_manager::MultiStateManager;
pub use policy::{DelayPolicy, MultiStateComparison, SingleStateComparison};
pub use state_manager::StateManager;
pub use states::{ManagerPhase, State, StateCatalog, StateLike};
