#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # State Notify
//!
//! Finite-state notification engine: managers that own a current selection
//! from a fixed catalog of states and tell subscribers about every change.
//!
//! ## Overview
//!
//! Two kinds of manager share one notification protocol:
//!
//! - [`StateManager`]: exactly one current state (or none) out of the catalog
//! - [`MultiStateManager`]: any subset of the catalog, kept in catalog order
//!
//! Every transition is validated against the catalog, compared against the
//! current value, committed as `current -> previous`, and then delivered to
//! listeners in reverse registration order. Listeners may register or
//! unregister handles while a notification is in flight.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Catalogs, selections, managers and listener registries
//! - [`components`] - Ready-made listeners with enable/disable and callback responses
//! - [`scheduler`] - Cancellable deferred tasks for delayed deactivation
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`logging`] - Structured logging setup and operation helpers
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust
//! use state_notify::{State, StateCatalog, StateManager};
//!
//! let idle = State::new("Idle");
//! let run = State::new("Run");
//! let catalog = StateCatalog::new([idle.clone(), run.clone()]).unwrap();
//!
//! let mut manager = StateManager::new("player", catalog, Some(idle.clone())).unwrap();
//! manager.activate();
//! assert!(manager.set_state(&run).unwrap());
//! assert_eq!(manager.previous_state(), Some(&idle));
//! ```
//!
//! ## Threading
//!
//! Managers, registries and schedulers are single-threaded (`Rc`-based).
//! Delayed deactivation runs either on a [`ManualScheduler`] advanced by the
//! host loop or on [`LocalTokioScheduler`] inside a `tokio::task::LocalSet`.

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod state_machine;

pub use components::{
    EnableFlag, EnableGate, Enableable, MultiStateEnabledListener, MultiStateResponseListener,
    StateEnabledListener, StateResponseListener, TransitionResponseListener,
};
pub use config::{ConfigManager, ConfigurationError, NotifyConfig};
pub use error::{Result, StateNotifyError};
pub use scheduler::{DelayScheduler, LocalTokioScheduler, ManualScheduler, ScheduledTask};
pub use state_machine::{
    DelayPolicy, ListenerRegistry, ManagerPhase, MultiStateComparison, MultiStateListener,
    MultiStateManager, MultiStateSet, SingleStateComparison, State, StateCatalog, StateLike,
    StateListener, StateMachineError, StateMachineResult, StateManager,
};
