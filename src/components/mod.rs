//! # Listener Components
//!
//! Ready-made listeners that turn manager transitions into side effects:
//!
//! - [`StateEnabledListener`] / [`MultiStateEnabledListener`] switch an
//!   [`Enableable`] target on and off, optionally delaying deactivation.
//! - [`StateResponseListener`], [`TransitionResponseListener`] and
//!   [`MultiStateResponseListener`] invoke plain callbacks.

pub mod enable_gate;
pub mod enabled;
pub mod responders;

use std::cell::Cell;

pub use enable_gate::EnableGate;
pub use enabled::{MultiStateEnabledListener, StateEnabledListener};
pub use responders::{
    MultiStateResponseListener, Response, StateResponseListener, TransitionResponseListener,
};

/// Something a listener can switch on and off
pub trait Enableable {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Plain enable flag that counts how often it actually flipped
#[derive(Debug, Default)]
pub struct EnableFlag {
    enabled: Cell<bool>,
    changes: Cell<usize>,
}

impl EnableFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Cell::new(enabled),
            changes: Cell::new(0),
        }
    }

    pub fn changes(&self) -> usize {
        self.changes.get()
    }
}

impl Enableable for EnableFlag {
    fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            self.changes.set(self.changes.get() + 1);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}
