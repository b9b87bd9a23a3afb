use super::multi_state::MultiStateSet;
use super::states::State;
use crate::constants::operations;
use crate::logging::log_listener_operation;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receives committed transitions of a single-state manager
pub trait StateListener<S = State> {
    fn on_state_changed(&self, previous: Option<&S>, current: Option<&S>);
}

/// Receives committed transitions of a multi-state manager
pub trait MultiStateListener<S = State> {
    fn on_state_changed(&self, previous: &MultiStateSet<S>, current: &MultiStateSet<S>);
}

/// Zero-argument change signal
pub type ChangedCallback = dyn Fn();

pub type StateListenerRegistry<S = State> = ListenerRegistry<dyn StateListener<S>>;
pub type MultiStateListenerRegistry<S = State> = ListenerRegistry<dyn MultiStateListener<S>>;

/// Ordered, duplicate-permitting collection of listener handles.
///
/// The registry only holds shared handles; the collaborator that created a
/// listener owns it. All methods take `&self`, so a listener holding an
/// `Rc<ListenerRegistry<_>>` may register or unregister handles while it is
/// being notified.
pub struct ListenerRegistry<L: ?Sized> {
    listeners: RefCell<Vec<Rc<L>>>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn register(&self, listener: Rc<L>) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push(listener);
        log_listener_operation(operations::REGISTER_LISTENER, listeners.len());
    }

    /// Remove the first registration of `listener`.
    ///
    /// Returns `false` when the handle was not registered.
    pub fn unregister(&self, listener: &Rc<L>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(index) = listeners.iter().position(|l| same_handle(l, listener)) else {
            return false;
        };
        listeners.remove(index);
        log_listener_operation(operations::UNREGISTER_LISTENER, listeners.len());
        true
    }

    pub fn contains(&self, listener: &Rc<L>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|l| same_handle(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Invoke `notify` on every listener, last registered first.
    ///
    /// No borrow is held while a listener runs. The pass walks the handles
    /// registered when it started: entries registered during the pass are not
    /// visited, and entries unregistered during the pass are skipped. Each
    /// handle is visited at most once per registration.
    pub fn notify_each(&self, mut notify: impl FnMut(&L)) {
        let snapshot: Vec<Rc<L>> = self.listeners.borrow().clone();
        for listener in snapshot.iter().rev() {
            if self.contains(listener) {
                notify(listener);
            }
        }
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("registered", &self.len())
            .finish()
    }
}

fn same_handle<L: ?Sized>(a: &Rc<L>, b: &Rc<L>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
