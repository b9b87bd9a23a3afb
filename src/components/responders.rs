use crate::state_machine::{
    MultiStateComparison, MultiStateListener, MultiStateManager, MultiStateSet, State, StateLike,
    StateListener,
};
use std::fmt;
use std::rc::Rc;

/// Callback run by a response listener
pub type Response = Box<dyn Fn()>;

fn run(response: &Option<Response>) {
    if let Some(response) = response {
        response();
    }
}

/// Runs `on_active` whenever the manager lands in a watched state and
/// `on_inactive` on every other transition.
pub struct StateResponseListener<S: StateLike = State> {
    watched: Vec<S>,
    on_active: Option<Response>,
    on_inactive: Option<Response>,
}

impl<S: StateLike> StateResponseListener<S> {
    pub fn new(watched: impl IntoIterator<Item = S>) -> Self {
        Self {
            watched: watched.into_iter().collect(),
            on_active: None,
            on_inactive: None,
        }
    }

    pub fn on_active(mut self, response: impl Fn() + 'static) -> Self {
        self.on_active = Some(Box::new(response));
        self
    }

    pub fn on_inactive(mut self, response: impl Fn() + 'static) -> Self {
        self.on_inactive = Some(Box::new(response));
        self
    }
}

impl<S: StateLike> StateListener<S> for StateResponseListener<S> {
    fn on_state_changed(&self, _previous: Option<&S>, current: Option<&S>) {
        if current.is_some_and(|state| self.watched.contains(state)) {
            run(&self.on_active);
        } else {
            run(&self.on_inactive);
        }
    }
}

impl<S: StateLike> fmt::Debug for StateResponseListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateResponseListener")
            .field("watched", &self.watched)
            .finish()
    }
}

/// Runs a response when the manager moves from one of the `from` states into
/// one of the `to` states. An unset previous or current state never matches.
pub struct TransitionResponseListener<S: StateLike = State> {
    from: Vec<S>,
    to: Vec<S>,
    response: Response,
}

impl<S: StateLike> TransitionResponseListener<S> {
    pub fn new(
        from: impl IntoIterator<Item = S>,
        to: impl IntoIterator<Item = S>,
        response: impl Fn() + 'static,
    ) -> Self {
        Self {
            from: from.into_iter().collect(),
            to: to.into_iter().collect(),
            response: Box::new(response),
        }
    }

    pub fn matches(&self, previous: Option<&S>, current: Option<&S>) -> bool {
        previous.is_some_and(|p| self.from.contains(p))
            && current.is_some_and(|c| self.to.contains(c))
    }
}

impl<S: StateLike> StateListener<S> for TransitionResponseListener<S> {
    fn on_state_changed(&self, previous: Option<&S>, current: Option<&S>) {
        if self.matches(previous, current) {
            (self.response)();
        }
    }
}

impl<S: StateLike> fmt::Debug for TransitionResponseListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionResponseListener")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Edge-triggered response to a multi-state selection.
///
/// Fires `on_active` when the comparison starts holding and `on_inactive`
/// when it stops. Transitions that leave the outcome unchanged fire nothing.
pub struct MultiStateResponseListener<S: StateLike = State> {
    watched: Vec<S>,
    comparison: MultiStateComparison,
    on_active: Option<Response>,
    on_inactive: Option<Response>,
}

impl<S: StateLike> MultiStateResponseListener<S> {
    pub fn new(watched: impl IntoIterator<Item = S>, comparison: MultiStateComparison) -> Self {
        Self {
            watched: watched.into_iter().collect(),
            comparison,
            on_active: None,
            on_inactive: None,
        }
    }

    pub fn on_active(mut self, response: impl Fn() + 'static) -> Self {
        self.on_active = Some(Box::new(response));
        self
    }

    pub fn on_inactive(mut self, response: impl Fn() + 'static) -> Self {
        self.on_inactive = Some(Box::new(response));
        self
    }

    /// Register with `manager`, then fire the response matching its current
    /// selection once
    pub fn attach(listener: &Rc<Self>, manager: &MultiStateManager<S>)
    where
        S: 'static,
    {
        manager.register_listener(Rc::clone(listener) as Rc<dyn MultiStateListener<S>>);
        listener.respond(manager.current_active_states());
    }

    fn respond(&self, selection: &MultiStateSet<S>) {
        if self.comparison.evaluate(&self.watched, selection) {
            run(&self.on_active);
        } else {
            run(&self.on_inactive);
        }
    }
}

impl<S: StateLike> MultiStateListener<S> for MultiStateResponseListener<S> {
    fn on_state_changed(&self, previous: &MultiStateSet<S>, current: &MultiStateSet<S>) {
        let was = self.comparison.evaluate(&self.watched, previous);
        let is = self.comparison.evaluate(&self.watched, current);
        match (was, is) {
            (false, true) => run(&self.on_active),
            (true, false) => run(&self.on_inactive),
            _ => {}
        }
    }
}

impl<S: StateLike> fmt::Debug for MultiStateResponseListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiStateResponseListener")
            .field("watched", &self.watched)
            .field("comparison", &self.comparison)
            .finish()
    }
}
