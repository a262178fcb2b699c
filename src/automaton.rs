//! The timed finite automaton (TFA) model (§4.2).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::TfaError;
use crate::interval::Interval;

/// The index of a discrete state within a [`Tfa`].
pub type StateId = usize;

/// An opaque discrete state identifier, compared and hashed by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(Rc<str>);

impl State {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An event label. Observability is encoded in the label itself: a label
/// wrapped in parentheses, e.g. `"(tick)"`, is unobservable; any other label
/// is observable. The tag is computed once at construction time rather than
/// re-inspected on every query, per the design note in §9.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventLabel {
    label: Rc<str>,
    observable: bool,
}

impl EventLabel {
    pub fn new(label: impl Into<Rc<str>>) -> Self {
        let label: Rc<str> = label.into();
        let observable = !(label.starts_with('(') && label.ends_with(')') && label.len() >= 2);
        Self { label, observable }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn is_observable(&self) -> bool {
        self.observable
    }
}

impl fmt::Display for EventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl From<&str> for EventLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The index of a transition within a [`Tfa`].
pub type TransitionId = usize;

#[derive(Debug, Clone)]
struct TransitionRecord {
    source: StateId,
    event: EventLabel,
    target: StateId,
}

/// The outcome of a successful [`Tfa::successor`] query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Successor {
    pub target: StateId,
    pub clock: f64,
    /// Whether the transition taken reset the clock.
    pub reset: bool,
}

/// An immutable timed finite automaton `(X, E, Δ, Γ, R, X_0)`.
///
/// Built once via [`TfaBuilder`] and never mutated afterwards; bound
/// computation, zone automaton construction and observer construction are
/// all pure functions of a `Tfa`.
#[derive(Debug)]
pub struct Tfa {
    states: Vec<State>,
    state_index: HashMap<State, StateId>,
    events: Vec<EventLabel>,
    transitions: Vec<TransitionRecord>,
    /// Outgoing transitions per state, sorted by `(event, target state name)`
    /// so that `successor` has a deterministic tie-break when several
    /// transitions share `(state, event)` (see §9).
    outgoing: Vec<Vec<TransitionId>>,
    guard: HashMap<TransitionId, Interval>,
    reset: HashMap<TransitionId, Option<Interval>>,
    initial_states: Vec<StateId>,
}

/// The default guard `Γ` returns for a transition with no guard on record.
const DEFAULT_GUARD_LO: f64 = 0.0;
const DEFAULT_GUARD_HI: f64 = 0.0;

impl Tfa {
    /// Returns the states of the automaton in builder-insertion order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the declared event alphabet in builder-insertion order.
    pub fn events(&self) -> &[EventLabel] {
        &self.events
    }

    pub fn initial_states(&self) -> &[StateId] {
        &self.initial_states
    }

    pub fn state_id(&self, state: &State) -> Option<StateId> {
        self.state_index.get(state).copied()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// The guard `Γ(t)` for a transition, or the documented default
    /// `[0, 0]` if `t` is not in `Δ` (§7: default-return policy).
    fn guard_of(&self, t: TransitionId) -> Interval {
        self.guard
            .get(&t)
            .copied()
            .unwrap_or_else(|| Interval::new(DEFAULT_GUARD_LO, DEFAULT_GUARD_HI, true, true).unwrap())
    }

    /// The reset `R(t)` for a transition, or `None` (no entry recorded).
    fn reset_of(&self, t: TransitionId) -> Option<Interval> {
        self.reset.get(&t).copied().flatten()
    }

    /// `enabled(x, e, c)`: is there a transition `(x, e, _)` whose guard contains `c`?
    pub fn enabled(&self, state: StateId, event: &EventLabel, clock: f64) -> bool {
        self.find_enabled(state, event, clock).is_some()
    }

    fn find_enabled(&self, state: StateId, event: &EventLabel, clock: f64) -> Option<TransitionId> {
        self.outgoing[state]
            .iter()
            .copied()
            .filter(|&t| &self.transitions[t].event == event)
            .find(|&t| self.guard_of(t).contains(clock))
    }

    /// `successor(x, e, c)`: the transition taken, if any, and the resulting
    /// clock value. When several transitions share `(x, e)`, the one whose
    /// destination state name is lexicographically smallest is preferred
    /// (§9 tie-break).
    pub fn successor(&self, state: StateId, event: &EventLabel, clock: f64) -> Option<Successor> {
        let t = self.find_enabled(state, event, clock)?;
        let record = &self.transitions[t];
        let reset_interval = self.reset_of(t);
        let (clock, reset) = match reset_interval {
            Some(r) => (r.lo(), true),
            None => (clock, false),
        };
        Some(Successor {
            target: record.target,
            clock,
            reset,
        })
    }

    /// `simulate(x_0, ((e_1, τ_1), …, (e_k, τ_k)))`.
    ///
    /// # Errors
    ///
    /// Returns [`TfaError::InvalidTrace`] on the first step whose
    /// `successor` call fails.
    pub fn simulate(
        &self,
        initial: StateId,
        trace: &[(EventLabel, f64)],
    ) -> Result<(StateId, f64), TfaError> {
        let mut state = initial;
        let mut clock = 0.0;
        for (step, (event, timestamp)) in trace.iter().enumerate() {
            clock = *timestamp;
            match self.successor(state, event, clock) {
                Some(s) => {
                    state = s.target;
                    clock = s.clock;
                }
                None => {
                    return Err(TfaError::InvalidTrace {
                        step,
                        state: self.states[state].to_string(),
                        event: event.to_string(),
                        clock,
                    });
                }
            }
        }
        Ok((state, clock))
    }

    pub(crate) fn transitions(&self) -> impl Iterator<Item = TransitionId> {
        0..self.transitions.len()
    }

    pub(crate) fn transition_endpoints(&self, t: TransitionId) -> (StateId, StateId) {
        let r = &self.transitions[t];
        (r.source, r.target)
    }

    pub(crate) fn transition_guard(&self, t: TransitionId) -> Interval {
        self.guard_of(t)
    }

    pub(crate) fn transition_reset(&self, t: TransitionId) -> Option<Interval> {
        self.reset_of(t)
    }

    pub(crate) fn outgoing_transitions(&self, state: StateId) -> &[TransitionId] {
        &self.outgoing[state]
    }
}

/// A builder for [`Tfa`]. The TFA construction interface (§6): an external
/// caller supplies the full state/event/transition/guard/reset structure up
/// front; there is no incremental mutation after [`TfaBuilder::build`].
#[derive(Debug, Default)]
pub struct TfaBuilder {
    states: Vec<State>,
    state_index: HashMap<State, StateId>,
    events: Vec<EventLabel>,
    event_index: HashMap<EventLabel, usize>,
    transitions: Vec<TransitionRecord>,
    guard: HashMap<TransitionId, Interval>,
    reset: HashMap<TransitionId, Option<Interval>>,
    initial_states: Vec<StateId>,
}

impl TfaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a state, returning its id. Declaring the same state name
    /// twice returns the existing id.
    pub fn state(&mut self, name: impl Into<Rc<str>>) -> StateId {
        let state = State::new(name);
        if let Some(&id) = self.state_index.get(&state) {
            return id;
        }
        let id = self.states.len();
        self.state_index.insert(state.clone(), id);
        self.states.push(state);
        id
    }

    /// Declares an event in the alphabet `E`, independent of any transition
    /// using it.
    pub fn event(&mut self, name: impl Into<Rc<str>>) -> EventLabel {
        let event = EventLabel::new(name);
        if !self.event_index.contains_key(&event) {
            self.event_index.insert(event.clone(), self.events.len());
            self.events.push(event.clone());
        }
        event
    }

    /// Marks a state as initial (member of `X_0`).
    pub fn initial(&mut self, state: StateId) -> &mut Self {
        if !self.initial_states.contains(&state) {
            self.initial_states.push(state);
        }
        self
    }

    /// Adds a transition `(p, e, q)` with guard `Γ(t)` and optional reset
    /// `R(t)`. Returns the new transition's id.
    pub fn transition(
        &mut self,
        source: StateId,
        event: EventLabel,
        target: StateId,
        guard: Interval,
        reset: Option<Interval>,
    ) -> TransitionId {
        self.event(event.as_str());
        let id = self.transitions.len();
        self.transitions.push(TransitionRecord {
            source,
            event,
            target,
        });
        self.guard.insert(id, guard);
        self.reset.insert(id, reset);
        id
    }

    /// Finishes construction, validating the non-emptiness invariants from §7
    /// and that every state id referenced by an initial marker or a
    /// transition endpoint was actually declared via [`TfaBuilder::state`].
    ///
    /// # Errors
    ///
    /// Returns [`TfaError::EmptyAutomaton`] if `X` or `X_0` is empty,
    /// [`TfaError::UnknownInitialState`] if a marked initial state id is out
    /// of range, or [`TfaError::UnknownState`] if a transition's source or
    /// target id is out of range.
    pub fn build(self) -> Result<Tfa, TfaError> {
        if self.states.is_empty() || self.initial_states.is_empty() {
            return Err(TfaError::EmptyAutomaton);
        }
        for &s in &self.initial_states {
            if s >= self.states.len() {
                return Err(TfaError::UnknownInitialState(s.to_string()));
            }
        }
        for t in &self.transitions {
            if t.source >= self.states.len() {
                return Err(TfaError::UnknownState(t.source.to_string()));
            }
            if t.target >= self.states.len() {
                return Err(TfaError::UnknownState(t.target.to_string()));
            }
        }
        let mut outgoing = vec![Vec::new(); self.states.len()];
        for (id, record) in self.transitions.iter().enumerate() {
            outgoing[record.source].push(id);
        }
        let states = &self.states;
        for adj in &mut outgoing {
            adj.sort_by(|&a, &b| {
                let ta = &self.transitions[a];
                let tb = &self.transitions[b];
                ta.event
                    .as_str()
                    .cmp(tb.event.as_str())
                    .then_with(|| states[ta.target].as_str().cmp(states[tb.target].as_str()))
            });
        }
        Ok(Tfa {
            states: self.states,
            state_index: self.state_index,
            events: self.events,
            transitions: self.transitions,
            outgoing,
            guard: self.guard,
            reset: self.reset,
            initial_states: self.initial_states,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_example() -> Tfa {
        let mut b = TfaBuilder::new();
        let x0 = b.state("x0");
        let x1 = b.state("x1");
        let x2 = b.state("x2");
        let x3 = b.state("x3");
        let x4 = b.state("x4");
        b.initial(x0);

        let a = b.event("a");
        let bb = b.event("b");
        let c = b.event("c");

        b.transition(
            x0,
            c.clone(),
            x1,
            Interval::new(1.0, 3.0, true, true).unwrap(),
            Some(Interval::degenerate(1.0).unwrap()),
        );
        b.transition(
            x0,
            bb.clone(),
            x2,
            Interval::new(0.0, 1.0, true, true).unwrap(),
            None,
        );
        b.transition(
            x1,
            a.clone(),
            x4,
            Interval::new(1.0, 3.0, true, true).unwrap(),
            Some(Interval::new(0.0, 1.0, true, true).unwrap()),
        );
        b.transition(
            x2,
            c.clone(),
            x3,
            Interval::new(1.0, 2.0, true, true).unwrap(),
            None,
        );
        b.transition(
            x3,
            a.clone(),
            x2,
            Interval::new(0.0, 2.0, true, true).unwrap(),
            Some(Interval::degenerate(0.0).unwrap()),
        );
        b.transition(
            x4,
            bb.clone(),
            x3,
            Interval::new(0.0, 1.0, true, true).unwrap(),
            Some(Interval::degenerate(0.0).unwrap()),
        );
        b.build().unwrap()
    }

    #[test]
    fn simulate_matches_scenario_one() {
        let tfa = build_example();
        let x0 = tfa.state_id(&State::new("x0")).unwrap();
        let trace = vec![
            (EventLabel::new("b"), 0.5),
            (EventLabel::new("c"), 2.0),
            (EventLabel::new("a"), 2.0),
        ];
        let (state, clock) = tfa.simulate(x0, &trace).unwrap();
        assert_eq!(tfa.state(state).as_str(), "x2");
        assert_eq!(clock, 0.0);
    }

    #[test]
    fn unknown_transition_uses_documented_default() {
        let tfa = build_example();
        let x1 = tfa.state_id(&State::new("x1")).unwrap();
        // x1 has no outgoing "c" transition, so it must not be enabled anywhere.
        assert!(!tfa.enabled(x1, &EventLabel::new("c"), 0.0));
    }

    #[test]
    fn unobservable_event_label_convention() {
        assert!(!EventLabel::new("(tick)").is_observable());
        assert!(EventLabel::new("tick").is_observable());
        assert!(!EventLabel::new("()").is_observable());
    }

    #[test]
    fn empty_automaton_is_rejected() {
        let b = TfaBuilder::new();
        assert!(matches!(b.build(), Err(TfaError::EmptyAutomaton)));
    }

    #[test]
    fn out_of_range_initial_state_is_rejected() {
        let mut b = TfaBuilder::new();
        b.state("x0");
        b.initial(7);
        assert!(matches!(b.build(), Err(TfaError::UnknownInitialState(_))));
    }

    #[test]
    fn out_of_range_transition_endpoint_is_rejected() {
        let mut b = TfaBuilder::new();
        let x0 = b.state("x0");
        b.initial(x0);
        let e = b.event("e");
        b.transition(x0, e, 9, Interval::new(0.0, 1.0, true, true).unwrap(), None);
        assert!(matches!(b.build(), Err(TfaError::UnknownState(_))));
    }
}
