//! Observer automaton construction (§4.6): subset construction over the
//! zone automaton's extended states, closed under unobservable transitions.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use log::debug;

use crate::automaton::EventLabel;
use crate::graph::{AutomatonGraph, NodeIndex};
use crate::zone::ZoneAutomaton;

/// A set of zone-automaton node indices; structural equality, ordering and
/// hashing all follow from `BTreeSet`'s, which is exactly the "set of
/// extended states" equality the spec asks for (§3).
pub type ObserverState = BTreeSet<NodeIndex>;

/// The observer automaton `(S, E_obs, Δ_o, s_0)`.
pub type ObserverAutomaton = AutomatonGraph<ObserverState>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ObserverConstructionStats {
    observer_states: usize,
    observer_transitions: usize,
}

impl fmt::Display for ObserverConstructionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|S| = {}, |Delta_o| = {}",
            self.observer_states, self.observer_transitions
        )
    }
}

/// The unobservable-closure of a set of extended states: the least fixed
/// point of `U ∪ { q : ∃ v ∈ U, (v, e, q) ∈ Δ_z, e unobservable }`.
fn closure(za: &ZoneAutomaton, states: &ObserverState) -> ObserverState {
    let mut closed = states.clone();
    let mut stack: Vec<NodeIndex> = states.iter().copied().collect();
    while let Some(v) = stack.pop() {
        for (event, target) in za.edges_from(v) {
            if !event.is_observable() && !closed.contains(target) {
                closed.insert(*target);
                stack.push(*target);
            }
        }
    }
    closed
}

/// Builds the observer automaton of `za` by determinizing it with respect
/// to the observable/unobservable partition encoded in its event labels.
pub fn build_observer(za: &ZoneAutomaton) -> ObserverAutomaton {
    let mut observer = ObserverAutomaton::new();
    let mut stats = ObserverConstructionStats::default();

    let initial: ObserverState = za.initial_nodes().iter().copied().collect();
    let initial = closure(za, &initial);
    let (initial_index, _) = observer.add_node(initial.clone());
    observer.mark_initial(initial_index);
    stats.observer_states += 1;

    let observable_events: Vec<EventLabel> = za
        .events()
        .into_iter()
        .filter(EventLabel::is_observable)
        .collect();

    let mut queue: VecDeque<ObserverState> = VecDeque::new();
    queue.push_back(initial);

    while let Some(current) = queue.pop_front() {
        let current_index = observer
            .node_of(&current)
            .expect("observer state was added before being queued");
        for event in &observable_events {
            let mut successors: BTreeSet<NodeIndex> = BTreeSet::new();
            for &v in &current {
                if let Some(target) = za.successor(v, event) {
                    successors.insert(target);
                }
            }
            if successors.is_empty() {
                continue;
            }
            let next = closure(za, &successors);
            let (next_index, is_new) = observer.add_node(next.clone());
            observer.add_edge(current_index, event.clone(), next_index);
            stats.observer_transitions += 1;
            if is_new {
                stats.observer_states += 1;
                queue.push_back(next);
            }
        }
    }

    debug!("observer construction: {}", stats);
    observer
}
