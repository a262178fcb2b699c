//! Clock-bound computation (§4.3): a topological propagation problem over
//! the non-resetting subgraph of the TFA.

use std::collections::{BTreeSet, VecDeque};

use log::warn;
use ordered_float::OrderedFloat;

use crate::automaton::{StateId, Tfa};

/// Which states receive the bounds of a resetting transition's reset
/// interval. The spec (§4.3 step 2, §9) adopts the `q`-only variant; the
/// original source's `compute_all_zones` uses the `p`-and-`q` variant. Both
/// are offered here so callers can reproduce either semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundPropagation {
    /// Add a resetting transition's reset bounds to its destination state only.
    QOnly,
    /// Add a resetting transition's reset bounds to both its source and destination.
    PAndQ,
}

impl Default for BoundPropagation {
    fn default() -> Self {
        Self::QOnly
    }
}

/// Options controlling bound computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundSolverOptions {
    pub propagation: BoundPropagation,
}

/// The result of bound computation: a sorted, deduplicated bound sequence
/// per state, plus the set of states whose propagation was cut short by a
/// cycle in the non-resetting subgraph (§4.3 failure mode; a warning, not a
/// fatal error, per §7).
#[derive(Debug, Clone)]
pub struct BoundReport {
    bounds: Vec<Vec<f64>>,
    cyclic_states: Vec<StateId>,
}

impl BoundReport {
    /// The sorted, deduplicated bound sequence `B(x)` for a state.
    pub fn bounds(&self, state: StateId) -> &[f64] {
        &self.bounds[state]
    }

    /// States that Kahn's algorithm left unprocessed because they sit on a
    /// cycle of non-resetting transitions; their bounds reflect only locally
    /// added bounds, with no propagation through the cycle.
    pub fn cyclic_states(&self) -> &[StateId] {
        &self.cyclic_states
    }
}

/// Computes `bounds: X → sorted sequence of ℝ ∪ {+∞}` for every state of `tfa`.
pub fn compute_bounds(tfa: &Tfa, options: BoundSolverOptions) -> BoundReport {
    let n = tfa.num_states();
    let mut sets: Vec<BTreeSet<OrderedFloat<f64>>> = vec![BTreeSet::new(); n];

    // Step 1: seed initial states with 0.
    for &x0 in tfa.initial_states() {
        sets[x0].insert(OrderedFloat(0.0));
    }

    // Step 2: local bounds from guards and resets.
    for t in tfa.transitions() {
        let (p, q) = tfa.transition_endpoints(t);
        let guard = tfa.transition_guard(t);
        sets[p].insert(OrderedFloat(guard.lo()));
        sets[p].insert(OrderedFloat(guard.hi()));
        if let Some(reset) = tfa.transition_reset(t) {
            sets[q].insert(OrderedFloat(reset.lo()));
            sets[q].insert(OrderedFloat(reset.hi()));
            if options.propagation == BoundPropagation::PAndQ {
                sets[p].insert(OrderedFloat(reset.lo()));
                sets[p].insert(OrderedFloat(reset.hi()));
            }
        }
    }

    // Δ' = non-resetting transitions, as an adjacency list keyed by source.
    let mut non_reset_adjacency: Vec<Vec<StateId>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for t in tfa.transitions() {
        if tfa.transition_reset(t).is_none() {
            let (p, q) = tfa.transition_endpoints(t);
            non_reset_adjacency[p].push(q);
            in_degree[q] += 1;
        }
    }

    // Step 3: Kahn's algorithm.
    let mut queue: VecDeque<StateId> = (0..n).filter(|&s| in_degree[s] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(p) = queue.pop_front() {
        order.push(p);
        for &q in &non_reset_adjacency[p] {
            in_degree[q] -= 1;
            if in_degree[q] == 0 {
                queue.push_back(q);
            }
        }
    }

    let cyclic_states: Vec<StateId> = (0..n).filter(|&s| !order.contains(&s)).collect();
    if !cyclic_states.is_empty() {
        warn!(
            "cycle detected in non-resetting transition subgraph; {} state(s) received no propagated bounds: {:?}",
            cyclic_states.len(),
            cyclic_states
                .iter()
                .map(|&s| tfa.state(s).as_str())
                .collect::<Vec<_>>()
        );
    }

    // Step 4: propagate along the topological order.
    for p in order {
        for &q in &non_reset_adjacency[p] {
            let propagated: Vec<_> = sets[p].iter().copied().collect();
            sets[q].extend(propagated);
        }
    }

    // Step 5: sort ascending (BTreeSet already iterates in order).
    let bounds = sets
        .into_iter()
        .map(|set| set.into_iter().map(|v| v.0).collect())
        .collect();

    BoundReport {
        bounds,
        cyclic_states,
    }
}
