//! Analysis of timed finite automata: clock-bound computation, zone
//! automaton construction and observer automaton construction.
//!
//! The crate builds a [`Tfa`] via [`TfaBuilder`], then runs the three
//! analyses in sequence: [`compute_bounds`] derives the clock bound set for
//! every state, [`build_zone_automaton`] tiles each state's clock range into
//! zones and links them with time-advance and event edges, and
//! [`build_observer`] determinizes the zone automaton with respect to its
//! observable events. [`analyze`] runs all three and additionally reduces
//! both automata to their reachable parts.

pub mod automaton;
pub mod bounds;
pub mod error;
pub mod graph;
pub mod interval;
pub mod observer;
pub mod reduce;
pub mod render;
pub mod zone;

pub use automaton::{EventLabel, State, StateId, Successor, Tfa, TfaBuilder, TransitionId};
pub use bounds::{compute_bounds, BoundPropagation, BoundReport, BoundSolverOptions};
pub use error::TfaError;
pub use graph::{AutomatonGraph, NodeIndex};
pub use interval::Interval;
pub use observer::{build_observer, ObserverAutomaton, ObserverState};
pub use reduce::reduce_reachable;
pub use render::{ObserverAutomatonView, RenderableAutomaton, ZoneAutomatonView};
pub use zone::{build_zone_automaton, ExtendedState, Zone, ZoneAutomaton};

use log::info;

/// The three automata produced by a full analysis run: the clock bounds the
/// others are built from, the zone automaton, and the observer automaton
/// determinized from it. Both automata are reduced to their reachable part.
pub struct Analysis {
    pub bounds: BoundReport,
    pub zone_automaton: ZoneAutomaton,
    pub observer_automaton: ObserverAutomaton,
}

/// Runs the full analysis pipeline on `tfa` with the default bound-solver
/// options. See [`analyze_with`] for a version taking explicit options.
pub fn analyze(tfa: &Tfa) -> Analysis {
    analyze_with(tfa, BoundSolverOptions::default())
}

/// Runs the full analysis pipeline on `tfa`: bound computation, zone
/// automaton construction, observer construction, and reachability reduction
/// of both automata.
pub fn analyze_with(tfa: &Tfa, options: BoundSolverOptions) -> Analysis {
    info!("computing clock bounds");
    let bounds = compute_bounds(tfa, options);

    info!("building zone automaton");
    let zone_automaton = reduce_reachable(&build_zone_automaton(tfa, &bounds));

    info!("building observer automaton");
    let observer_automaton = reduce_reachable(&build_observer(&zone_automaton));

    Analysis {
        bounds,
        zone_automaton,
        observer_automaton,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_runs_end_to_end_on_a_minimal_automaton() {
        let mut b = TfaBuilder::new();
        let x0 = b.state("x0");
        let x1 = b.state("x1");
        b.initial(x0);
        let e = b.event("e");
        b.transition(
            x0,
            e,
            x1,
            Interval::new(0.0, 1.0, true, true).unwrap(),
            Some(Interval::degenerate(0.0).unwrap()),
        );
        let tfa = b.build().unwrap();

        let analysis = analyze(&tfa);
        assert!(analysis.zone_automaton.num_nodes() > 0);
        assert!(analysis.observer_automaton.num_nodes() > 0);
        assert!(!analysis.bounds.bounds(x0).is_empty());
    }
}
