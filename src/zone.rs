//! Zone automaton construction (§4.4): from bounds, enumerate zone
//! intervals per state and build extended states, time-advance edges and
//! event-driven edges with symbolic clock update.

use std::fmt;

use log::debug;

use crate::automaton::{EventLabel, StateId, Tfa};
use crate::bounds::BoundReport;
use crate::graph::AutomatonGraph;
use crate::interval::Interval;

/// A zone attached to a discrete state; an alias of [`Interval`] used where
/// the spec's terminology calls for "zone" rather than "guard interval".
pub type Zone = Interval;

/// An extended state `(x, Z)`: a discrete state paired with a zone.
pub type ExtendedState = (StateId, Zone);

/// The zone automaton `(V, E_τ, Δ_z, V_0)`.
pub type ZoneAutomaton = AutomatonGraph<ExtendedState>;

/// Construction statistics, in the style of the teacher's
/// `constructor::ExplorationStats`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZoneConstructionStats {
    extended_states: usize,
    time_advance_edges: usize,
    event_edges: usize,
}

impl fmt::Display for ZoneConstructionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|V| = {}, time-advance edges = {}, event edges = {}",
            self.extended_states, self.time_advance_edges, self.event_edges
        )
    }
}

/// Enumerates the zone intervals implied by a sorted, deduplicated bound
/// sequence, per §4.4: `[b0,b0], (b0,b1), [b1,b1], …, [b_{n-1},b_{n-1}], (b_{n-1}, +inf)`.
/// `+inf`, if present as the last bound, is discarded first.
fn enumerate_zones(bounds: &[f64]) -> Vec<Zone> {
    let mut bounds = bounds.to_vec();
    if let Some(&last) = bounds.last() {
        if last.is_infinite() {
            bounds.pop();
        }
    }
    if bounds.is_empty() {
        return Vec::new();
    }
    let mut zones = Vec::with_capacity(2 * bounds.len());
    zones.push(Zone::degenerate(bounds[0]).expect("degenerate interval is always valid"));
    for w in bounds.windows(2) {
        let (lo, hi) = (w[0], w[1]);
        zones.push(Zone::new(lo, hi, false, false).expect("bound sequence is ascending"));
        zones.push(Zone::degenerate(hi).expect("degenerate interval is always valid"));
    }
    let last = *bounds.last().unwrap();
    zones.push(Zone::new(last, f64::INFINITY, false, false).expect("open infinite interval is valid"));
    zones
}

/// The time-advance label crossing from `current` to the next zone at the
/// same state, per §4.4: `"{hi}+"` when `current` is degenerate, `"{hi}"` otherwise.
fn time_advance_label(current: &Zone) -> EventLabel {
    if current.is_degenerate() {
        EventLabel::new(format!("{}+", current.hi()))
    } else {
        EventLabel::new(format!("{}", current.hi()))
    }
}

/// The representative time `ρ(Z)` used to probe event transitions in a zone.
fn representative_time(zone: &Zone) -> f64 {
    if zone.hi().is_infinite() {
        zone.lo() + 1.0
    } else if zone.is_degenerate() {
        zone.lo()
    } else {
        (zone.lo() + zone.hi()) / 2.0
    }
}

/// Builds the zone automaton of `tfa` from the clock bounds in `bounds`.
pub fn build_zone_automaton(tfa: &Tfa, bounds: &BoundReport) -> ZoneAutomaton {
    let mut graph = ZoneAutomaton::new();
    let mut stats = ZoneConstructionStats::default();
    let events: Vec<EventLabel> = tfa.events().to_vec();

    for (x, _) in tfa.states().iter().enumerate() {
        let zones = enumerate_zones(bounds.bounds(x));
        if zones.is_empty() {
            continue;
        }
        let mut chain = Vec::with_capacity(zones.len());
        for zone in &zones {
            let (index, _) = graph.add_node((x, *zone));
            chain.push(index);
        }
        stats.extended_states += chain.len();

        if tfa.initial_states().contains(&x) {
            graph.mark_initial(chain[0]);
        }

        for i in 0..chain.len() - 1 {
            let label = time_advance_label(&zones[i]);
            graph.add_edge(chain[i], label, chain[i + 1]);
            stats.time_advance_edges += 1;
        }

        for (&src, zone) in chain.iter().zip(zones.iter()) {
            let rep_time = representative_time(zone);
            for event in &events {
                if let Some(successor) = tfa.successor(x, event, rep_time) {
                    let dst_zone = if successor.reset {
                        Zone::degenerate(successor.clock).expect("degenerate interval is always valid")
                    } else {
                        *zone
                    };
                    let (dst, _) = graph.add_node((successor.target, dst_zone));
                    graph.add_edge(src, event.clone(), dst);
                    stats.event_edges += 1;
                }
            }
        }
    }

    debug!("zone automaton construction: {}", stats);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::TfaBuilder;
    use crate::bounds::{compute_bounds, BoundSolverOptions};

    #[test]
    fn zone_tiling_from_three_bounds() {
        let zones = enumerate_zones(&[0.0, 1.0, 5.0]);
        let expected = vec![
            Zone::new(0.0, 0.0, true, true).unwrap(),
            Zone::new(0.0, 1.0, false, false).unwrap(),
            Zone::new(1.0, 1.0, true, true).unwrap(),
            Zone::new(1.0, 5.0, false, false).unwrap(),
            Zone::new(5.0, 5.0, true, true).unwrap(),
            Zone::new(5.0, f64::INFINITY, false, false).unwrap(),
        ];
        assert_eq!(zones, expected);
    }

    #[test]
    fn time_advance_labels() {
        let degenerate = Zone::new(1.0, 1.0, true, true).unwrap();
        let open = Zone::new(1.0, 5.0, false, false).unwrap();
        assert_eq!(time_advance_label(&degenerate).as_str(), "1+");
        assert_eq!(time_advance_label(&open).as_str(), "5");
    }

    #[test]
    fn no_resets_no_guards_yields_zero_zero_and_zero_infinity() {
        let mut b = TfaBuilder::new();
        let x0 = b.state("x0");
        b.initial(x0);
        let tfa = b.build().unwrap();
        let bounds = compute_bounds(&tfa, BoundSolverOptions::default());
        let za = build_zone_automaton(&tfa, &bounds);
        let labels: Vec<_> = za.nodes().map(|n| za.label(n).1).collect();
        assert_eq!(
            labels,
            vec![
                Zone::new(0.0, 0.0, true, true).unwrap(),
                Zone::new(0.0, f64::INFINITY, false, false).unwrap(),
            ]
        );
    }

    #[test]
    fn at_most_one_edge_per_event_per_extended_state() {
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
            None,
        );
        let tfa = b.build().unwrap();
        let bounds = compute_bounds(&tfa, BoundSolverOptions::default());
        let za = build_zone_automaton(&tfa, &bounds);
        for node in za.nodes() {
            let mut seen = Vec::new();
            for (event, _) in za.edges_from(node) {
                assert!(!seen.contains(&event), "duplicate outgoing edge for event {}", event);
                seen.push(event);
            }
        }
    }
}
