//! Reachability reduction (§4.5): prune extended states unreachable from the
//! initial set via a breadth-first traversal, using the same bitset-backed
//! visited-marker idea as the teacher's `parity::game::Region`.

use std::collections::VecDeque;
use std::hash::Hash;

use fixedbitset::FixedBitSet;
use log::debug;

use crate::graph::AutomatonGraph;

/// Returns a new automaton graph restricted to the nodes reachable from the
/// initial set, with transitions and events restricted to those whose
/// endpoints survive. Idempotent: reducing an already-reduced graph leaves
/// it unchanged (up to node renumbering).
pub fn reduce_reachable<L: Clone + Eq + Hash>(graph: &AutomatonGraph<L>) -> AutomatonGraph<L> {
    let mut visited = FixedBitSet::with_capacity(graph.num_nodes());
    let mut queue: VecDeque<_> = graph.initial_nodes().iter().copied().collect();
    for &n in graph.initial_nodes() {
        visited.insert(n);
    }
    while let Some(node) = queue.pop_front() {
        for &(_, target) in graph.edges_from(node) {
            if !visited[target] {
                visited.insert(target);
                queue.push_back(target);
            }
        }
    }

    let mut reduced = AutomatonGraph::new();
    for node in graph.nodes().filter(|&n| visited[n]) {
        reduced.add_node(graph.label(node).clone());
    }
    for &node in graph.initial_nodes() {
        let new_index = reduced
            .node_of(graph.label(node))
            .expect("initial node is always reachable");
        reduced.mark_initial(new_index);
    }
    for node in graph.nodes().filter(|&n| visited[n]) {
        let from = reduced
            .node_of(graph.label(node))
            .expect("node was added above");
        for (event, target) in graph.edges_from(node) {
            if visited[*target] {
                let to = reduced
                    .node_of(graph.label(*target))
                    .expect("target was added above");
                reduced.add_edge(from, event.clone(), to);
            }
        }
    }

    debug!(
        "reachability reduction: {} of {} nodes kept",
        reduced.num_nodes(),
        graph.num_nodes()
    );
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::EventLabel;

    #[test]
    fn removes_unreachable_states() {
        let mut g: AutomatonGraph<&'static str> = AutomatonGraph::new();
        let (a, _) = g.add_node("a");
        let (b, _) = g.add_node("b");
        let (unreachable, _) = g.add_node("unreachable");
        g.mark_initial(a);
        g.add_edge(a, EventLabel::new("e"), b);
        let _ = unreachable;

        let reduced = reduce_reachable(&g);
        assert_eq!(reduced.num_nodes(), 2);
        assert!(reduced.node_of(&"unreachable").is_none());
        assert!(reduced.node_of(&"a").is_some());
        assert!(reduced.node_of(&"b").is_some());
    }

    #[test]
    fn idempotent() {
        let mut g: AutomatonGraph<&'static str> = AutomatonGraph::new();
        let (a, _) = g.add_node("a");
        let (b, _) = g.add_node("b");
        g.mark_initial(a);
        g.add_edge(a, EventLabel::new("e"), b);

        let once = reduce_reachable(&g);
        let twice = reduce_reachable(&once);
        assert_eq!(once.num_nodes(), twice.num_nodes());
        assert_eq!(once.num_edges(), twice.num_edges());
    }
}
