//! A dense, index-based labelled automaton graph, generalized from the
//! teacher's `parity::game::LabelledGame`: a `Vec` of nodes with a
//! `HashMap<label, index>` dedup map, used here for both the zone automaton
//! (§4.4) and the observer automaton (§4.6), since both are "a set of nodes
//! carrying a label, with labelled outgoing edges" at heart.

use std::collections::HashMap;
use std::hash::Hash;

use crate::automaton::EventLabel;

/// The index of a node within an [`AutomatonGraph`].
pub type NodeIndex = usize;

/// A labelled, edge-labelled automaton graph: `(V, Σ, Δ, V_0)`.
#[derive(Debug, Clone)]
pub struct AutomatonGraph<L> {
    labels: Vec<L>,
    index: HashMap<L, NodeIndex>,
    outgoing: Vec<Vec<(EventLabel, NodeIndex)>>,
    initial: Vec<NodeIndex>,
}

impl<L: Clone + Eq + Hash> Default for AutomatonGraph<L> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
            initial: Vec::new(),
        }
    }
}

impl<L: Clone + Eq + Hash> AutomatonGraph<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `label`, creating it if it did not already
    /// exist. Returns `(index, true)` if a new node was created.
    pub fn add_node(&mut self, label: L) -> (NodeIndex, bool) {
        if let Some(&index) = self.index.get(&label) {
            return (index, false);
        }
        let index = self.labels.len();
        self.index.insert(label.clone(), index);
        self.labels.push(label);
        self.outgoing.push(Vec::new());
        (index, true)
    }

    pub fn mark_initial(&mut self, node: NodeIndex) {
        if !self.initial.contains(&node) {
            self.initial.push(node);
        }
    }

    pub fn add_edge(&mut self, from: NodeIndex, event: EventLabel, to: NodeIndex) {
        self.outgoing[from].push((event, to));
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        0..self.labels.len()
    }

    pub fn label(&self, node: NodeIndex) -> &L {
        &self.labels[node]
    }

    pub fn node_of(&self, label: &L) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    pub fn initial_nodes(&self) -> &[NodeIndex] {
        &self.initial
    }

    pub fn is_initial(&self, node: NodeIndex) -> bool {
        self.initial.contains(&node)
    }

    /// Outgoing `(event, target)` edges of `node`, in insertion order.
    pub fn edges_from(&self, node: NodeIndex) -> &[(EventLabel, NodeIndex)] {
        &self.outgoing[node]
    }

    /// The unique successor of `node` along `event`, if any. §8 requires at
    /// most one outgoing edge per event at any node; this returns the first
    /// match, which is the only match in a well-formed graph.
    pub fn successor(&self, node: NodeIndex, event: &EventLabel) -> Option<NodeIndex> {
        self.outgoing[node]
            .iter()
            .find(|(e, _)| e == event)
            .map(|(_, to)| *to)
    }

    /// All distinct event labels appearing on some edge of the graph.
    pub fn events(&self) -> Vec<EventLabel> {
        let mut seen: Vec<EventLabel> = Vec::new();
        for edges in &self.outgoing {
            for (event, _) in edges {
                if !seen.contains(event) {
                    seen.push(event.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_nodes_by_label() {
        let mut g: AutomatonGraph<&'static str> = AutomatonGraph::new();
        let (a, new_a) = g.add_node("a");
        let (a2, new_a2) = g.add_node("a");
        assert_eq!(a, a2);
        assert!(new_a);
        assert!(!new_a2);
    }

    #[test]
    fn tracks_initial_nodes() {
        let mut g: AutomatonGraph<&'static str> = AutomatonGraph::new();
        let (a, _) = g.add_node("a");
        g.mark_initial(a);
        assert!(g.is_initial(a));
        let (b, _) = g.add_node("b");
        assert!(!g.is_initial(b));
    }

    #[test]
    fn at_most_one_successor_per_event() {
        let mut g: AutomatonGraph<&'static str> = AutomatonGraph::new();
        let (a, _) = g.add_node("a");
        let (b, _) = g.add_node("b");
        g.add_edge(a, EventLabel::new("x"), b);
        assert_eq!(g.successor(a, &EventLabel::new("x")), Some(b));
        assert_eq!(g.successor(a, &EventLabel::new("y")), None);
    }
}
