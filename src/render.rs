//! The visualization contract (§4.7, §6): a pull interface over nodes and
//! edges for an external renderer. Rendering to graph images is explicitly
//! out of scope here — this module only exposes what a renderer needs to
//! iterate.

use crate::automaton::Tfa;
use crate::graph::NodeIndex;
use crate::observer::ObserverAutomaton;
use crate::zone::ZoneAutomaton;

/// An automaton a renderer can iterate: its nodes, which are initial,
/// formatted node labels, and `(source, label, target)` edges.
pub trait RenderableAutomaton {
    fn node_count(&self) -> usize;
    fn nodes(&self) -> Vec<NodeIndex>;
    fn is_initial(&self, node: NodeIndex) -> bool;
    fn node_label(&self, node: NodeIndex) -> String;
    fn edges(&self) -> Vec<(NodeIndex, String, NodeIndex)>;
}

/// A renderable view of a [`ZoneAutomaton`], resolving discrete state ids
/// back to their names via the originating [`Tfa`].
pub struct ZoneAutomatonView<'a> {
    pub graph: &'a ZoneAutomaton,
    pub tfa: &'a Tfa,
}

impl<'a> ZoneAutomatonView<'a> {
    pub fn new(graph: &'a ZoneAutomaton, tfa: &'a Tfa) -> Self {
        Self { graph, tfa }
    }

    fn format_node(&self, node: NodeIndex) -> String {
        let (state, zone) = self.graph.label(node);
        format!("{} {}", self.tfa.state(*state), zone)
    }
}

impl<'a> RenderableAutomaton for ZoneAutomatonView<'a> {
    fn node_count(&self) -> usize {
        self.graph.num_nodes()
    }

    fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.nodes().collect()
    }

    fn is_initial(&self, node: NodeIndex) -> bool {
        self.graph.is_initial(node)
    }

    fn node_label(&self, node: NodeIndex) -> String {
        self.format_node(node)
    }

    fn edges(&self) -> Vec<(NodeIndex, String, NodeIndex)> {
        self.graph
            .nodes()
            .flat_map(|n| {
                self.graph
                    .edges_from(n)
                    .iter()
                    .map(move |(event, target)| (n, event.to_string(), *target))
            })
            .collect()
    }
}

/// A renderable view of an [`ObserverAutomaton`], formatting each observer
/// state as a brace-delimited set of its member extended-state labels.
pub struct ObserverAutomatonView<'a> {
    pub graph: &'a ObserverAutomaton,
    pub zone_view: &'a ZoneAutomatonView<'a>,
}

impl<'a> ObserverAutomatonView<'a> {
    pub fn new(graph: &'a ObserverAutomaton, zone_view: &'a ZoneAutomatonView<'a>) -> Self {
        Self { graph, zone_view }
    }
}

impl<'a> RenderableAutomaton for ObserverAutomatonView<'a> {
    fn node_count(&self) -> usize {
        self.graph.num_nodes()
    }

    fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.nodes().collect()
    }

    fn is_initial(&self, node: NodeIndex) -> bool {
        self.graph.is_initial(node)
    }

    fn node_label(&self, node: NodeIndex) -> String {
        let members = self.graph.label(node);
        let formatted: Vec<String> = members
            .iter()
            .map(|&v| self.zone_view.format_node(v))
            .collect();
        format!("{{ {} }}", formatted.join(", "))
    }

    fn edges(&self) -> Vec<(NodeIndex, String, NodeIndex)> {
        self.graph
            .nodes()
            .flat_map(|n| {
                self.graph
                    .edges_from(n)
                    .iter()
                    .map(move |(event, target)| (n, event.to_string(), *target))
            })
            .collect()
    }
}
