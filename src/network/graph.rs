use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::error::SimError;

/// ==============================================================================================
/// ==================================== Reaction Graph ==========================================
/// ==============================================================================================

/// Directed multigraph of molecular species (nodes) and kinetic
/// interactions (arcs).
///
/// The graph carries no payload: species and interaction data live in
/// parallel tables owned by the network, indexed by `NodeIndex` /
/// `EdgeIndex`. Arcs can therefore cross-reference each other by index
/// (promoter back-references, complexation pairs) without ownership
/// cycles. Nothing is ever removed, so every handle stays valid for the
/// life of the network and iteration follows insertion order.
#[derive(Debug, Default, Clone)]
pub struct ReactionGraph {
    topology: DiGraph<(), ()>,
}

impl ReactionGraph {
    #[inline]
    pub fn new() -> Self {
        Self {
            topology: DiGraph::new(),
        }
    }

    #[inline]
    pub fn add_node(&mut self) -> NodeIndex {
        self.topology.add_node(())
    }

    #[inline]
    pub fn add_arc(&mut self, from: NodeIndex, to: NodeIndex) -> EdgeIndex {
        self.topology.add_edge(from, to, ())
    }

    /// Source and target of an arc. A stale arc id is a shape error, not
    /// a panic: the caller reports it with the arc id attached.
    #[inline]
    pub fn endpoints(&self, arc: EdgeIndex) -> Result<(NodeIndex, NodeIndex), SimError> {
        self.topology
            .edge_endpoints(arc)
            .ok_or_else(|| SimError::GraphShape {
                arc: arc.index(),
                kind: "unknown",
                detail: "arc id does not exist in the graph".into(),
            })
    }

    #[inline]
    pub fn source(&self, arc: EdgeIndex) -> Result<NodeIndex, SimError> {
        Ok(self.endpoints(arc)?.0)
    }

    #[inline]
    pub fn target(&self, arc: EdgeIndex) -> Result<NodeIndex, SimError> {
        Ok(self.endpoints(arc)?.1)
    }

    /// The endpoint of `arc` that is not `node`. Fails with `GraphShape`
    /// if `node` is neither endpoint.
    pub fn opposite(&self, arc: EdgeIndex, node: NodeIndex) -> Result<NodeIndex, SimError> {
        let (s, t) = self.endpoints(arc)?;
        if node == s {
            Ok(t)
        } else if node == t {
            Ok(s)
        } else {
            Err(SimError::GraphShape {
                arc: arc.index(),
                kind: "unknown",
                detail: format!("node {} is neither source nor target", node.index()),
            })
        }
    }

    /// All nodes in insertion order.
    #[inline]
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.topology.node_indices()
    }

    /// All arcs in insertion order.
    #[inline]
    pub fn arcs(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.topology.edge_indices()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.topology.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_returns_other_endpoint() {
        let mut g = ReactionGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        let ab = g.add_arc(a, b);

        assert_eq!(g.opposite(ab, a).expect("endpoint"), b);
        assert_eq!(g.opposite(ab, b).expect("endpoint"), a);
        assert!(matches!(
            g.opposite(ab, c),
            Err(SimError::GraphShape { .. })
        ));
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut g = ReactionGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let ab = g.add_arc(a, b);
        let ba = g.add_arc(b, a);
        let ab2 = g.add_arc(a, b); // parallel arc, multigraph

        let arcs: Vec<_> = g.arcs().collect();
        assert_eq!(arcs, vec![ab, ba, ab2]);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.arc_count(), 3);
    }
}
