//! In-memory directed road multigraph

use petgraph::{
    Direction,
    graph::{DiGraph, EdgeReference, Edges},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use super::components::{RoadArc, RoadNode};
use crate::{ArcId, Error, NodeId};

/// Identity of a road graph.
///
/// Two graphs with the same `map_id` are considered the same map and must
/// hold the same arcs under the same keys. Route concatenation checks the
/// id, then the arcs each route actually uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMeta {
    pub map_id: String,
    #[serde(default)]
    pub name: String,
}

impl GraphMeta {
    pub fn new(map_id: impl Into<String>) -> Self {
        Self {
            map_id: map_id.into(),
            name: String::new(),
        }
    }
}

/// Road network graph. Parallel arcs between the same pair of nodes are
/// allowed.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub graph: DiGraph<RoadNode, RoadArc>,
    meta: GraphMeta,
}

impl RoadGraph {
    pub fn new(meta: GraphMeta) -> Self {
        Self {
            graph: DiGraph::new(),
            meta,
        }
    }

    pub fn with_capacity(meta: GraphMeta, nodes: usize, arcs: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, arcs),
            meta,
        }
    }

    pub fn meta(&self) -> &GraphMeta {
        &self.meta
    }

    pub fn map_id(&self) -> &str {
        &self.meta.map_id
    }

    pub fn add_node(&mut self, node: RoadNode) -> NodeId {
        self.graph.add_node(node)
    }

    /// Adds a directed arc from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] if either endpoint is not in the graph.
    pub fn add_arc(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        arc: RoadArc,
    ) -> Result<ArcId, Error> {
        if !self.contains_node(origin) || !self.contains_node(destination) {
            return Err(Error::InvalidNodeIndex);
        }
        Ok(self.graph.add_edge(origin, destination, arc))
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.graph.node_count()
    }

    pub fn node(&self, node: NodeId) -> Option<&RoadNode> {
        self.graph.node_weight(node)
    }

    pub fn arc(&self, arc: ArcId) -> Option<&RoadArc> {
        self.graph.edge_weight(arc)
    }

    /// Origin and destination of an arc
    pub fn arc_endpoints(&self, arc: ArcId) -> Option<(NodeId, NodeId)> {
        self.graph.edge_endpoints(arc)
    }

    /// Outgoing arcs of a node, in unspecified order
    pub fn edges(&self, node: NodeId) -> Edges<'_, RoadArc, petgraph::Directed> {
        self.graph.edges_directed(node, Direction::Outgoing)
    }

    /// Outgoing arcs of `origin` that end at `destination`
    pub fn arcs_between(
        &self,
        origin: NodeId,
        destination: NodeId,
    ) -> impl Iterator<Item = EdgeReference<'_, RoadArc>> {
        self.edges(origin)
            .filter(move |edge| edge.target() == destination)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;

    #[test]
    fn parallel_arcs_are_kept_apart() {
        let mut graph = RoadGraph::new(GraphMeta::new("test"));
        let a = graph.add_node(RoadNode::new(1, Point::new(0.0, 0.0)));
        let b = graph.add_node(RoadNode::new(2, Point::new(0.0, 1.0)));

        let first = graph
            .add_arc(a, b, RoadArc::with_travel_time(5.0, 3.0).unwrap())
            .unwrap();
        let second = graph
            .add_arc(a, b, RoadArc::with_travel_time(8.0, 1.0).unwrap())
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(graph.arcs_between(a, b).count(), 2);
        assert_eq!(graph.arcs_between(b, a).count(), 0);
        assert_eq!(graph.arc_endpoints(second), Some((a, b)));
        assert_eq!(graph.arc_count(), 2);
    }

    #[test]
    fn rejects_arcs_to_unknown_nodes() {
        let mut graph = RoadGraph::new(GraphMeta::new("test"));
        let a = graph.add_node(RoadNode::new(1, Point::new(0.0, 0.0)));
        let result = graph.add_arc(a, NodeId::new(7), RoadArc::new(1.0, 50.0).unwrap());
        assert_eq!(result, Err(Error::InvalidNodeIndex));
    }

    #[test]
    fn meta_deserializes_without_name() {
        let meta: GraphMeta = serde_json::from_str(r#"{"map_id": "toulouse"}"#).unwrap();
        assert_eq!(meta, GraphMeta::new("toulouse"));
    }
}
