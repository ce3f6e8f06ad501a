//! The routable road graph.

use geo::Point;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::geometry::distance_km;
use crate::model::{RoadEdge, RoadNode};

/// Weighted directed road graph.
///
/// Nodes are intersections, edges are road segments; every undirected road
/// segment appears as a pair of directed edges. Instances are immutable once
/// the builder has emitted them and may be shared across threads.
#[derive(Debug, Default)]
pub struct RoadGraph {
    pub graph: DiGraph<RoadNode, RoadEdge>,
}

impl RoadGraph {
    pub(crate) fn new(graph: DiGraph<RoadNode, RoadEdge>) -> Self {
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(id)
    }

    /// Outgoing edges of a node.
    pub fn edges(&self, id: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> {
        self.graph.edges_directed(id, Direction::Outgoing)
    }

    /// The edge from `from` to `to`, if one exists. After the builder's
    /// cleanup pass there is at most one per ordered pair.
    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&RoadEdge> {
        self.graph
            .find_edge(from, to)
            .and_then(|id| self.graph.edge_weight(id))
    }

    /// Finds the node closest to `target` by great-circle distance.
    ///
    /// Linear scan over all nodes; ties keep the first node seen. Returns
    /// `None` only for an empty graph.
    pub fn nearest_node(&self, target: Point<f64>) -> Option<(NodeIndex, f64)> {
        let mut best: Option<(NodeIndex, f64)> = None;
        for id in self.graph.node_indices() {
            let node = &self.graph[id];
            let d = distance_km(target, node.geometry);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((id, d)),
            }
        }
        best
    }
}
