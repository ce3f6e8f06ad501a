//! Bounded single-source Dijkstra with predecessor tracing.

use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use ordered_float::OrderedFloat;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::error::Error;
use crate::model::RoadGraph;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: OrderedFloat<f64>,
    node: NodeIndex,
}

// Min-heap by cost (reversed from standard Rust BinaryHeap)
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm from `source`, terminating as soon as `target` is
/// dequeued, with the weight of each edge as its cost.
///
/// Returns the node sequence from `source` to `target` inclusive. Fails with
/// [`Error::Unreachable`] when the frontier empties first, and with
/// [`Error::SearchAborted`] if more than `2 * node_count` nodes get settled,
/// which a well-formed graph never triggers.
pub(crate) fn shortest_node_path(
    graph: &RoadGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Vec<NodeIndex>, Error> {
    let node_count = graph.node_count();
    let estimated = node_count.min(1024);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated);
    let mut heap = BinaryHeap::with_capacity(estimated / 4);

    let settle_limit = 2 * node_count;
    let mut settled = 0usize;
    let mut reached_target = false;

    distances.insert(source, 0.0);
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        // Stale heap entry, a better path was already found
        if distances.get(&node).is_some_and(|&best| cost.0 > best) {
            continue;
        }

        settled += 1;
        if settled > settle_limit {
            return Err(Error::SearchAborted);
        }

        if node == target {
            reached_target = true;
            break;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            let next_cost = cost.0 + edge.weight().weight;

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, node);
                    heap.push(State {
                        cost: OrderedFloat(next_cost),
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, node);
                        heap.push(State {
                            cost: OrderedFloat(next_cost),
                            node: next,
                        });
                    }
                }
            }
        }
    }

    if !reached_target {
        return Err(Error::Unreachable);
    }

    // Follow predecessors backward from target to source
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        if path.len() > node_count {
            return Err(Error::ReconstructionFailed);
        }
        match predecessors.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Err(Error::ReconstructionFailed),
        }
    }
    path.reverse();

    if path.first() != Some(&source) || path.last() != Some(&target) {
        return Err(Error::ReconstructionFailed);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RoadClass, RoadEdge, RoadNode};
    use geo::Point;
    use petgraph::graph::DiGraph;

    fn edge(distance_km: f64, class: RoadClass) -> RoadEdge {
        RoadEdge {
            distance_km,
            road_class: class,
            weight: distance_km * class.weight_multiplier(),
            name: None,
        }
    }

    fn node(graph: &mut DiGraph<RoadNode, RoadEdge>, lng: f64, lat: f64) -> NodeIndex {
        graph.add_node(RoadNode {
            geometry: Point::new(lng, lat),
        })
    }

    #[test]
    fn prefers_lower_weight_over_shorter_distance() {
        let mut g = DiGraph::new();
        let a = node(&mut g, 0.0, 0.0);
        let b = node(&mut g, 0.005, 0.003);
        let c = node(&mut g, 0.009, 0.0);
        // Direct residential hop: 1.0 km, weight 3.0. Motorway detour:
        // 1.2 km total, weight 1.2.
        g.add_edge(a, c, edge(1.0, RoadClass::Residential));
        g.add_edge(a, b, edge(0.6, RoadClass::Motorway));
        g.add_edge(b, c, edge(0.6, RoadClass::Motorway));
        let graph = RoadGraph::new(g);

        let path = shortest_node_path(&graph, a, c).unwrap();
        assert_eq!(path, vec![a, b, c]);
    }

    #[test]
    fn source_equals_target() {
        let mut g = DiGraph::new();
        let a = node(&mut g, 0.0, 0.0);
        let b = node(&mut g, 0.01, 0.0);
        g.add_edge(a, b, edge(1.1, RoadClass::Primary));
        let graph = RoadGraph::new(g);

        assert_eq!(shortest_node_path(&graph, a, a).unwrap(), vec![a]);
    }

    #[test]
    fn disconnected_components_are_unreachable() {
        let mut g = DiGraph::new();
        let a = node(&mut g, 0.0, 0.0);
        let b = node(&mut g, 0.01, 0.0);
        let c = node(&mut g, 1.0, 1.0);
        let d = node(&mut g, 1.01, 1.0);
        g.add_edge(a, b, edge(1.1, RoadClass::Primary));
        g.add_edge(c, d, edge(1.1, RoadClass::Primary));
        let graph = RoadGraph::new(g);

        assert!(matches!(
            shortest_node_path(&graph, a, d),
            Err(Error::Unreachable)
        ));
    }
}
