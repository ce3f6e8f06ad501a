//! Builds the routable graph from a batch of fetched ways.
//!
//! Three passes, always in this order: way ingestion with find-or-create
//! vertex snapping, one intersection-merge pass over the node table, then a
//! single cleanup pass that drops self-loops and duplicate directed edges.

use geo::Point;
use hashbrown::{HashMap, HashSet};
use log::info;
use petgraph::graph::DiGraph;

use crate::geometry::distance_km;
use crate::model::{RoadClass, RoadEdge, RoadGraph, RoadNode, Way};
use crate::INTERSECTION_TOLERANCE_KM;

/// Grid cell side for the find-or-create index, in degrees. Wide enough that
/// any point within the snap tolerance of a node lies in the node's cell or
/// one of its eight neighbors, at any latitude where roads exist.
const BUCKET_SIDE_DEG: f64 = 1e-4;

/// Directed segment staged before emission. Node ids index into
/// `PendingGraph::nodes`.
struct PendingEdge {
    from: usize,
    to: usize,
    distance_km: f64,
    road_class: RoadClass,
    weight: f64,
    name: Option<String>,
}

/// Mutable staging area for the three builder passes.
#[derive(Default)]
struct PendingGraph {
    nodes: Vec<Point<f64>>,
    buckets: HashMap<(i64, i64), Vec<usize>>,
    edges: Vec<PendingEdge>,
}

impl PendingGraph {
    fn bucket_of(point: Point<f64>) -> (i64, i64) {
        (
            (point.y() / BUCKET_SIDE_DEG).floor() as i64,
            (point.x() / BUCKET_SIDE_DEG).floor() as i64,
        )
    }

    /// Returns the id of an existing node within the snap tolerance of
    /// `point`, or creates a new one. When several nodes qualify the
    /// earliest-created one wins, matching a linear scan over the node table.
    fn find_or_create(&mut self, point: Point<f64>) -> usize {
        let (row, col) = Self::bucket_of(point);
        let mut found: Option<usize> = None;
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                let Some(ids) = self.buckets.get(&(r, c)) else {
                    continue;
                };
                for &id in ids {
                    if distance_km(point, self.nodes[id]) < INTERSECTION_TOLERANCE_KM
                        && found.is_none_or(|best| id < best)
                    {
                        found = Some(id);
                    }
                }
            }
        }
        if let Some(id) = found {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(point);
        self.buckets.entry((row, col)).or_default().push(id);
        id
    }

    /// Walks a way's geometry, snapping each vertex to a node and staging a
    /// directed edge pair per segment. Segments that collapse onto a single
    /// node after snapping are skipped.
    fn ingest(&mut self, way: &Way) {
        if way.geometry.len() < 2 {
            return;
        }
        let mut prev: Option<usize> = None;
        for &point in &way.geometry {
            let id = self.find_or_create(point);
            if let Some(from) = prev {
                if from != id {
                    let distance = distance_km(self.nodes[from], self.nodes[id]);
                    let weight = distance * way.class.weight_multiplier();
                    for (a, b) in [(from, id), (id, from)] {
                        self.edges.push(PendingEdge {
                            from: a,
                            to: b,
                            distance_km: distance,
                            road_class: way.class,
                            weight,
                            name: way.name.clone(),
                        });
                    }
                }
            }
            prev = Some(id);
        }
    }

    /// Collapses clusters of nodes lying within twice the snap tolerance of
    /// a seed node into the seed. Membership is seed-based, not transitive:
    /// each node joins at most one cluster, and only distance to the seed
    /// counts. Returns which node ids were folded away.
    fn merge_intersections(&mut self) -> Vec<bool> {
        let n = self.nodes.len();
        let mut redirect: Vec<usize> = (0..n).collect();
        let mut removed = vec![false; n];
        let mut processed = vec![false; n];

        for seed in 0..n {
            if processed[seed] {
                continue;
            }
            processed[seed] = true;
            let mut members = vec![seed];
            for other in 0..n {
                if processed[other] {
                    continue;
                }
                if distance_km(self.nodes[seed], self.nodes[other])
                    < 2.0 * INTERSECTION_TOLERANCE_KM
                {
                    processed[other] = true;
                    members.push(other);
                }
            }
            if members.len() < 2 {
                continue;
            }

            let count = members.len() as f64;
            let (sum_x, sum_y) = members.iter().fold((0.0, 0.0), |(x, y), &m| {
                (x + self.nodes[m].x(), y + self.nodes[m].y())
            });
            self.nodes[seed] = Point::new(sum_x / count, sum_y / count);
            for &member in &members[1..] {
                redirect[member] = seed;
                removed[member] = true;
            }
        }

        for edge in &mut self.edges {
            edge.from = redirect[edge.from];
            edge.to = redirect[edge.to];
        }
        removed
    }

    /// Single cleanup pass: drops self-loops and keeps the first edge per
    /// ordered `(from, to)` pair.
    fn dedup_edges(&mut self) {
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(self.edges.len());
        self.edges
            .retain(|e| e.from != e.to && seen.insert((e.from, e.to)));
    }

    /// Emits the final immutable graph. Nodes no surviving edge touches are
    /// left out, so the result carries no orphans.
    fn emit(self, removed: &[bool]) -> RoadGraph {
        let mut used = vec![false; self.nodes.len()];
        for edge in &self.edges {
            used[edge.from] = true;
            used[edge.to] = true;
        }

        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index_of = vec![None; self.nodes.len()];
        for (id, &point) in self.nodes.iter().enumerate() {
            if removed[id] || !used[id] {
                continue;
            }
            index_of[id] = Some(graph.add_node(RoadNode { geometry: point }));
        }
        for edge in self.edges {
            if let (Some(from), Some(to)) = (index_of[edge.from], index_of[edge.to]) {
                graph.add_edge(
                    from,
                    to,
                    RoadEdge {
                        distance_km: edge.distance_km,
                        road_class: edge.road_class,
                        weight: edge.weight,
                        name: edge.name,
                    },
                );
            }
        }
        RoadGraph::new(graph)
    }
}

/// Builds a fresh routable graph from a way list.
///
/// Pure with respect to its input; two runs over the same ways yield graphs
/// identical up to node-id renaming.
pub fn build_road_graph(ways: &[Way]) -> RoadGraph {
    let mut pending = PendingGraph::default();
    for way in ways {
        pending.ingest(way);
    }
    let raw_nodes = pending.nodes.len();

    let removed = pending.merge_intersections();
    pending.dedup_edges();
    let graph = pending.emit(&removed);

    info!(
        "Built road graph: {} nodes ({} raw), {} edges from {} ways",
        graph.node_count(),
        raw_nodes,
        graph.edge_count(),
        ways.len()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(class: RoadClass, points: &[(f64, f64)]) -> Way {
        Way {
            geometry: points
                .iter()
                .map(|&(lng, lat)| Point::new(lng, lat))
                .collect(),
            class,
            name: None,
        }
    }

    fn assert_invariants(graph: &RoadGraph) {
        let mut pairs = HashSet::new();
        for edge in graph.graph.edge_indices() {
            let (from, to) = graph.graph.edge_endpoints(edge).unwrap();
            assert_ne!(from, to, "self-loop survived cleanup");
            assert!(
                pairs.insert((from, to)),
                "duplicate edge for pair {from:?} -> {to:?}"
            );
        }
        for node in graph.graph.node_indices() {
            let degree = graph
                .graph
                .edges_directed(node, petgraph::Direction::Outgoing)
                .count()
                + graph
                    .graph
                    .edges_directed(node, petgraph::Direction::Incoming)
                    .count();
            assert!(degree > 0, "orphan node {node:?}");
        }
    }

    #[test]
    fn trivial_two_way() {
        let graph = build_road_graph(&[way(
            RoadClass::Residential,
            &[(0.0, 0.0), (0.001, 0.0)],
        )]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_invariants(&graph);

        let edge = graph.graph.edge_weights().next().unwrap();
        assert!((edge.distance_km - 0.1112).abs() < 1e-3);
        assert!((edge.weight - edge.distance_km * 3.0).abs() < 1e-12);
        assert_eq!(edge.road_class, RoadClass::Residential);
    }

    #[test]
    fn shared_endpoint_reuses_node() {
        // Second way starts a few millimeters from the first way's start, so
        // vertex snapping reuses that node outright.
        let graph = build_road_graph(&[
            way(RoadClass::Residential, &[(0.0, 0.0), (0.01, 0.0)]),
            way(RoadClass::Residential, &[(0.00000005, 0.0), (0.02, 0.0)]),
        ]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_invariants(&graph);
    }

    #[test]
    fn near_nodes_merge_into_mean() {
        // 1.5e-5 deg of longitude is about 1.7 m: past the snap tolerance,
        // inside the merge threshold.
        let graph = build_road_graph(&[
            way(RoadClass::Residential, &[(0.0, 0.0), (0.01, 0.0)]),
            way(RoadClass::Residential, &[(0.000015, 0.0), (0.01, 0.0)]),
        ]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_invariants(&graph);

        let merged = graph
            .graph
            .node_weights()
            .map(|n| n.geometry.x())
            .fold(f64::INFINITY, f64::min);
        assert!((merged - 0.0000075).abs() < 1e-12, "got {merged}");
    }

    #[test]
    fn duplicate_ways_deduplicate() {
        let segment = [(0.0, 0.0), (0.01, 0.0)];
        let graph = build_road_graph(&[
            way(RoadClass::Primary, &segment),
            way(RoadClass::Residential, &segment),
        ]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_invariants(&graph);

        // First edge per ordered pair wins.
        for edge in graph.graph.edge_weights() {
            assert_eq!(edge.road_class, RoadClass::Primary);
        }
    }

    #[test]
    fn degenerate_ways_leave_nothing_behind() {
        let graph = build_road_graph(&[
            way(RoadClass::Residential, &[(0.0, 0.0)]),
            way(RoadClass::Residential, &[(0.5, 0.5), (0.5, 0.5)]),
        ]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn rebuild_is_isomorphic() {
        let ways = [
            way(RoadClass::Primary, &[(0.0, 0.0), (0.01, 0.0), (0.02, 0.01)]),
            way(RoadClass::Residential, &[(0.01, 0.0), (0.01, 0.01)]),
            way(RoadClass::Motorway, &[(0.02, 0.01), (0.03, 0.01)]),
        ];
        let a = build_road_graph(&ways);
        let b = build_road_graph(&ways);
        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(a.edge_count(), b.edge_count());

        let degrees = |g: &RoadGraph| {
            let mut d: Vec<usize> = g.graph.node_indices().map(|n| g.edges(n).count()).collect();
            d.sort_unstable();
            d
        };
        assert_eq!(degrees(&a), degrees(&b));
    }
}
