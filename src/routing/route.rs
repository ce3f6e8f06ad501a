//! Endpoint snapping and route shaping on top of the Dijkstra search.

use geo::Point;
use log::debug;
use petgraph::graph::NodeIndex;

use crate::error::Error;
use crate::geometry::distance_km;
use crate::model::{RoadClass, RoadGraph};
use crate::routing::dijkstra::shortest_node_path;

/// A computed route through the road graph.
#[derive(Debug, Clone)]
pub struct RoutePath {
    /// Graph nodes visited, source snap first
    pub nodes: Vec<NodeIndex>,
    /// Output polyline: the caller's endpoints joined by the interior nodes
    pub polyline: Vec<Point<f64>>,
    /// Sum of great-circle distances over the polyline, in kilometers
    pub distance_km: f64,
    /// Travel-time estimate, whole minutes
    pub duration_min: u32,
    /// Sum of edge weights along the node path
    pub total_weight: f64,
    /// Node the source endpoint snapped to
    pub source_node: NodeIndex,
    /// Node the destination endpoint snapped to
    pub destination_node: NodeIndex,
}

/// Routes between two coordinates over a built graph.
///
/// Endpoints snap to their nearest graph nodes for the search; the output
/// polyline keeps the caller's exact endpoints and threads the interior of
/// the node path between them.
pub fn shortest_path(
    graph: &RoadGraph,
    source: Point<f64>,
    destination: Point<f64>,
) -> Result<RoutePath, Error> {
    let (source_node, source_gap) = graph
        .nearest_node(source)
        .ok_or(Error::NoNearbyIntersection)?;
    let (destination_node, destination_gap) = graph
        .nearest_node(destination)
        .ok_or(Error::NoNearbyIntersection)?;
    debug!(
        "Snapped source to {source_node:?} ({source_gap:.4} km off), \
         destination to {destination_node:?} ({destination_gap:.4} km off)"
    );

    let nodes = shortest_node_path(graph, source_node, destination_node)?;

    // The caller's endpoints replace the outermost node coordinates: clicks
    // usually lie off-road and the response must echo them exactly.
    let mut polyline = Vec::with_capacity(nodes.len().max(2));
    polyline.push(source);
    for &node in nodes.iter().skip(1).take(nodes.len().saturating_sub(2)) {
        if let Some(node_weight) = graph.node(node) {
            polyline.push(node_weight.geometry);
        }
    }
    polyline.push(destination);

    let distance: f64 = polyline.windows(2).map(|w| distance_km(w[0], w[1])).sum();

    let mut hours = 0.0;
    let mut total_weight = 0.0;
    for pair in nodes.windows(2) {
        if let Some(edge) = graph.edge_between(pair[0], pair[1]) {
            hours += edge.distance_km / edge.road_class.speed_kmh();
            total_weight += edge.weight;
        } else if let (Some(a), Some(b)) = (graph.node(pair[0]), graph.node(pair[1])) {
            // Unreachable on a well-formed path; estimate from coordinates.
            let gap = distance_km(a.geometry, b.geometry);
            hours += gap / RoadClass::Unknown.speed_kmh();
            total_weight += gap * RoadClass::Unknown.weight_multiplier();
        }
    }
    let duration_min = (hours * 60.0).round() as u32;

    Ok(RoutePath {
        nodes,
        polyline,
        distance_km: distance,
        duration_min,
        total_weight,
        source_node,
        destination_node,
    })
}
