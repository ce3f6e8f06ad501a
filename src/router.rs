//! Top-level routing orchestrator and response envelope.

use std::sync::Arc;
use std::time::Instant;

use geo::Point;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cache::{cache_key, GraphCache};
use crate::error::Error;
use crate::geometry::{distance_km, BoundingBox};
use crate::loading::{build_road_graph, OverpassSource, RoadDataSource, RouterConfig};
use crate::model::RoadGraph;
use crate::routing::shortest_path;
use crate::MIN_ROUTE_DISTANCE_KM;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    pub(crate) fn from_point(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lng: point.x(),
        }
    }

    fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A routing request between two coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RouteRequest {
    pub source: Coordinate,
    pub destination: Coordinate,
}

/// A computed route, ready for the wire.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    /// Road-following polyline from the caller's source to its destination
    pub path: Vec<Coordinate>,
    /// Total distance over the output polyline in kilometers, three decimals
    pub distance: f64,
    /// Estimated travel time in whole minutes
    pub duration: u32,
    pub metrics: RouteMetrics,
    pub debug: RouteDebug,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteMetrics {
    /// Sum of edge weights along the node path, two decimals
    pub total_weight: f64,
    /// Number of graph nodes on the path
    pub node_count: usize,
    pub processing_time_ms: u64,
    pub graph_stats: GraphStats,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

/// Opaque node ids the endpoints snapped to.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteDebug {
    pub source_node: usize,
    pub destination_node: usize,
}

/// Process-wide routing entry point.
///
/// Holds the road-data source and the graph cache; everything per-request is
/// computed with pure functions over request-local or shared-immutable data,
/// so one `Router` serves any number of threads.
pub struct Router {
    source: Box<dyn RoadDataSource>,
    cache: GraphCache,
}

impl Router {
    /// Router backed by the Overpass API described by `config`.
    pub fn new(config: &RouterConfig) -> Result<Self, Error> {
        Ok(Self::with_source(Box::new(OverpassSource::new(config)?)))
    }

    /// Router backed by an arbitrary road-data source.
    pub fn with_source(source: Box<dyn RoadDataSource>) -> Self {
        Self {
            source,
            cache: GraphCache::new(),
        }
    }

    /// Computes the shortest driving route for the request.
    pub fn calculate_route(&self, request: &RouteRequest) -> Result<RouteResponse, Error> {
        let started = Instant::now();
        let (source, destination) = validate_endpoints(request)?;
        info!(
            "Routing ({:.5}, {:.5}) -> ({:.5}, {:.5})",
            request.source.lat, request.source.lng, request.destination.lat, request.destination.lng
        );

        let graph = self.graph_for(source, destination)?;
        let route = shortest_path(&graph, source, destination)?;

        let response = RouteResponse {
            path: route
                .polyline
                .iter()
                .map(|&p| Coordinate::from_point(p))
                .collect(),
            distance: round_to(route.distance_km, 3),
            duration: route.duration_min,
            metrics: RouteMetrics {
                total_weight: round_to(route.total_weight, 2),
                node_count: route.nodes.len(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                graph_stats: GraphStats {
                    nodes: graph.node_count(),
                    edges: graph.edge_count(),
                },
            },
            debug: RouteDebug {
                source_node: route.source_node.index(),
                destination_node: route.destination_node.index(),
            },
        };
        info!(
            "Route found: {:.3} km, {} min, {} nodes in {} ms",
            response.distance,
            response.duration,
            response.metrics.node_count,
            response.metrics.processing_time_ms
        );
        Ok(response)
    }

    /// Cached graph for the request area, fetching and building on a miss.
    /// Only successful builds are inserted.
    fn graph_for(
        &self,
        source: Point<f64>,
        destination: Point<f64>,
    ) -> Result<Arc<RoadGraph>, Error> {
        let key = cache_key(&BoundingBox::from_points(source, destination));
        if let Some(graph) = self.cache.get(&key) {
            debug!("Graph cache hit for {key}");
            return Ok(graph);
        }

        debug!("Graph cache miss for {key}");
        let ways = self.source.fetch(source, destination)?;
        let graph = Arc::new(build_road_graph(&ways));
        self.cache.insert(key, Arc::clone(&graph));
        Ok(graph)
    }
}

/// Rejects out-of-range coordinates and endpoint pairs too close to route.
fn validate_endpoints(request: &RouteRequest) -> Result<(Point<f64>, Point<f64>), Error> {
    if !request.source.is_valid() {
        return Err(Error::InvalidCoordinates(format!(
            "source ({}, {}) is out of range",
            request.source.lat, request.source.lng
        )));
    }
    if !request.destination.is_valid() {
        return Err(Error::InvalidCoordinates(format!(
            "destination ({}, {}) is out of range",
            request.destination.lat, request.destination.lng
        )));
    }
    let source = request.source.to_point();
    let destination = request.destination.to_point();
    if distance_km(source, destination) < MIN_ROUTE_DISTANCE_KM {
        return Err(Error::InvalidCoordinates(
            "endpoints are too close together to route".to_string(),
        ));
    }
    Ok((source, destination))
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
