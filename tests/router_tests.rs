//! End-to-end tests for the routing orchestrator, driven through an
//! in-memory road-data source so no network is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geo::Point;
use viaroute::loading::RoadDataSource;
use viaroute::model::{RoadClass, Way};
use viaroute::{Coordinate, Error, RouteRequest, Router};

/// Serves a fixed way list and counts fetches.
struct FixedSource {
    ways: Vec<Way>,
    calls: Arc<AtomicUsize>,
}

impl RoadDataSource for FixedSource {
    fn fetch(&self, _source: Point<f64>, _destination: Point<f64>) -> Result<Vec<Way>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.ways.is_empty() {
            return Err(Error::EmptyArea);
        }
        Ok(self.ways.clone())
    }
}

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

fn router_with(ways: Vec<Way>) -> (Router, Arc<AtomicUsize>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let calls = Arc::new(AtomicUsize::new(0));
    let source = FixedSource {
        ways,
        calls: Arc::clone(&calls),
    };
    (Router::with_source(Box::new(source)), calls)
}

fn request(source: (f64, f64), destination: (f64, f64)) -> RouteRequest {
    RouteRequest {
        source: Coordinate::new(source.0, source.1),
        destination: Coordinate::new(destination.0, destination.1),
    }
}

#[test]
fn routes_along_a_single_residential_way() {
    let (router, _) = router_with(vec![way(
        RoadClass::Residential,
        &[(0.0, 0.0), (0.001, 0.0)],
    )]);

    let response = router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.001)))
        .unwrap();

    assert_eq!(response.path.len(), 2);
    assert_eq!(response.path[0], Coordinate::new(0.0, 0.0));
    assert_eq!(response.path[1], Coordinate::new(0.0, 0.001));
    assert!((response.distance - 0.111).abs() < 1e-3);
    assert_eq!(response.duration, 0);
    assert_eq!(response.metrics.node_count, 2);
    assert_eq!(response.metrics.graph_stats.nodes, 2);
    assert_eq!(response.metrics.graph_stats.edges, 2);
    assert_ne!(
        response.debug.source_node,
        response.debug.destination_node
    );
}

#[test]
fn echoes_off_road_endpoints_exactly() {
    let (router, _) = router_with(vec![way(RoadClass::Residential, &[(0.0, 0.0), (0.01, 0.0)])]);

    let source = Coordinate::new(0.0001, 0.0001);
    let destination = Coordinate::new(-0.0002, 0.0099);
    let response = router
        .calculate_route(&RouteRequest {
            source,
            destination,
        })
        .unwrap();

    assert_eq!(response.path.first(), Some(&source));
    assert_eq!(response.path.last(), Some(&destination));
}

#[test]
fn prefers_the_faster_class_and_reports_its_distance() {
    let (router, _) = router_with(vec![
        way(RoadClass::Residential, &[(0.0, 0.0), (0.009, 0.0)]),
        way(
            RoadClass::Motorway,
            &[(0.0, 0.0), (0.0045, 0.00329), (0.009, 0.0)],
        ),
    ]);

    let response = router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.009)))
        .unwrap();

    // The detour is longer in kilometers but cheaper in weight.
    assert!((response.distance - 1.24).abs() < 0.01);
    assert!((response.metrics.total_weight - 1.24).abs() < 0.01);
    assert_eq!(response.metrics.node_count, 3);
}

#[test]
fn caches_the_graph_per_quantized_area() {
    let (router, calls) = router_with(vec![way(
        RoadClass::Residential,
        &[(0.0, 0.0), (0.009, 0.0)],
    )]);

    router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.009)))
        .unwrap();
    router
        .calculate_route(&request((0.0, 0.0005), (0.0, 0.0085)))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1, "second request should hit the cache");

    // A request in a different quantized box fetches again.
    router
        .calculate_route(&request((1.0, 1.0), (1.0, 1.009)))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn unreachable_networks_surface_as_not_found() {
    let (router, _) = router_with(vec![
        way(RoadClass::Residential, &[(0.0, 0.0), (0.01, 0.0)]),
        way(RoadClass::Residential, &[(1.0, 1.0), (1.01, 1.0)]),
    ]);

    let err = router
        .calculate_route(&request((0.0, 0.0), (1.0, 1.01)))
        .unwrap_err();
    assert!(matches!(err, Error::Unreachable));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn empty_area_propagates_from_the_source() {
    let (router, calls) = router_with(vec![]);

    let err = router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.009)))
        .unwrap_err();
    assert!(matches!(err, Error::EmptyArea));
    assert_eq!(err.status_code(), 404);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Failed fetches must not populate the cache.
    router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.009)))
        .unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn rejects_invalid_and_too_close_endpoints_without_fetching() {
    let (router, calls) = router_with(vec![way(
        RoadClass::Residential,
        &[(0.0, 0.0), (0.01, 0.0)],
    )]);

    let err = router
        .calculate_route(&request((91.0, 0.0), (0.0, 0.01)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinates(_)));

    let err = router
        .calculate_route(&request((0.0, 0.0), (0.00005, 0.0)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinates(_)));
    assert_eq!(err.status_code(), 400);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn response_serializes_to_the_wire_shape() {
    let (router, _) = router_with(vec![way(
        RoadClass::Residential,
        &[(0.0, 0.0), (0.009, 0.0)],
    )]);

    let response = router
        .calculate_route(&request((0.0, 0.0), (0.0, 0.009)))
        .unwrap();
    let value = serde_json::to_value(&response).unwrap();

    assert!(value["path"][0]["lat"].is_number());
    assert!(value["path"][0]["lng"].is_number());
    assert!(value["distance"].is_number());
    assert!(value["duration"].is_number());
    assert!(value["metrics"]["total_weight"].is_number());
    assert!(value["metrics"]["graph_stats"]["nodes"].is_number());
    assert!(value["debug"]["source_node"].is_number());
}

#[test]
fn endpoints_snapping_to_the_same_node_still_route() {
    let (router, _) = router_with(vec![way(RoadClass::Residential, &[(0.0, 0.0), (0.01, 0.0)])]);

    let response = router
        .calculate_route(&request((0.00015, 0.0), (-0.00015, 0.0)))
        .unwrap();

    assert_eq!(response.path.len(), 2);
    assert_eq!(response.metrics.node_count, 1);
    assert_eq!(response.duration, 0);
    assert!((response.distance - 0.033).abs() < 0.001);
}
