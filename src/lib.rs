//! On-demand driving-route engine over live OpenStreetMap road data.
//!
//! Given a source and destination coordinate, `viaroute` fetches the road
//! network inside a bounding box around the endpoints from an Overpass-style
//! provider, materializes an in-memory routable graph, and answers with a
//! road-following polyline, a total distance and a travel-time estimate.
//! Built graphs are cached per area so repeated requests in the same region
//! skip the fetch-and-build step.
//!
//! The top-level entry point is [`Router::calculate_route`].

pub mod cache;
pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod router;
pub mod routing;

pub use error::Error;
pub use router::{Coordinate, RouteRequest, RouteResponse, Router};

/// Distance below which two raw way coordinates are considered the same
/// intersection, in kilometers.
pub const INTERSECTION_TOLERANCE_KM: f64 = 0.001;

/// Padding applied to each side of a request's bounding box before querying
/// the road-data provider, in degrees.
pub const BBOX_PADDING_DEG: f64 = 0.01;

/// Minimum great-circle distance between endpoints for a route request to be
/// meaningful, in kilometers.
pub const MIN_ROUTE_DISTANCE_KM: f64 = 0.01;
