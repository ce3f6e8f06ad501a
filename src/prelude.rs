// Re-export key components
pub use crate::error::Error;
pub use crate::geometry::{distance_km, BoundingBox};
pub use crate::loading::{build_road_graph, OverpassSource, RoadDataSource, RouterConfig};
pub use crate::router::{
    Coordinate, GraphStats, RouteDebug, RouteMetrics, RouteRequest, RouteResponse, Router,
};
pub use crate::routing::{shortest_path, RoutePath};

// Core types for the road network
pub use crate::model::{RoadClass, RoadEdge, RoadGraph, RoadNode, Way};

// Core tuning constants
pub use crate::{BBOX_PADDING_DEG, INTERSECTION_TOLERANCE_KM, MIN_ROUTE_DISTANCE_KM};
