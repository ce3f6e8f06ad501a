//! Road network components - ways, nodes and edges

use geo::Point;

use crate::model::RoadClass;

/// An input road polyline from the data provider.
///
/// Geometry is ordered and carries at least two points once it reaches the
/// graph builder; shorter ways are discarded during fetching.
#[derive(Debug, Clone)]
pub struct Way {
    /// Ordered geometry, `(x, y) = (lng, lat)` in degrees
    pub geometry: Vec<Point<f64>>,
    /// Road class from the `highway` tag
    pub class: RoadClass,
    /// Optional display name from the `name` tag
    pub name: Option<String>,
}

/// Road graph node, an intersection after near-coincident vertices have been
/// merged.
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Road graph edge (directed road segment)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    /// Great-circle length of the segment in kilometers
    pub distance_km: f64,
    /// Road class shared by both directions of the segment
    pub road_class: RoadClass,
    /// Search weight, `distance_km * class multiplier`
    pub weight: f64,
    /// Optional display name of the owning way
    pub name: Option<String>,
}
