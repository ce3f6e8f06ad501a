//! Data model for the routable road network
//!
//! Contains types and structures for representing fetched ways and the
//! weighted graph built from them.

// Re-export of main modules
pub mod road_class;
pub mod roads;

// Re-export of basic types for convenience
pub use road_class::RoadClass;
pub use roads::network::RoadGraph;
pub use roads::{RoadEdge, RoadNode, Way};
