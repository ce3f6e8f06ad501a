//! Road network model

pub mod components;
pub mod network;

pub use components::{RoadEdge, RoadNode, Way};
pub use network::RoadGraph;
