//! This module is responsible for fetching road data from the upstream
//! provider and building the routable graph from it.

mod builder;
mod config;
pub mod overpass;

pub use builder::build_road_graph;
pub use config::RouterConfig;
pub use overpass::{OverpassSource, RoadDataSource};
