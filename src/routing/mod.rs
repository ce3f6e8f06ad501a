//! Shortest-path search over the road graph and route shaping.

pub mod dijkstra;
pub mod route;

pub use route::{shortest_path, RoutePath};
