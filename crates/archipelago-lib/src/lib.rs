//! Archipelago routing library entry points.
//!
//! This crate models an island archipelago served by seaplanes:
//! islands, the ports located on them, and the weighted routes
//! between ports. On top of the graph store it answers two questions:
//! the shortest path between two ports, and an efficient order to
//! visit a set of ports together with its distance, time, and fuel
//! cost. Higher-level consumers (CLI, API handlers) should only
//! depend on the functions exported here instead of reimplementing
//! behavior.

#![deny(warnings)]

pub mod cost;
pub mod error;
pub mod geo;
pub mod graph;
pub mod itinerary;
pub mod path;
pub mod routing;
pub mod store;

pub use cost::CostModel;
pub use error::{Error, Result};
pub use geo::{haversine_km, Coordinates};
pub use graph::{Edge, PortGraph};
pub use itinerary::{Itinerary, PlannerConfig, Segment};
pub use path::{find_route_dijkstra, SearchGuard, ShortestPath};
pub use routing::{plan_itinerary, shortest_path, ItineraryRequest, PathRequest};
pub use store::{GraphStore, Island, NewPort, Port, PortId, RouteCreated, SqliteStore};
