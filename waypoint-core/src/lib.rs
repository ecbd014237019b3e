//! Indoor routing over building-survey geometry.
//!
//! The crate turns three GeoJSON layers (room polygons, corridor lines and
//! points of interest) into a multi-floor routing graph and finds walking
//! routes through it with turn-by-turn instructions.

pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{MapConfig, PolygonCatalog, create_indoor_map, parse_map, parse_map_str};
pub use model::{IndoorMap, LevelIndex, PathNode, PoI, Polygon, TagValue, Tags};
pub use routing::{Instruction, Route, Router, RouterConfig, RoutingError};

/// Identifier of a path node, dense within one graph
pub type NodeId = usize;
/// Identifier of a polygon, shared by every per-floor instance of a span
pub type PolygonId = usize;
/// Identifier of a point of interest
pub type PoiId = usize;
/// Floor indicator, half-levels such as mezzanines are allowed
pub type Level = f64;
/// Undirected connection between two path nodes
pub type Edge = (NodeId, NodeId);

/// Value stored for `poly_id` when a node is not inside any polygon
pub const NO_POLYGON: i64 = -1;
/// Default additive cost for entering or leaving a room
pub const ROOM_PENALTY: f64 = 10_000.0;
