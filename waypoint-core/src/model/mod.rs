//! Data model for indoor routing
//!
//! Contains the path nodes, polygons and points of interest produced by the
//! loading pipeline and the combined map they make up.

pub mod components;
pub mod indoor_map;
pub mod levels;
pub mod polygon;
pub mod tags;

pub use components::{PathNode, PoI, dedup_edges};
pub use indoor_map::IndoorMap;
pub use levels::{LevelIndex, level_key};
pub use polygon::Polygon;
pub use tags::{TagValue, Tags};
