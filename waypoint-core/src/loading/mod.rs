//! This module is responsible for turning building-survey GeoJSON
//! (polygons, corridor lines and points of interest) into an indoor
//! routing graph.

mod builder;
mod config;
mod features;
mod pois;
mod polygons;
mod vertical;
mod ways;

pub use builder::{create_indoor_map, parse_map, parse_map_str};
pub use config::MapConfig;
pub use features::{LevelSpec, parse_feature_collection};
pub use pois::match_pois;
pub use polygons::PolygonCatalog;
pub use vertical::connect_stairways;
pub use ways::WayGraphBuilder;
