pub use crate::ROOM_PENALTY;

// Re-export key components
pub use crate::loading::{
    MapConfig, PolygonCatalog, WayGraphBuilder, connect_stairways, create_indoor_map, match_pois,
    parse_map, parse_map_str,
};
pub use crate::model::{IndoorMap, LevelIndex, PathNode, PoI, Polygon, TagValue, Tags, dedup_edges};
pub use crate::routing::{
    Instruction, Route, Router, RouterConfig, RoutingError, generate_instructions,
};

// Core identifier types
pub use crate::Edge;
pub use crate::Level;
pub use crate::NodeId;
pub use crate::PoiId;
pub use crate::PolygonId;
