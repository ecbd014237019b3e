//! Combined output of the loading pipeline

use crate::geometry::NodeSpatialIndex;
use crate::loading::PolygonCatalog;
use crate::routing::{Router, RouterConfig};
use crate::{Edge, Level, NodeId, PoiId};

use super::{LevelIndex, PathNode, PoI, Polygon};

/// Routing graph of one building together with its rooms and points of
/// interest
#[derive(Debug, Clone)]
pub struct IndoorMap {
    /// Graph name, usually the building identifier
    pub graph: String,
    /// Path nodes indexed by id
    pub nodes: Vec<PathNode>,
    /// Corridor edges followed by stair and elevator edges
    pub edges: Vec<Edge>,
    pub catalog: PolygonCatalog,
    /// Points of interest indexed by id
    pub pois: Vec<PoI>,
    node_index: NodeSpatialIndex,
    levels: LevelIndex,
}

impl IndoorMap {
    pub fn new(
        graph: impl Into<String>,
        nodes: Vec<PathNode>,
        edges: Vec<Edge>,
        catalog: PolygonCatalog,
        pois: Vec<PoI>,
    ) -> Self {
        let node_index = NodeSpatialIndex::new(nodes.iter().filter(|node| node.is_way_node()));
        let levels = catalog.levels().merged(nodes.iter().map(|node| node.level));
        Self {
            graph: graph.into(),
            nodes,
            edges,
            catalog,
            pois,
            node_index,
            levels,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&PathNode> {
        self.nodes.get(id)
    }

    pub fn poi(&self, id: PoiId) -> Option<&PoI> {
        self.pois.get(id)
    }

    pub fn polygons(&self) -> &[Polygon] {
        self.catalog.polygons()
    }

    /// Every level that has a polygon or a path node
    pub fn levels(&self) -> &LevelIndex {
        &self.levels
    }

    /// Closest way-node on `level`
    pub fn nearest_node(&self, lat: f64, lon: f64, level: Level) -> Option<&PathNode> {
        self.node_index
            .nearest(lat, lon, level)
            .and_then(|id| self.node(id))
    }

    /// Rooms whose name or number contains `query`, ignoring case
    pub fn search_polygons(&self, query: &str) -> Vec<&Polygon> {
        self.catalog.search(query)
    }

    pub fn router(&self) -> Router {
        self.router_with(RouterConfig::default())
    }

    pub fn router_with(&self, config: RouterConfig) -> Router {
        Router::with_config(&self.nodes, &self.edges, self.catalog.polygons(), config)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }

    /// Short human-readable description used in logs
    pub fn summary(&self) -> String {
        format!(
            "{}: {} nodes, {} edges, {} polygons, {} points of interest on {} levels",
            self.graph,
            self.node_count(),
            self.edge_count(),
            self.polygon_count(),
            self.poi_count(),
            self.levels.len()
        )
    }
}
