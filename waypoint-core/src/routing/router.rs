use hashbrown::{HashMap, HashSet};
use log::{debug, warn};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::instructions::{Instruction, generate_instructions};
use super::{Route, RoutingError};
use crate::geometry::haversine_distance;
use crate::model::{PathNode, Polygon};
use crate::{Edge, NodeId, PolygonId, ROOM_PENALTY};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Added to the cost of every step that starts or ends inside a room
    pub room_penalty: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            room_penalty: ROOM_PENALTY,
        }
    }
}

/// A* router over path nodes.
///
/// Step cost between neighbours is the great-circle distance in metres plus
/// the room penalty when either node lies in a polygon tagged
/// `indoor=room`. The same function estimates the remaining cost to the
/// goal, so with a non-zero penalty the estimate can overshoot and the
/// returned path is not guaranteed to be the cheapest one.
#[derive(Debug, Clone)]
pub struct Router {
    graph: UnGraph<PathNode, ()>,
    node_map: HashMap<NodeId, NodeIndex>,
    rooms: HashSet<PolygonId>,
    config: RouterConfig,
}

impl Router {
    pub fn new(nodes: &[PathNode], edges: &[Edge], polygons: &[Polygon]) -> Self {
        Self::with_config(nodes, edges, polygons, RouterConfig::default())
    }

    pub fn with_config(
        nodes: &[PathNode],
        edges: &[Edge],
        polygons: &[Polygon],
        config: RouterConfig,
    ) -> Self {
        let mut graph = UnGraph::with_capacity(nodes.len(), edges.len());
        let mut node_map = HashMap::with_capacity(nodes.len());

        for node in nodes {
            node_map
                .entry(node.id)
                .or_insert_with(|| graph.add_node(node.clone()));
        }

        let mut skipped = 0;
        for &(a, b) in edges {
            match (node_map.get(&a), node_map.get(&b)) {
                (Some(&u), Some(&v)) if u != v => {
                    graph.update_edge(u, v, ());
                }
                (Some(_), Some(_)) => {}
                _ => {
                    warn!("Skipping edge ({a}, {b}) with an unknown endpoint");
                    skipped += 1;
                }
            }
        }

        let rooms = polygons
            .iter()
            .filter(|polygon| polygon.is_room())
            .map(|polygon| polygon.id)
            .collect();

        debug!(
            "Router graph: {} nodes, {} edges, {skipped} edges skipped",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            node_map,
            rooms,
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn node(&self, id: NodeId) -> Option<&PathNode> {
        self.node_map.get(&id).map(|&index| &self.graph[index])
    }

    /// Step cost and goal estimate between two nodes
    pub fn heuristic(&self, n: &PathNode, m: &PathNode) -> f64 {
        let distance = haversine_distance(n.point(), m.point());
        if self.in_room(n) || self.in_room(m) {
            distance + self.config.room_penalty
        } else {
            distance
        }
    }

    /// Node ids from `start` to `end`, both included
    pub fn find_path(&self, start: NodeId, end: NodeId) -> Result<Vec<NodeId>, RoutingError> {
        let source = self.index(start)?;
        let target = self.index(end)?;
        let goal = &self.graph[target];

        let (_, path) = astar(
            &self.graph,
            source,
            |index| index == target,
            |edge| self.heuristic(&self.graph[edge.source()], &self.graph[edge.target()]),
            |index| self.heuristic(&self.graph[index], goal),
        )
        .ok_or(RoutingError::PathNotFound { start, end })?;

        Ok(path.into_iter().map(|index| self.graph[index].id).collect())
    }

    pub fn get_path_nodes(&self, path: &[NodeId]) -> Result<Vec<PathNode>, RoutingError> {
        path.iter()
            .map(|&id| self.node(id).cloned().ok_or(RoutingError::UnknownNode(id)))
            .collect()
    }

    pub fn generate_instructions(&self, path: &[NodeId]) -> Result<Vec<Instruction>, RoutingError> {
        Ok(generate_instructions(&self.get_path_nodes(path)?))
    }

    /// Path, instructions and summary between two nodes
    pub fn route(&self, start: NodeId, end: NodeId) -> Result<Route, RoutingError> {
        let ids = self.find_path(start, end)?;
        let nodes = self.get_path_nodes(&ids)?;
        Ok(Route::new(ids, nodes))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index(&self, id: NodeId) -> Result<NodeIndex, RoutingError> {
        self.node_map
            .get(&id)
            .copied()
            .ok_or(RoutingError::UnknownNode(id))
    }

    fn in_room(&self, node: &PathNode) -> bool {
        node.poly_id.is_some_and(|id| self.rooms.contains(&id))
    }
}
