//! Inter-floor connectivity for stairwells and elevator shafts

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info};

use super::PolygonCatalog;
use crate::model::{PathNode, Polygon, dedup_edges};
use crate::{Edge, PolygonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shaft {
    /// Connects adjacent floors only
    Stairs,
    /// Connects every floor the shaft spans
    Elevator,
}

impl Shaft {
    fn of(polygon: &Polygon) -> Option<Self> {
        if polygon.is_stairs() {
            Some(Shaft::Stairs)
        } else if polygon.is_elevator() {
            Some(Shaft::Elevator)
        } else {
            None
        }
    }
}

/// Edges joining way-nodes that share a stairwell or elevator polygon.
///
/// Stair nodes link to nodes on the next level up or down (by position in
/// the sorted level list, so half-floors count as floors); elevator nodes
/// link to every other node of the shaft. The result is deduplicated.
pub fn connect_stairways(nodes: &[PathNode], catalog: &PolygonCatalog) -> Vec<Edge> {
    let levels = catalog.levels().merged(nodes.iter().map(|node| node.level));

    // Way-nodes grouped per room, rooms and nodes in id order
    let mut rooms: BTreeMap<PolygonId, Vec<&PathNode>> = BTreeMap::new();
    for node in nodes.iter().filter(|node| node.is_way_node()) {
        if let Some(poly_id) = node.poly_id {
            rooms.entry(poly_id).or_default().push(node);
        }
    }

    let mut edges = Vec::new();
    for (poly_id, room_nodes) in &rooms {
        let Some(shaft) = catalog.polygon(*poly_id).and_then(Shaft::of) else {
            continue;
        };
        let before = edges.len();

        let pairs = room_nodes.iter().tuple_combinations::<(_, _)>();
        match shaft {
            Shaft::Stairs => edges.extend(
                pairs
                    .filter(|(u, v)| levels.are_adjacent(u.level, v.level))
                    .map(|(u, v)| (u.id, v.id)),
            ),
            Shaft::Elevator => edges.extend(pairs.map(|(u, v)| (u.id, v.id))),
        }

        debug!(
            "{shaft:?} polygon {poly_id}: {} nodes, {} edges",
            room_nodes.len(),
            edges.len() - before
        );
    }

    let edges = dedup_edges(edges);
    info!("Connected {} vertical edges", edges.len());
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tags;

    fn shaft(tags: Tags, levels: &[f64]) -> PolygonCatalog {
        let ring = vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];
        let polygons = levels
            .iter()
            .filter_map(|&level| Polygon::new(0, "test", level, ring.clone(), tags.clone()))
            .collect();
        PolygonCatalog::from_polygons("test", polygons)
    }

    fn way_node(id: usize, level: f64) -> PathNode {
        PathNode::new(id, "test", level, 0.5, 0.5, Tags::from([("indoor", "way")])).with_polygon(0)
    }

    fn connected(edges: &[Edge], a: usize, b: usize) -> bool {
        edges.contains(&(a, b)) || edges.contains(&(b, a))
    }

    #[test]
    fn stairs_connect_adjacent_levels_only() {
        let catalog = shaft(Tags::from([("stairs", "yes")]), &[0.0, 0.5, 1.0, 2.0]);
        let nodes = vec![way_node(0, 0.0), way_node(1, 0.5), way_node(2, 1.0), way_node(3, 2.0)];
        let edges = connect_stairways(&nodes, &catalog);

        assert!(connected(&edges, 1, 0));
        assert!(connected(&edges, 1, 2));
        assert!(!connected(&edges, 1, 3));
        assert!(connected(&edges, 2, 3));
        assert!(!connected(&edges, 0, 2));
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn elevators_connect_every_level() {
        let catalog = shaft(Tags::from([("highway", "elevator")]), &[0.0, 1.0, 2.0]);
        let nodes = vec![way_node(0, 0.0), way_node(1, 1.0), way_node(2, 2.0)];
        let edges = connect_stairways(&nodes, &catalog);

        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert!(connected(&edges, a, b), "missing {a}-{b}");
        }
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn ordinary_rooms_and_wall_nodes_get_nothing() {
        let catalog = shaft(Tags::from([("indoor", "room")]), &[0.0, 1.0]);
        let nodes = vec![way_node(0, 0.0), way_node(1, 1.0)];
        assert!(connect_stairways(&nodes, &catalog).is_empty());

        let catalog = shaft(Tags::from([("stairs", "yes")]), &[0.0, 1.0]);
        let mut wall = way_node(1, 1.0);
        wall.tags = Tags::from([("indoor", "wall")]);
        let nodes = vec![way_node(0, 0.0), wall];
        assert!(connect_stairways(&nodes, &catalog).is_empty());
    }

    #[test]
    fn null_stairs_tag_is_ignored() {
        let catalog = shaft(Tags::from([("stairs", crate::model::TagValue::Null)]), &[0.0, 1.0]);
        let nodes = vec![way_node(0, 0.0), way_node(1, 1.0)];
        assert!(connect_stairways(&nodes, &catalog).is_empty());
    }
}
