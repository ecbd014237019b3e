//! R-tree indices over polygon envelopes and way-node positions
//!
//! Both indices keep one tree per level, so queries never see geometry from
//! another floor.

use hashbrown::HashMap;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};

use crate::model::{PathNode, Polygon, level_key};
use crate::{Level, NodeId};

type PolygonEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;
type NodePosition = GeomWithData<[f64; 2], NodeId>;

/// Bounding-box index over polygons, keyed by position in the source slice
#[derive(Debug, Clone, Default)]
pub struct PolygonSpatialIndex {
    trees: HashMap<u64, RTree<PolygonEnvelope>>,
}

impl PolygonSpatialIndex {
    pub fn new(polygons: &[Polygon]) -> Self {
        let mut per_level: HashMap<u64, Vec<PolygonEnvelope>> = HashMap::new();
        for (idx, polygon) in polygons.iter().enumerate() {
            let (lower, upper) = polygon.bounding_box().corners();
            per_level
                .entry(level_key(polygon.level))
                .or_default()
                .push(GeomWithData::new(Rectangle::from_corners(lower, upper), idx));
        }

        let trees = per_level
            .into_iter()
            .map(|(level, items)| (level, RTree::bulk_load(items)))
            .collect();
        Self { trees }
    }

    /// Positions of polygons on `level` whose bounding box contains the
    /// point, in ascending (input) order.
    pub fn candidates(&self, lat: f64, lon: f64, level: Level) -> Vec<usize> {
        let Some(tree) = self.trees.get(&level_key(level)) else {
            return Vec::new();
        };
        let mut hits: Vec<usize> = tree
            .locate_all_at_point(&[lon, lat])
            .map(|envelope| envelope.data)
            .collect();
        hits.sort_unstable();
        hits
    }
}

/// Nearest-node index over way-nodes
#[derive(Debug, Clone, Default)]
pub struct NodeSpatialIndex {
    trees: HashMap<u64, RTree<NodePosition>>,
}

impl NodeSpatialIndex {
    pub fn new<'a, I: IntoIterator<Item = &'a PathNode>>(nodes: I) -> Self {
        let mut per_level: HashMap<u64, Vec<NodePosition>> = HashMap::new();
        for node in nodes {
            per_level
                .entry(level_key(node.level))
                .or_default()
                .push(GeomWithData::new([node.lon, node.lat], node.id));
        }

        let trees = per_level
            .into_iter()
            .map(|(level, items)| (level, RTree::bulk_load(items)))
            .collect();
        Self { trees }
    }

    /// Closest indexed node on `level`, by planar distance in degrees
    pub fn nearest(&self, lat: f64, lon: f64, level: Level) -> Option<NodeId> {
        self.trees
            .get(&level_key(level))?
            .nearest_neighbor(&[lon, lat])
            .map(|position| position.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tags;

    fn square(id: usize, level: Level, origin: f64) -> Polygon {
        let ring = vec![
            (origin, origin),
            (origin, origin + 1.0),
            (origin + 1.0, origin + 1.0),
            (origin + 1.0, origin),
        ];
        Polygon::new(id, "test", level, ring, Tags::new()).unwrap()
    }

    #[test]
    fn candidates_are_filtered_by_level_and_box() {
        let polygons = vec![square(0, 0.0, 0.0), square(1, 1.0, 0.0), square(2, 0.0, 5.0)];
        let index = PolygonSpatialIndex::new(&polygons);

        assert_eq!(index.candidates(0.5, 0.5, 0.0), vec![0]);
        assert_eq!(index.candidates(0.5, 0.5, 1.0), vec![1]);
        assert_eq!(index.candidates(5.5, 5.5, 0.0), vec![2]);
        assert!(index.candidates(3.0, 3.0, 0.0).is_empty());
        assert!(index.candidates(0.5, 0.5, 2.0).is_empty());
    }

    #[test]
    fn overlapping_candidates_keep_input_order() {
        let polygons = vec![square(0, 0.0, 0.0), square(1, 0.0, 0.5), square(2, 0.0, 0.25)];
        let index = PolygonSpatialIndex::new(&polygons);
        assert_eq!(index.candidates(0.75, 0.75, 0.0), vec![0, 1, 2]);
    }

    #[test]
    fn nearest_node_stays_on_level() {
        let nodes = vec![
            PathNode::new(0, "test", 0.0, 0.0, 0.0, Tags::new()),
            PathNode::new(1, "test", 0.0, 1.0, 1.0, Tags::new()),
            PathNode::new(2, "test", 1.0, 0.9, 0.9, Tags::new()),
        ];
        let index = NodeSpatialIndex::new(&nodes);

        assert_eq!(index.nearest(0.8, 0.8, 0.0), Some(1));
        assert_eq!(index.nearest(0.1, 0.1, 1.0), Some(2));
        assert_eq!(index.nearest(0.1, 0.1, 3.0), None);
    }
}
