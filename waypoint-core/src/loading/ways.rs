//! Way graph builder: corridor polylines to deduplicated nodes and edges

use geo::{Geometry, LineString};
use geojson::Feature;
use hashbrown::{HashMap, hash_map::Entry};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::PolygonCatalog;
use super::features::{feature_geometry, feature_level, feature_properties};
use crate::model::{PathNode, Tags, level_key};
use crate::{Edge, Error, Level, NodeId};

/// `(lat, lon, level)` bit patterns
type CoordKey = (u64, u64, u64);

fn coord_key(lat: f64, lon: f64, level: Level) -> CoordKey {
    ((lat + 0.0).to_bits(), (lon + 0.0).to_bits(), level_key(level))
}

/// Builds path nodes and edges from line features of one graph.
///
/// Coincident coordinates on the same level collapse into one node, which
/// is how separate polylines meeting at a junction get connected.
#[derive(Debug)]
pub struct WayGraphBuilder {
    graph: String,
    nodes: Vec<PathNode>,
    edges: Vec<Edge>,
    node_lookup: HashMap<CoordKey, NodeId>,
}

impl WayGraphBuilder {
    pub fn new(graph: impl Into<String>) -> Self {
        Self {
            graph: graph.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            node_lookup: HashMap::new(),
        }
    }

    /// Parses every line feature, then assigns rooms to the nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature with geometry has no properties, no
    /// `level`, or an unreadable level.
    pub fn parse(
        mut self,
        features: &[Feature],
        catalog: &PolygonCatalog,
    ) -> Result<(Vec<PathNode>, Vec<Edge>), Error> {
        for (idx, feature) in features.iter().enumerate() {
            self.add_feature(idx, feature)?;
        }
        self.assign_rooms(catalog);

        info!(
            "Built way graph with {} nodes and {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(self.finish())
    }

    /// Adds a single LineString or MultiLineString feature.
    pub fn add_feature(&mut self, idx: usize, feature: &Feature) -> Result<(), Error> {
        let Some(geometry) = feature_geometry(feature)? else {
            debug!("Skipping way feature {idx} without geometry");
            return Ok(());
        };
        let properties = feature_properties(idx, feature)?;
        let level = feature_level(idx, properties)?.literal()?;
        let tags = Tags::from_properties(properties);

        match geometry {
            Geometry::LineString(line) => self.add_polyline(&line, level, &tags),
            Geometry::MultiLineString(lines) => {
                for line in &lines {
                    self.add_polyline(line, level, &tags);
                }
            }
            _ => warn!("Skipping way feature {idx}: geometry is not a line"),
        }
        Ok(())
    }

    /// Adds the nodes of one polyline and an edge between each consecutive
    /// pair of distinct nodes.
    pub fn add_polyline(&mut self, line: &LineString<f64>, level: Level, tags: &Tags) {
        let ids: Vec<NodeId> = line
            .coords()
            .map(|coord| self.node_id(coord.y, coord.x, level, tags))
            .collect();

        self.edges
            .extend(ids.into_iter().dedup().tuple_windows::<(_, _)>());
    }

    fn node_id(&mut self, lat: f64, lon: f64, level: Level, tags: &Tags) -> NodeId {
        match self.node_lookup.entry(coord_key(lat, lon, level)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.nodes.len();
                self.nodes.push(PathNode::new(
                    id,
                    self.graph.as_str(),
                    level,
                    lat,
                    lon,
                    tags.clone(),
                ));
                *entry.insert(id)
            }
        }
    }

    /// Sets `poly_id` on every node from the enclosing polygon on its level.
    pub fn assign_rooms(&mut self, catalog: &PolygonCatalog) {
        self.nodes.par_iter_mut().for_each(|node| {
            node.poly_id = catalog
                .containing_polygon(node.lat, node.lon, node.level)
                .map(|polygon| polygon.id);
        });

        let outside = self.nodes.iter().filter(|node| node.poly_id.is_none()).count();
        trace!("{outside} of {} nodes are outside every polygon", self.nodes.len());
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn finish(self) -> (Vec<PathNode>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::parse_feature_collection;

    fn parse(lines: &str, polygons: &str) -> (Vec<PathNode>, Vec<Edge>) {
        let lines = parse_feature_collection(lines).unwrap();
        let polygons = parse_feature_collection(polygons).unwrap();
        let catalog = PolygonCatalog::load("test", &polygons.features).unwrap();
        WayGraphBuilder::new("test")
            .parse(&lines.features, &catalog)
            .unwrap()
    }

    const NO_POLYGONS: &str = r#"{"type": "FeatureCollection", "features": []}"#;

    #[test]
    fn shared_coordinates_collapse_into_one_node() {
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0, "indoor": "way"},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]}},
            {"type": "Feature", "properties": {"level": 0, "indoor": "way"},
             "geometry": {"type": "LineString", "coordinates": [[1.0, 0.0], [1.0, 1.0]]}}
        ]}"#;
        let (nodes, edges) = parse(lines, NO_POLYGONS);

        assert_eq!(nodes.len(), 4);
        assert_eq!(edges, vec![(0, 1), (1, 2), (1, 3)]);
        assert_eq!((nodes[1].lat, nodes[1].lon), (0.0, 1.0));
        assert!(nodes.iter().enumerate().all(|(idx, node)| node.id == idx));
    }

    #[test]
    fn same_point_on_other_level_is_a_new_node() {
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}},
            {"type": "Feature", "properties": {"level": 1},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}}
        ]}"#;
        let (nodes, edges) = parse(lines, NO_POLYGONS);

        assert_eq!(nodes.len(), 4);
        assert_eq!(edges, vec![(0, 1), (2, 3)]);
        assert_eq!(nodes[2].level, 1.0);
    }

    #[test]
    fn skips_null_geometry_and_keeps_single_points() {
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0}, "geometry": null},
            {"type": "Feature", "properties": {"level": 0},
             "geometry": {"type": "LineString", "coordinates": [[5.0, 5.0], [5.0, 5.0]]}}
        ]}"#;
        let (nodes, edges) = parse(lines, NO_POLYGONS);

        assert_eq!(nodes.len(), 1);
        assert!(edges.is_empty());
    }

    #[test]
    fn multilinestring_parts_share_nodes() {
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0, "indoor": "way"},
             "geometry": {"type": "MultiLineString", "coordinates": [
                [[0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [1.0, 1.0]]
             ]}}
        ]}"#;
        let (nodes, edges) = parse(lines, NO_POLYGONS);

        assert_eq!(nodes.len(), 3);
        assert_eq!(edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn nodes_are_tagged_with_rooms() {
        let polygons = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0, "indoor": "room"},
             "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]}}
        ]}"#;
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"level": 0, "indoor": "way"},
             "geometry": {"type": "LineString", "coordinates": [[1.0, 1.0], [3.0, 1.0]]}},
            {"type": "Feature", "properties": {"level": 1, "indoor": "way"},
             "geometry": {"type": "LineString", "coordinates": [[1.0, 1.0], [1.5, 1.5]]}}
        ]}"#;
        let (nodes, _) = parse(lines, polygons);

        assert_eq!(nodes[0].poly_id, Some(0));
        assert_eq!(nodes[1].poly_id, None);
        assert_eq!(nodes[2].poly_id, None);
        assert!(nodes[0].is_way_node());
    }

    #[test]
    fn missing_properties_is_an_error() {
        let lines = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": null,
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]}}
        ]}"#;
        let collection = parse_feature_collection(lines).unwrap();
        let catalog = PolygonCatalog::from_polygons("test", Vec::new());
        let result = WayGraphBuilder::new("test").parse(&collection.features, &catalog);
        assert!(matches!(result, Err(Error::MissingProperty { feature: 0, .. })));
    }
}
