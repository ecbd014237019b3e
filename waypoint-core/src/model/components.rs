//! Graph components - path nodes, points of interest and edges

use geo::Point;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::Tags;
use crate::{Edge, Level, NodeId, PoiId, PolygonId};

/// Routing graph vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    /// Dense id, assigned in creation order
    pub id: NodeId,
    /// Building or map the node belongs to
    pub graph: String,
    pub level: Level,
    pub lat: f64,
    pub lon: f64,
    /// Enclosing polygon, serialized as `-1` when the node is outside every room
    #[serde(with = "poly_id_sentinel", default)]
    pub poly_id: Option<PolygonId>,
    #[serde(default)]
    pub tags: Tags,
}

impl PathNode {
    pub fn new(
        id: NodeId,
        graph: impl Into<String>,
        level: Level,
        lat: f64,
        lon: f64,
        tags: Tags,
    ) -> Self {
        Self {
            id,
            graph: graph.into(),
            level,
            lat,
            lon,
            poly_id: None,
            tags,
        }
    }

    #[must_use]
    pub fn with_polygon(mut self, poly_id: PolygonId) -> Self {
        self.poly_id = Some(poly_id);
        self
    }

    /// Node coordinates (x = lon, y = lat)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn is_way_node(&self) -> bool {
        self.tags.is_way()
    }

    /// `poly_id` in the form storage backends expect
    pub fn poly_id_or_sentinel(&self) -> i64 {
        self.poly_id
            .and_then(|id| i64::try_from(id).ok())
            .unwrap_or(crate::NO_POLYGON)
    }
}

/// Point of interest snapped to the routing graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoI {
    pub id: PoiId,
    pub graph: String,
    pub level: Level,
    pub lat: f64,
    pub lon: f64,
    /// Closest path node in the same room, if the point lies in one
    pub nearest_path_node: Option<NodeId>,
    #[serde(default)]
    pub tags: Tags,
}

impl PoI {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Removes self-loops and repeated undirected edges, keeping the first
/// occurrence of each connection in its original orientation.
pub fn dedup_edges<I: IntoIterator<Item = Edge>>(edges: I) -> Vec<Edge> {
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|&(a, b)| a != b && seen.insert((a.min(b), a.max(b))))
        .collect()
}

mod poly_id_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::{NO_POLYGON, PolygonId};

    pub(super) fn serialize<S: Serializer>(
        poly_id: &Option<PolygonId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match poly_id {
            Some(id) => serializer.serialize_u64(*id as u64),
            None => serializer.serialize_i64(NO_POLYGON),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PolygonId>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.and_then(|id| PolygonId::try_from(id).ok()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dedup_drops_reverse_duplicates_and_loops() {
        let edges = dedup_edges([(0, 1), (1, 0), (1, 2), (2, 2), (0, 1), (2, 1), (3, 0)]);
        assert_eq!(edges, vec![(0, 1), (1, 2), (3, 0)]);
    }

    #[test]
    fn missing_polygon_uses_sentinel() {
        let node = PathNode::new(3, "test", 0.0, 53.8, -1.5, Tags::new());
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["poly_id"], json!(-1));
        assert_eq!(node.poly_id_or_sentinel(), -1);

        let back: PathNode = serde_json::from_value(value).unwrap();
        assert_eq!(back.poly_id, None);
    }

    #[test]
    fn polygon_id_round_trips() {
        let node = PathNode::new(0, "test", 1.0, 53.8, -1.5, Tags::new()).with_polygon(7);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["poly_id"], json!(7));

        let back: PathNode = serde_json::from_value(value).unwrap();
        assert_eq!(back.poly_id, Some(7));
    }
}
