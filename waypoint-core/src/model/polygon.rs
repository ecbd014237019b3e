//! Room, area and structural outlines

use serde::{Deserialize, Serialize};

use super::Tags;
use crate::geometry::{BoundingBox, point_in_ring, ring_to_polygon};
use crate::{Level, PolygonId};

/// Polygon on a single floor
///
/// Multi-floor spans are expanded into one instance per floor; the
/// instances share `id`, `vertices` and `tags` and differ only in `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: PolygonId,
    pub graph: String,
    pub level: Level,
    /// Outline as `(lat, lon)` pairs
    pub vertices: Vec<(f64, f64)>,
    /// Most north-easterly corner of the bounding box, `(lat, lon)`
    #[serde(rename = "NE")]
    pub ne: (f64, f64),
    /// Most south-westerly corner of the bounding box, `(lat, lon)`
    #[serde(rename = "SW")]
    pub sw: (f64, f64),
    #[serde(default)]
    pub tags: Tags,
}

impl Polygon {
    /// Builds a polygon and its bounding box. Returns `None` for an empty ring.
    pub fn new(
        id: PolygonId,
        graph: impl Into<String>,
        level: Level,
        vertices: Vec<(f64, f64)>,
        tags: Tags,
    ) -> Option<Self> {
        let bbox = BoundingBox::from_vertices(&vertices)?;
        Some(Self {
            id,
            graph: graph.into(),
            level,
            vertices,
            ne: bbox.ne,
            sw: bbox.sw,
            tags,
        })
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            ne: self.ne,
            sw: self.sw,
        }
    }

    /// Exact containment test, boundary points are outside.
    ///
    /// Builds the ring on every call; bulk lookups go through
    /// [`PolygonCatalog`](crate::loading::PolygonCatalog).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.bounding_box().contains(lat, lon)
            && point_in_ring(&ring_to_polygon(&self.vertices), lat, lon)
    }

    pub fn name(&self) -> Option<String> {
        self.tags.room_name()
    }

    pub fn number(&self) -> Option<String> {
        self.tags.room_number()
    }

    pub fn is_room(&self) -> bool {
        self.tags.is_room()
    }

    pub fn is_stairs(&self) -> bool {
        self.tags.is_stairs()
    }

    pub fn is_elevator(&self) -> bool {
        self.tags.is_elevator()
    }
}
