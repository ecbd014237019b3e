//! Polygon catalog: rooms and areas per floor with fast containment lookups

use std::sync::Arc;

use geo::Geometry;
use geojson::Feature;
use hashbrown::HashMap;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::features::{LevelSpec, feature_geometry, feature_level, feature_properties};
use crate::geometry::{PolygonSpatialIndex, point_in_ring, ring_to_polygon};
use crate::model::{LevelIndex, Polygon, Tags};
use crate::{Error, Level, PolygonId};

/// Polygon feature decoded but not yet expanded over its floors
struct RawPolygon {
    level: LevelSpec,
    vertices: Vec<(f64, f64)>,
    tags: Tags,
}

/// All polygons of one building, one entry per floor instance
#[derive(Debug, Clone)]
pub struct PolygonCatalog {
    graph: String,
    polygons: Vec<Polygon>,
    /// `geo` rings parallel to `polygons`, shared between floors of a span
    shapes: Vec<Arc<geo::Polygon<f64>>>,
    levels: LevelIndex,
    index: PolygonSpatialIndex,
    /// Position of the first instance of each polygon id
    by_id: HashMap<PolygonId, usize>,
}

impl PolygonCatalog {
    /// Loads polygon features and expands multi-floor spans.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature has no properties, no `level`, or a
    /// level that cannot be read as a floor.
    pub fn load(graph: &str, features: &[Feature]) -> Result<Self, Error> {
        debug!("Decoding {} polygon features", features.len());

        let raw: Vec<RawPolygon> = features
            .par_iter()
            .enumerate()
            .map(|(idx, feature)| decode_polygon(idx, feature))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        // Spans are resolved against the floors that appear on their own
        let single_levels: LevelIndex = raw
            .iter()
            .filter_map(|polygon| match polygon.level {
                LevelSpec::Single(level) => Some(level),
                LevelSpec::Range(_) => None,
            })
            .collect();

        let mut polygons = Vec::new();
        let mut shapes = Vec::new();
        let mut next_id: PolygonId = 0;

        for raw in raw {
            let span = raw.level.resolve(&single_levels)?;
            let shape = Arc::new(ring_to_polygon(&raw.vertices));
            let id = next_id;
            next_id += 1;

            for level in span {
                let Some(polygon) =
                    Polygon::new(id, graph, level, raw.vertices.clone(), raw.tags.clone())
                else {
                    continue;
                };
                polygons.push(polygon);
                shapes.push(Arc::clone(&shape));
            }
        }

        let catalog = Self::from_parts(graph, polygons, shapes);
        info!(
            "Loaded {} polygons ({} floor instances) across {} levels",
            next_id,
            catalog.len(),
            catalog.levels.len()
        );
        Ok(catalog)
    }

    /// Catalog over polygons that were already expanded, e.g. read back
    /// from storage.
    pub fn from_polygons(graph: &str, polygons: Vec<Polygon>) -> Self {
        let mut rings: HashMap<PolygonId, Arc<geo::Polygon<f64>>> = HashMap::new();
        let shapes = polygons
            .iter()
            .map(|polygon| {
                Arc::clone(
                    rings
                        .entry(polygon.id)
                        .or_insert_with(|| Arc::new(ring_to_polygon(&polygon.vertices))),
                )
            })
            .collect();
        Self::from_parts(graph, polygons, shapes)
    }

    fn from_parts(graph: &str, polygons: Vec<Polygon>, shapes: Vec<Arc<geo::Polygon<f64>>>) -> Self {
        let levels = polygons.iter().map(|polygon| polygon.level).collect();
        let index = PolygonSpatialIndex::new(&polygons);

        let mut by_id = HashMap::with_capacity(polygons.len());
        for (position, polygon) in polygons.iter().enumerate() {
            by_id.entry(polygon.id).or_insert(position);
        }

        Self {
            graph: graph.to_string(),
            polygons,
            shapes,
            levels,
            index,
            by_id,
        }
    }

    /// First polygon on `level` that strictly encloses the point.
    ///
    /// Bounding boxes are checked first; overlapping polygons resolve to
    /// the earliest one in input order.
    pub fn containing_polygon(&self, lat: f64, lon: f64, level: Level) -> Option<&Polygon> {
        self.index
            .candidates(lat, lon, level)
            .into_iter()
            .find(|&position| point_in_ring(&self.shapes[position], lat, lon))
            .map(|position| &self.polygons[position])
    }

    /// Any instance of the polygon, tags and geometry are shared across floors
    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.by_id.get(&id).map(|&position| &self.polygons[position])
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Distinct levels of all polygon instances
    pub fn levels(&self) -> &LevelIndex {
        &self.levels
    }

    pub fn on_level(&self, level: Level) -> impl Iterator<Item = &Polygon> {
        self.polygons
            .iter()
            .filter(move |polygon| polygon.level == level)
    }

    /// Case-insensitive search over room names and numbers, one result per
    /// polygon id.
    pub fn search(&self, query: &str) -> Vec<&Polygon> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let hit = |label: Option<String>| {
            label.is_some_and(|label| label.to_lowercase().contains(&query))
        };

        let mut found: Vec<&Polygon> = self
            .by_id
            .values()
            .map(|&position| &self.polygons[position])
            .filter(|polygon| hit(polygon.name()) || hit(polygon.number()))
            .collect();
        found.sort_by_key(|polygon| polygon.id);
        found
    }

    pub fn graph(&self) -> &str {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

fn decode_polygon(idx: usize, feature: &Feature) -> Result<Option<RawPolygon>, Error> {
    let Some(geometry) = feature_geometry(feature)? else {
        debug!("Skipping polygon feature {idx} without geometry");
        return Ok(None);
    };
    let properties = feature_properties(idx, feature)?;
    let level = feature_level(idx, properties)?;

    let exterior = match geometry {
        Geometry::Polygon(polygon) => polygon.into_inner().0,
        Geometry::MultiPolygon(multi) => match multi.0.into_iter().next() {
            Some(polygon) => polygon.into_inner().0,
            None => return Ok(None),
        },
        _ => {
            warn!("Skipping polygon feature {idx}: geometry is not a polygon");
            return Ok(None);
        }
    };

    let vertices: Vec<(f64, f64)> = exterior.coords().map(|coord| (coord.y, coord.x)).collect();
    // A closed triangle is the smallest usable ring
    if vertices.len() < 4 {
        warn!("Skipping polygon feature {idx}: ring has {} vertices", vertices.len());
        return Ok(None);
    }

    Ok(Some(RawPolygon {
        level,
        vertices,
        tags: Tags::from_properties(properties),
    }))
}
