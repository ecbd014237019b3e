//! Snaps points of interest to the closest path node in their room

use geo::{Geometry, Point};
use geojson::Feature;
use hashbrown::HashMap;
use log::{debug, info, warn};

use super::PolygonCatalog;
use super::features::{feature_geometry, feature_level, feature_properties};
use crate::geometry::planar_distance;
use crate::model::{PathNode, PoI, Tags};
use crate::{Error, Level, NodeId, PolygonId};

/// Creates a [`PoI`] for every point feature.
///
/// A point inside a room is matched to the nearest non-wall node of that
/// room, preferring nodes on the point's own level. Points outside every
/// room, or in rooms without nodes, get no match.
///
/// # Errors
///
/// Returns an error if a feature with geometry has no properties, no
/// `level`, or an unreadable level.
pub fn match_pois(
    graph: &str,
    features: &[Feature],
    nodes: &[PathNode],
    catalog: &PolygonCatalog,
) -> Result<Vec<PoI>, Error> {
    let mut room_nodes: HashMap<PolygonId, Vec<&PathNode>> = HashMap::new();
    for node in nodes.iter().filter(|node| !node.tags.is_wall()) {
        if let Some(poly_id) = node.poly_id {
            room_nodes.entry(poly_id).or_default().push(node);
        }
    }

    let mut pois = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let Some(geometry) = feature_geometry(feature)? else {
            debug!("Skipping point feature {idx} without geometry");
            continue;
        };
        let properties = feature_properties(idx, feature)?;
        let level = feature_level(idx, properties)?.literal()?;

        let Geometry::Point(point) = geometry else {
            warn!("Skipping point feature {idx}: geometry is not a point");
            continue;
        };

        let nearest_path_node = catalog
            .containing_polygon(point.y(), point.x(), level)
            .and_then(|room| room_nodes.get(&room.id))
            .and_then(|candidates| nearest_node(point, level, candidates));

        pois.push(PoI {
            id: pois.len(),
            graph: graph.to_string(),
            level,
            lat: point.y(),
            lon: point.x(),
            nearest_path_node,
            tags: Tags::from_properties(properties),
        });
    }

    let matched = pois.iter().filter(|poi| poi.nearest_path_node.is_some()).count();
    info!("Matched {matched} of {} points of interest to path nodes", pois.len());
    Ok(pois)
}

/// Closest candidate by planar distance, first one wins on ties
fn nearest_node(point: Point<f64>, level: Level, candidates: &[&PathNode]) -> Option<NodeId> {
    let same_level: Vec<&PathNode> = candidates
        .iter()
        .copied()
        .filter(|node| node.level == level)
        .collect();
    let candidates: &[&PathNode] = if same_level.is_empty() {
        candidates
    } else {
        &same_level
    };

    match candidates {
        [] => None,
        [only] => Some(only.id),
        _ => candidates
            .iter()
            .map(|node| (node.id, planar_distance(point, node.point())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id),
    }
}
