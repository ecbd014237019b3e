use std::fs;
use std::path::Path;

use geojson::FeatureCollection;
use log::info;

use super::config::MapConfig;
use super::features::parse_feature_collection;
use super::pois::match_pois;
use super::polygons::PolygonCatalog;
use super::vertical::connect_stairways;
use super::ways::WayGraphBuilder;
use crate::Error;
use crate::model::{IndoorMap, dedup_edges};

/// Creates an indoor map from the GeoJSON layers in a map directory
///
/// # Errors
///
/// Returns an error if a layer is missing or unreadable, or if a feature
/// is structurally invalid
pub fn create_indoor_map(config: &MapConfig) -> Result<IndoorMap, Error> {
    validate_config(config)?;

    let graph = config.graph_name();
    info!("Reading map '{graph}' from {}", config.map_dir.display());

    let (polygons, (lines, points)) = rayon::join(
        || read_layer(&config.polygons_path()),
        || {
            rayon::join(
                || read_layer(&config.lines_path()),
                || read_layer(&config.points_path()),
            )
        },
    );

    parse_map(&graph, &polygons?, &lines?, &points?)
}

/// Builds the routing graph from already decoded layers
///
/// Polygons are loaded first, then corridor lines become nodes and edges,
/// points of interest are snapped to nodes, and finally stairwells and
/// elevators are connected across floors.
///
/// # Errors
///
/// Returns an error if a feature is missing its properties or `level`
pub fn parse_map(
    graph: &str,
    polygons: &FeatureCollection,
    lines: &FeatureCollection,
    points: &FeatureCollection,
) -> Result<IndoorMap, Error> {
    info!("Processing polygons for '{graph}'");
    let catalog = PolygonCatalog::load(graph, &polygons.features)?;

    info!("Processing way lines");
    let (nodes, mut edges) = WayGraphBuilder::new(graph).parse(&lines.features, &catalog)?;

    info!("Processing points of interest");
    let pois = match_pois(graph, &points.features, &nodes, &catalog)?;

    edges.extend(connect_stairways(&nodes, &catalog));
    let edges = dedup_edges(edges);

    let map = IndoorMap::new(graph, nodes, edges, catalog, pois);
    info!("Indoor map created successfully: {}", map.summary());
    Ok(map)
}

/// [`parse_map`] over GeoJSON text
///
/// # Errors
///
/// Returns an error if a document is not a FeatureCollection or if a
/// feature is structurally invalid
pub fn parse_map_str(graph: &str, polygons: &str, lines: &str, points: &str) -> Result<IndoorMap, Error> {
    parse_map(
        graph,
        &parse_feature_collection(polygons)?,
        &parse_feature_collection(lines)?,
        &parse_feature_collection(points)?,
    )
}

fn read_layer(path: &Path) -> Result<FeatureCollection, Error> {
    let json = fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    parse_feature_collection(&json)
}

fn validate_config(config: &MapConfig) -> Result<(), Error> {
    if !config.map_dir.is_dir() {
        return Err(Error::InvalidData(format!(
            "Map directory not found: {}",
            config.map_dir.display()
        )));
    }

    for layer in [config.polygons_path(), config.lines_path(), config.points_path()] {
        if !layer.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Map layer not found: {}", layer.display()),
            )));
        }
    }

    if !config.router.room_penalty.is_finite() || config.router.room_penalty < 0.0 {
        return Err(Error::InvalidData(format!(
            "Room penalty must be a non-negative number, got {}",
            config.router.room_penalty
        )));
    }

    Ok(())
}
