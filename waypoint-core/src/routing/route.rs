use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use itertools::Itertools;
use serde::Serialize;
use serde_json::json;

use super::instructions::{Instruction, generate_instructions};
use crate::geometry::haversine_distance;
use crate::model::{LevelIndex, PathNode, level_key};
use crate::{Error, Level, NodeId};

/// Walking route between two path nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub ids: Vec<NodeId>,
    pub nodes: Vec<PathNode>,
    pub instructions: Vec<Instruction>,
    /// Distinct levels visited, ascending
    pub levels: Vec<Level>,
    /// Horizontal walking distance in metres
    pub distance: f64,
}

impl Route {
    pub fn new(ids: Vec<NodeId>, nodes: Vec<PathNode>) -> Self {
        let instructions = generate_instructions(&nodes);
        let levels = levels_spanned(&nodes);
        let distance = walking_distance(&nodes);
        Self {
            ids,
            nodes,
            instructions,
            levels,
            distance,
        }
    }

    pub fn start(&self) -> Option<&PathNode> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    pub fn changes_level(&self) -> bool {
        self.levels.len() > 1
    }

    /// Converts the route to a `GeoJSON` `FeatureCollection`.
    ///
    /// Every run of consecutive nodes on one level becomes a feature, a
    /// `LineString` or a `Point` for a run of a single node. Instructions
    /// and the total distance are attached to the collection itself.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .nodes
            .iter()
            .chunk_by(|node| level_key(node.level))
            .into_iter()
            .enumerate()
            .map(|(leg_idx, (_, run))| create_leg_feature(leg_idx, &run.collect::<Vec<_>>()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("instructions".to_string(), json!(self.instructions));
        foreign_members.insert("levels".to_string(), json!(self.levels));
        foreign_members.insert("distance".to_string(), json!(self.distance));

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: Some(foreign_members),
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// Sorted distinct levels of a path
pub fn levels_spanned(nodes: &[PathNode]) -> Vec<Level> {
    LevelIndex::new(nodes.iter().map(|node| node.level))
        .as_slice()
        .to_vec()
}

/// Sum of great-circle distances between consecutive nodes, in metres
pub fn walking_distance<'a, I>(nodes: I) -> f64
where
    I: IntoIterator<Item = &'a PathNode>,
{
    nodes
        .into_iter()
        .tuple_windows()
        .map(|(a, b)| haversine_distance(a.point(), b.point()))
        .sum()
}

fn create_leg_feature(leg_idx: usize, run: &[&PathNode]) -> Result<Feature, Error> {
    let geometry = match run {
        [single] => Geometry::new(GeoJsonValue::from(&single.point())),
        _ => {
            let line: LineString<f64> = run.iter().map(|node| node.point()).collect();
            Geometry::new(GeoJsonValue::from(&line))
        }
    };

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_index": leg_idx,
            "level": run.first().map(|node| node.level),
            "node_ids": run.iter().map(|node| node.id).collect::<Vec<_>>(),
            "distance": walking_distance(run.iter().copied()),
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
