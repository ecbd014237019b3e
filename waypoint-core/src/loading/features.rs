//! Decoding helpers shared by the polygon, line and point layers

use std::str::FromStr;

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use log::warn;
use serde_json::Value as JsonValue;

use crate::model::LevelIndex;
use crate::model::tags::keys;
use crate::{Error, Level};

/// Raw `level` property of a feature
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSpec {
    /// A single floor
    Single(Level),
    /// `"lower;upper"` span over positions in the building's [`LevelIndex`]
    Range(String),
}

impl LevelSpec {
    /// Reads a `level` property: a number, a numeric string or a
    /// `"lower;upper"` string.
    pub fn parse(value: &JsonValue) -> Result<Self, Error> {
        match value {
            JsonValue::Number(number) => number
                .as_f64()
                .map(LevelSpec::Single)
                .ok_or_else(|| Error::InvalidLevel(number.to_string())),
            JsonValue::String(text) => {
                let text = text.trim();
                if text.contains(';') {
                    Ok(LevelSpec::Range(text.to_string()))
                } else {
                    text.parse()
                        .map(LevelSpec::Single)
                        .map_err(|_| Error::InvalidLevel(text.to_string()))
                }
            }
            other => Err(Error::InvalidLevel(other.to_string())),
        }
    }

    /// Single literal floor; a span degrades to its lower bound read as a level.
    pub fn literal(&self) -> Result<Level, Error> {
        match self {
            LevelSpec::Single(level) => Ok(*level),
            LevelSpec::Range(text) => text
                .split(';')
                .next()
                .and_then(|lower| lower.trim().parse().ok())
                .ok_or_else(|| Error::InvalidLevel(text.clone())),
        }
    }

    /// Floors covered by this value.
    ///
    /// A span selects the floors after position `lower` up to position
    /// `upper`, so `"0;2"` over `[0, 0.5, 1, 2]` is `[0.5, 1]`. A malformed
    /// or empty span, or one pointing outside the index, falls back to
    /// [`literal`](Self::literal).
    pub fn resolve(&self, levels: &LevelIndex) -> Result<Vec<Level>, Error> {
        let LevelSpec::Range(text) = self else {
            return self.literal().map(|level| vec![level]);
        };

        let bounds: Option<(usize, usize)> = text.split_once(';').and_then(|(lower, upper)| {
            Some((lower.trim().parse().ok()?, upper.trim().parse().ok()?))
        });

        match bounds.and_then(|(lower, upper)| levels.span(lower.checked_add(1)?, upper)) {
            Some(span) => Ok(span.to_vec()),
            None => {
                let level = self.literal()?;
                warn!("Level span '{text}' does not match the {} known levels, using {level}", levels.len());
                Ok(vec![level])
            }
        }
    }
}

/// Parses a GeoJSON document that must be a FeatureCollection
pub fn parse_feature_collection(json: &str) -> Result<FeatureCollection, Error> {
    match GeoJson::from_str(json).map_err(|e| Error::GeoJsonError(e.to_string()))? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(Error::InvalidData(
            "Expected a GeoJSON FeatureCollection".to_string(),
        )),
    }
}

/// Feature geometry as a `geo` type, `None` for a null geometry
pub(crate) fn feature_geometry(feature: &Feature) -> Result<Option<geo::Geometry<f64>>, Error> {
    feature
        .geometry
        .clone()
        .map(geo::Geometry::<f64>::try_from)
        .transpose()
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

pub(crate) fn feature_properties(index: usize, feature: &Feature) -> Result<&JsonObject, Error> {
    feature.properties.as_ref().ok_or(Error::MissingProperty {
        feature: index,
        property: "properties",
    })
}

pub(crate) fn feature_level(index: usize, properties: &JsonObject) -> Result<LevelSpec, Error> {
    let value = properties.get(keys::LEVEL).ok_or(Error::MissingProperty {
        feature: index,
        property: keys::LEVEL,
    })?;
    LevelSpec::parse(value)
}
