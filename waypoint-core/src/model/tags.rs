//! Open tag dictionaries attached to nodes, polygons and points of interest

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Tag keys the pipeline and router look at
pub mod keys {
    pub const INDOOR: &str = "indoor";
    pub const STAIRS: &str = "stairs";
    pub const HIGHWAY: &str = "highway";
    pub const ROOM_NAME: &str = "room-name";
    pub const ROOM_NO: &str = "room-no";
    pub const LEVEL: &str = "level";
    pub const AMENITY: &str = "amenity";
}

/// Values of the `indoor` tag
pub mod indoor {
    pub const WAY: &str = "way";
    pub const WALL: &str = "wall";
    pub const ROOM: &str = "room";
    pub const HALLWAY: &str = "hallway";
    pub const AREA: &str = "area";
    pub const CORRIDOR: &str = "corridor";
}

/// `highway` value marking an elevator shaft
pub const ELEVATOR: &str = "elevator";

/// Single tag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl TagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Number(value) => Some(*value),
            TagValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TagValue::Null)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Null => Ok(()),
            TagValue::Bool(value) => write!(f, "{value}"),
            TagValue::Number(value) => write!(f, "{value}"),
            TagValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&JsonValue> for TagValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => TagValue::Null,
            JsonValue::Bool(value) => TagValue::Bool(*value),
            JsonValue::Number(number) => number
                .as_f64()
                .map_or_else(|| TagValue::Text(number.to_string()), TagValue::Number),
            JsonValue::String(text) => TagValue::Text(text.clone()),
            // Nested values are kept verbatim
            JsonValue::Array(_) | JsonValue::Object(_) => TagValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Number(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

/// String-keyed tag map with typed accessors for the recognized keys
/// listed in [`keys`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, TagValue>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every property of a GeoJSON feature.
    pub fn from_properties(properties: &Map<String, JsonValue>) -> Self {
        properties
            .iter()
            .map(|(key, value)| (key.clone(), TagValue::from(value)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TagValue::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Option<TagValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Key exists and is not null
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn indoor(&self) -> Option<&str> {
        self.get_str(keys::INDOOR)
    }

    /// Routable corridor or path vertex
    pub fn is_way(&self) -> bool {
        self.indoor() == Some(indoor::WAY)
    }

    pub fn is_wall(&self) -> bool {
        self.indoor() == Some(indoor::WALL)
    }

    pub fn is_room(&self) -> bool {
        self.indoor() == Some(indoor::ROOM)
    }

    pub fn is_stairs(&self) -> bool {
        self.is_present(keys::STAIRS)
    }

    pub fn is_elevator(&self) -> bool {
        self.get_str(keys::HIGHWAY) == Some(ELEVATOR)
    }

    pub fn room_name(&self) -> Option<String> {
        self.label(keys::ROOM_NAME)
    }

    pub fn room_number(&self) -> Option<String> {
        self.label(keys::ROOM_NO)
    }

    fn label(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|value| !value.is_null())
            .map(ToString::to_string)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, TagValue)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<TagValue>, const N: usize> From<[(K, V); N]> for Tags {
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }
}
