use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::routing::RouterConfig;

/// Location of a surveyed map and routing settings for it.
///
/// A map directory holds three GeoJSON layers: [`POLYGONS_FILE`],
/// [`LINES_FILE`] and [`POINTS_FILE`].
///
/// [`POLYGONS_FILE`]: MapConfig::POLYGONS_FILE
/// [`LINES_FILE`]: MapConfig::LINES_FILE
/// [`POINTS_FILE`]: MapConfig::POINTS_FILE
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub map_dir: PathBuf,
    /// Graph name, defaults to the directory name
    #[serde(default)]
    pub graph_name: Option<String>,
    #[serde(default)]
    pub router: RouterConfig,
}

impl MapConfig {
    pub const POLYGONS_FILE: &'static str = "Polygons.json";
    pub const LINES_FILE: &'static str = "LineString.json";
    pub const POINTS_FILE: &'static str = "Points.json";

    pub fn new(map_dir: impl Into<PathBuf>) -> Self {
        Self {
            map_dir: map_dir.into(),
            graph_name: None,
            router: RouterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_graph_name(mut self, graph_name: impl Into<String>) -> Self {
        self.graph_name = Some(graph_name.into());
        self
    }

    pub fn graph_name(&self) -> String {
        self.graph_name.clone().unwrap_or_else(|| {
            self.map_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "map".to_string())
        })
    }

    pub fn polygons_path(&self) -> PathBuf {
        self.layer(Self::POLYGONS_FILE)
    }

    pub fn lines_path(&self) -> PathBuf {
        self.layer(Self::LINES_FILE)
    }

    pub fn points_path(&self) -> PathBuf {
        self.layer(Self::POINTS_FILE)
    }

    fn layer(&self, file: impl AsRef<Path>) -> PathBuf {
        self.map_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_name_defaults_to_directory() {
        let config = MapConfig::new("/data/maps/engineering/");
        assert_eq!(config.graph_name(), "engineering");
        assert_eq!(
            config.lines_path(),
            PathBuf::from("/data/maps/engineering/LineString.json")
        );

        let config = config.with_graph_name("eng");
        assert_eq!(config.graph_name(), "eng");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: MapConfig = serde_json::from_str(r#"{"map_dir": "maps/library"}"#).unwrap();
        assert_eq!(config.graph_name(), "library");
        assert_eq!(config.router.room_penalty, crate::ROOM_PENALTY);

        let config: MapConfig =
            serde_json::from_str(r#"{"map_dir": "maps/library", "router": {"room_penalty": 50.0}}"#)
                .unwrap();
        assert_eq!(config.router.room_penalty, 50.0);
    }
}
