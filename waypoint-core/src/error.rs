use thiserror::Error;

use crate::routing::RoutingError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Feature {feature} is missing required property '{property}'")]
    MissingProperty {
        feature: usize,
        property: &'static str,
    },
    #[error("Invalid level value: {0}")]
    InvalidLevel(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}
