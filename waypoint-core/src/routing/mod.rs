//! Walking routes through an indoor map
//!
//! [`Router`] runs A* over the path-node graph, [`generate_instructions`]
//! turns a node sequence into turn directions and [`Route`] bundles both
//! with a GeoJSON export.

mod instructions;
mod route;
mod router;

use thiserror::Error;

use crate::NodeId;

pub use instructions::{Instruction, generate_instructions, turn_angle};
pub use route::{Route, levels_spanned, walking_distance};
pub use router::{Router, RouterConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Node {0} is not part of the routing graph")]
    UnknownNode(NodeId),
    #[error("No path between nodes {start} and {end}")]
    PathNotFound { start: NodeId, end: NodeId },
}
