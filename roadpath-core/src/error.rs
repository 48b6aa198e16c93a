use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Invalid arc index")]
    InvalidArcIndex,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Waypoint {position} is not connected to the next one: no arc from {from:?} to {to:?}")]
    DisconnectedWaypoints {
        position: usize,
        from: NodeId,
        to: NodeId,
    },
    #[error("Cannot concatenate an empty list of routes")]
    EmptyConcatenation,
    #[error("Cannot concatenate routes from different graphs: expected map '{expected}', found '{found}'")]
    GraphMismatch { expected: String, found: String },
    #[error("Route {position} uses arcs that differ in this instance of map '{map_id}'")]
    GraphContentMismatch { map_id: String, position: usize },
    #[error("Cannot concatenate routes that do not form a single route (break before route {position})")]
    DisjointRoutes { position: usize },
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
