// Re-export key components
pub use crate::Error;
pub use crate::model::{GraphMeta, RoadArc, RoadGraph, RoadNode};
pub use crate::routing::label::{
    CostModel, CrowFlyEstimate, Heuristic, PlainCost, QueuedLabel, SearchLabel,
};
pub use crate::routing::labels::LabelSet;
pub use crate::routing::route::{Metric, Route};
pub use crate::routing::to_geojson::RouteSummary;

// Core key types
pub use crate::ArcId;
pub use crate::NodeId;

// Units
pub use crate::Cost;
pub use crate::Meters;
pub use crate::Seconds;
