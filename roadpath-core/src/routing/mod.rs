//! Routes over the road graph and the per-node labels a search keeps

pub mod label;
pub mod labels;
pub mod route;
pub mod to_geojson;

pub use label::{CostModel, CrowFlyEstimate, Heuristic, PlainCost, QueuedLabel, SearchLabel};
pub use labels::LabelSet;
pub use route::{Metric, Route};
pub use to_geojson::RouteSummary;
