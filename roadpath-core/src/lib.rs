//! Route and search-label primitives for shortest-path computation over
//! road-network multigraphs.
//!
//! A [`Route`] is a validated sequence of arcs, built from arcs directly,
//! from waypoints under a [`Metric`], by concatenation or from the
//! predecessor chain of a finished search. A [`SearchLabel`] is the per-node
//! record a Dijkstra or A* driver keeps in its priority queue.

pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::{GraphMeta, RoadArc, RoadGraph, RoadNode};
pub use routing::{
    CostModel, CrowFlyEstimate, Heuristic, LabelSet, Metric, PlainCost, QueuedLabel, Route,
    RouteSummary, SearchLabel,
};

/// Default speed (km/h) turning crow-fly distances into time estimates
pub const DEFAULT_TOP_SPEED: f64 = 130.0;

/// Node key in a [`RoadGraph`]
pub type NodeId = petgraph::graph::NodeIndex;
/// Arc key in a [`RoadGraph`], stable for the lifetime of the graph
pub type ArcId = petgraph::graph::EdgeIndex;
pub type Meters = f64;
pub type Seconds = f64;
/// Search cost, in meters or seconds depending on the metric
pub type Cost = f64;
