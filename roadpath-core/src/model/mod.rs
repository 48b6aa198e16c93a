//! Data model of the road network consumed by routing

pub mod components;
pub mod network;

pub use components::{RoadArc, RoadNode};
pub use network::{GraphMeta, RoadGraph};
