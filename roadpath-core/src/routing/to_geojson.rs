use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde::Serialize;
use serde_json::json;

use super::Route;
use crate::{ArcId, Error, Meters, NodeId, RoadGraph, Seconds};

/// Serializable overview of a route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub map_id: String,
    pub origin: Option<usize>,
    pub destination: Option<usize>,
    /// Number of nodes
    pub size: usize,
    pub length: Meters,
    pub minimum_travel_time: Seconds,
}

impl Route<'_> {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            map_id: self.graph().map_id().to_string(),
            origin: self.origin().map(NodeId::index),
            destination: self.destination().map(NodeId::index),
            size: self.size(),
            length: self.length(),
            minimum_travel_time: self.minimum_travel_time(),
        }
    }

    /// Converts the route to a `GeoJSON` Feature.
    ///
    /// The geometry is a `LineString` following arc geometries where the arcs
    /// have one and straight segments between nodes otherwise, a `Point` for a
    /// single-node route and `null` for the empty route.
    pub fn to_feature(&self) -> Result<Feature, Error> {
        let graph = self.graph();
        let geometry = match self.origin() {
            None => None,
            Some(origin) if self.arcs().is_empty() => graph
                .node(origin)
                .map(|node| Geometry::new(GeoJsonValue::from(&node.geometry))),
            Some(_) => Some(Geometry::new(GeoJsonValue::from(&route_line(
                graph,
                self.arcs(),
            )))),
        };

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": serde_json::to_value(self.summary())
                .map_err(|e| Error::GeoJsonError(e.to_string()))?,
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_feature()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn route_line(graph: &RoadGraph, arcs: &[ArcId]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(arcs.len() + 1);

    for &arc in arcs {
        let Some((from, to)) = graph.arc_endpoints(arc) else {
            continue;
        };
        let segment: Vec<Coord<f64>> = match graph.arc(arc).and_then(|a| a.geometry.as_ref()) {
            Some(line) => line.coords().copied().collect(),
            None => [from, to]
                .iter()
                .filter_map(|&node| graph.node(node))
                .map(|node| node.geometry.into())
                .collect(),
        };

        // Consecutive arcs share their junction point
        let skip = usize::from(coords.last().is_some() && coords.last() == segment.first());
        coords.extend(segment.into_iter().skip(skip));
    }

    LineString::new(coords)
}
