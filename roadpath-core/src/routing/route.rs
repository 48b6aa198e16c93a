//! Routes: validated, contiguous sequences of arcs

use std::{fmt, str::FromStr};

use itertools::Itertools;
use log::{debug, trace};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::{ArcId, Cost, Error, Meters, NodeId, RoadArc, RoadGraph, Seconds};

/// Cost metric used to pick among parallel arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Minimum free-flow travel time
    Fastest,
    /// Minimum length
    Shortest,
}

impl Metric {
    /// Cost of traversing a single arc under this metric
    pub fn arc_cost(self, arc: &RoadArc) -> Cost {
        match self {
            Metric::Fastest => arc.minimum_travel_time(),
            Metric::Shortest => arc.length(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Fastest => f.write_str("fastest"),
            Metric::Shortest => f.write_str("shortest"),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Same spelling as the serde representation
        match s {
            "fastest" => Ok(Metric::Fastest),
            "shortest" => Ok(Metric::Shortest),
            other => Err(Error::InvalidData(format!("Unknown metric '{other}'"))),
        }
    }
}

/// A trip through a [`RoadGraph`], stored as arc keys plus an origin.
///
/// Routes are represented by arcs rather than nodes because the graph is a
/// multigraph: knowing the visited nodes is not enough to know which of the
/// parallel arcs was taken.
///
/// A route is either empty (no origin), a single node (origin, no arcs) or a
/// sequence of arcs where each arc starts where the previous one ends. Routes
/// built with [`Route::from_arcs`] may break that rule; check them with
/// [`Route::is_valid`].
#[derive(Clone)]
pub struct Route<'g> {
    graph: &'g RoadGraph,
    origin: Option<NodeId>,
    arcs: Vec<ArcId>,
}

impl fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("map_id", &self.graph.map_id())
            .field("origin", &self.origin)
            .field("arcs", &self.arcs)
            .finish()
    }
}

impl<'g> Route<'g> {
    /// Route with no node at all
    pub fn empty(graph: &'g RoadGraph) -> Self {
        Self {
            graph,
            origin: None,
            arcs: Vec::new(),
        }
    }

    /// Route made of a single node and no arcs
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] if `node` is not in the graph.
    pub fn single_node(graph: &'g RoadGraph, node: NodeId) -> Result<Self, Error> {
        if !graph.contains_node(node) {
            return Err(Error::InvalidNodeIndex);
        }
        Ok(Self {
            graph,
            origin: Some(node),
            arcs: Vec::new(),
        })
    }

    /// Wraps the given arcs as they are. The origin is taken from the first
    /// arc; contiguity is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArcIndex`] if an arc is not in the graph.
    pub fn from_arcs(graph: &'g RoadGraph, arcs: Vec<ArcId>) -> Result<Self, Error> {
        let mut origin = None;
        for (idx, &arc) in arcs.iter().enumerate() {
            let (from, _) = graph.arc_endpoints(arc).ok_or(Error::InvalidArcIndex)?;
            if idx == 0 {
                origin = Some(from);
            }
        }
        Ok(Self {
            graph,
            origin,
            arcs,
        })
    }

    /// Builds the route visiting `nodes` in order, taking for each pair of
    /// consecutive nodes the connecting arc with the lowest `metric` cost.
    /// Ties go to the lowest [`ArcId`].
    ///
    /// No nodes give the empty route and one node a single-node route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] for a node outside the graph and
    /// [`Error::DisconnectedWaypoints`] if two consecutive nodes are not
    /// linked by any arc.
    pub fn from_waypoints(
        graph: &'g RoadGraph,
        nodes: &[NodeId],
        metric: Metric,
    ) -> Result<Self, Error> {
        if nodes.iter().any(|&node| !graph.contains_node(node)) {
            return Err(Error::InvalidNodeIndex);
        }

        let origin = match nodes {
            [] => return Ok(Self::empty(graph)),
            [node] => return Self::single_node(graph, *node),
            [first, ..] => *first,
        };

        let mut arcs = Vec::with_capacity(nodes.len() - 1);
        for (position, (&from, &to)) in nodes.iter().tuple_windows().enumerate() {
            let arc = best_arc(graph, from, to, metric)
                .ok_or(Error::DisconnectedWaypoints { position, from, to })?;
            trace!("Waypoint {position}: {metric} arc {arc:?} from {from:?} to {to:?}");
            arcs.push(arc);
        }

        let route = Self {
            graph,
            origin: Some(origin),
            arcs,
        };
        debug!(
            "Built {metric} route through {} waypoints: {:.1} m, {:.1} s",
            nodes.len(),
            route.length(),
            route.minimum_travel_time()
        );
        Ok(route)
    }

    /// [`Route::from_waypoints`] with [`Metric::Fastest`]
    ///
    /// # Errors
    ///
    /// See [`Route::from_waypoints`].
    pub fn fastest_from_nodes(graph: &'g RoadGraph, nodes: &[NodeId]) -> Result<Self, Error> {
        Self::from_waypoints(graph, nodes, Metric::Fastest)
    }

    /// [`Route::from_waypoints`] with [`Metric::Shortest`]
    ///
    /// # Errors
    ///
    /// See [`Route::from_waypoints`].
    pub fn shortest_from_nodes(graph: &'g RoadGraph, nodes: &[NodeId]) -> Result<Self, Error> {
        Self::from_waypoints(graph, nodes, Metric::Shortest)
    }

    /// Joins routes end to end.
    ///
    /// Every route must come from a graph with the same map ID, and each
    /// non-empty route must start where the previous non-empty one ends.
    /// Empty routes are skipped. The result borrows the first route's graph;
    /// routes held against another instance of the same map must use arcs
    /// that are identical in that graph.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyConcatenation`] for an empty slice,
    /// [`Error::GraphMismatch`] for routes of different maps,
    /// [`Error::GraphContentMismatch`] for arcs that differ between two
    /// instances of the same map and [`Error::DisjointRoutes`] when the
    /// result would not be a valid route.
    pub fn concatenate(routes: &[Route<'g>]) -> Result<Self, Error> {
        let (first, rest) = routes.split_first().ok_or(Error::EmptyConcatenation)?;

        let map_id = first.graph.map_id();
        if let Some(other) = rest.iter().find(|route| route.graph.map_id() != map_id) {
            return Err(Error::GraphMismatch {
                expected: map_id.to_string(),
                found: other.graph.map_id().to_string(),
            });
        }
        if let Some(position) = routes
            .iter()
            .position(|route| !route.arcs_match(first.graph))
        {
            return Err(Error::GraphContentMismatch {
                map_id: map_id.to_string(),
                position,
            });
        }

        let mut junction: Option<NodeId> = None;
        for (position, route) in routes.iter().enumerate() {
            let Some(start) = route.origin else {
                continue;
            };
            if let Some(end) = junction
                && end != start
            {
                debug!("Route {position} starts at {start:?} but the previous one ends at {end:?}");
                return Err(Error::DisjointRoutes { position });
            }
            junction = route.destination();
        }

        let route = Self {
            graph: first.graph,
            origin: routes.iter().find_map(Route::origin),
            arcs: routes
                .iter()
                .flat_map(|route| route.arcs.iter().copied())
                .collect(),
        };

        // Junctions match, so a break here comes from an input route itself.
        if let Some(broken_arc) = route.first_broken_link() {
            let position = routes
                .iter()
                .scan(0, |seen, route| {
                    *seen += route.arcs.len();
                    Some(*seen)
                })
                .position(|seen| broken_arc < seen)
                .unwrap_or_default();
            return Err(Error::DisjointRoutes { position });
        }

        debug!(
            "Concatenated {} routes into {} arcs on map '{map_id}'",
            routes.len(),
            route.arcs.len()
        );
        Ok(route)
    }

    /// Graph the route belongs to
    pub fn graph(&self) -> &'g RoadGraph {
        self.graph
    }

    /// First node, `None` for the empty route
    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    /// Last node, `None` for the empty route
    pub fn destination(&self) -> Option<NodeId> {
        match self.arcs.last() {
            Some(&arc) => self.graph.arc_endpoints(arc).map(|(_, to)| to),
            None => self.origin,
        }
    }

    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }

    /// Arc payloads, in route order
    pub fn road_arcs(&self) -> impl Iterator<Item = &'g RoadArc> + '_ {
        self.arcs.iter().filter_map(|&arc| self.graph.arc(arc))
    }

    /// Visited nodes: the origin followed by the destination of every arc
    pub fn nodes(&self) -> Vec<NodeId> {
        self.origin
            .into_iter()
            .chain(
                self.arcs
                    .iter()
                    .filter_map(|&arc| self.graph.arc_endpoints(arc))
                    .map(|(_, to)| to),
            )
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_none()
    }

    /// Number of nodes in the route
    pub fn size(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            1 + self.arcs.len()
        }
    }

    /// Checks that the first arc leaves the origin and that every arc starts
    /// where the previous one ends. Empty and single-node routes are valid.
    pub fn is_valid(&self) -> bool {
        self.first_broken_link().is_none()
    }

    /// Whether every arc of the route reads the same in `graph`
    fn arcs_match(&self, graph: &RoadGraph) -> bool {
        let weights = |arc: &RoadArc| (arc.length(), arc.minimum_travel_time());
        std::ptr::eq(self.graph, graph)
            || self.arcs.iter().all(|&arc| {
                self.graph.arc_endpoints(arc) == graph.arc_endpoints(arc)
                    && self.graph.arc(arc).map(weights) == graph.arc(arc).map(weights)
            })
    }

    /// Index of the first arc that does not continue the route
    fn first_broken_link(&self) -> Option<usize> {
        let Some(mut expected) = self.origin else {
            return (!self.arcs.is_empty()).then_some(0);
        };
        for (idx, &arc) in self.arcs.iter().enumerate() {
            match self.graph.arc_endpoints(arc) {
                Some((from, to)) if from == expected => expected = to,
                _ => return Some(idx),
            }
        }
        None
    }

    /// Total length in meters
    pub fn length(&self) -> Meters {
        self.road_arcs().map(RoadArc::length).sum()
    }

    /// Time in seconds to travel the route at `speed` km/h.
    /// `speed` must be positive.
    pub fn travel_time(&self, speed: f64) -> Seconds {
        self.length() * 3600.0 / (speed * 1000.0)
    }

    /// Time in seconds to travel the route at the speed limit of every arc
    pub fn minimum_travel_time(&self) -> Seconds {
        self.road_arcs().map(RoadArc::minimum_travel_time).sum()
    }

    /// Total cost under `metric`
    pub fn cost(&self, metric: Metric) -> Cost {
        match metric {
            Metric::Fastest => self.minimum_travel_time(),
            Metric::Shortest => self.length(),
        }
    }

    /// Weak equivalence: same origin, same destination and same length.
    /// Two different routes of equal length between the same nodes match.
    #[allow(clippy::float_cmp)]
    pub fn same_endpoints_and_length(&self, other: &Route<'_>) -> bool {
        self.origin == other.origin
            && self.destination() == other.destination()
            && self.length() == other.length()
    }
}

/// Cheapest arc from `from` to `to` under `metric`, lowest id on ties
fn best_arc(graph: &RoadGraph, from: NodeId, to: NodeId, metric: Metric) -> Option<ArcId> {
    graph
        .arcs_between(from, to)
        .min_by(|a, b| {
            metric
                .arc_cost(a.weight())
                .total_cmp(&metric.arc_cost(b.weight()))
                .then_with(|| a.id().cmp(&b.id()))
        })
        .map(|edge| edge.id())
}
