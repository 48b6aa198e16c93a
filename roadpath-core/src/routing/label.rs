use std::cmp::Ordering;

use geo::{Distance, Haversine, Point};

use crate::{ArcId, Cost, DEFAULT_TOP_SPEED, Error, NodeId, RoadGraph, routing::Metric};

/// Per-node record of a shortest-path search.
///
/// The label holds state only: relaxation and queue handling belong to the
/// search driver. Labels order by total cost (see [`CostModel`]), unreached
/// labels last, then by node.
#[derive(Debug, Clone)]
pub struct SearchLabel {
    node: NodeId,
    cost: Option<Cost>,
    finalized: bool,
    predecessor: Option<ArcId>,
}

impl SearchLabel {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            cost: None,
            finalized: false,
            predecessor: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Tentative cost from the search origin, `None` until reached
    pub fn cost(&self) -> Option<Cost> {
        self.cost
    }

    pub fn is_reached(&self) -> bool {
        self.cost.is_some()
    }

    /// Callers only ever lower the cost, and never after finalization.
    pub fn set_cost(&mut self, cost: Cost) {
        debug_assert!(!self.finalized, "cost of a finalized label changed");
        self.cost = Some(cost);
    }

    /// Arc through which the current cost was reached
    pub fn predecessor(&self) -> Option<ArcId> {
        self.predecessor
    }

    pub fn set_predecessor(&mut self, arc: Option<ArcId>) {
        self.predecessor = arc;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn set_finalized(&mut self, finalized: bool) {
        self.finalized = finalized;
    }

    /// Lowers the cost to `cost`, reached through `via`, if that improves an
    /// unfinalized label. Returns whether the label changed.
    pub fn relax(&mut self, cost: Cost, via: ArcId) -> bool {
        if self.finalized || self.cost.is_some_and(|current| current <= cost) {
            return false;
        }
        self.cost = Some(cost);
        self.predecessor = Some(via);
        true
    }

    /// Key used for ordering; the stored cost unless a [`CostModel`] says otherwise
    pub fn total_cost(&self) -> Option<Cost> {
        PlainCost.total_cost(self)
    }

    /// Orders two labels by the total cost `model` gives them
    pub fn compare_with<M: CostModel + ?Sized>(&self, other: &Self, model: &M) -> Ordering {
        compare_totals(model.total_cost(self), model.total_cost(other))
            .then_with(|| self.node.cmp(&other.node))
    }

    /// Priority queue entry for this label, `None` while unreached
    pub fn queued<M: CostModel + ?Sized>(&self, model: &M) -> Option<QueuedLabel> {
        model.total_cost(self).map(|total| QueuedLabel {
            total,
            node: self.node,
        })
    }
}

fn compare_totals(left: Option<Cost>, right: Option<Cost>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Ord for SearchLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, &PlainCost)
    }
}

impl PartialOrd for SearchLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchLabel {}

/// Entry of a `BinaryHeap` driven search: the label's total cost at push time
#[derive(Debug, Copy, Clone)]
pub struct QueuedLabel {
    pub total: Cost,
    pub node: NodeId,
}

impl Ord for QueuedLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by total cost (reversed from standard Rust BinaryHeap)
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueuedLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedLabel {}

/// Total cost of a label, the key a search extracts labels by.
///
/// Dijkstra uses the stored cost ([`PlainCost`]); A* adds an estimate of the
/// remaining cost to the goal, which must never overestimate it.
pub trait CostModel {
    fn total_cost(&self, label: &SearchLabel) -> Option<Cost>;
}

/// Total cost equals the stored cost
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCost;

impl CostModel for PlainCost {
    fn total_cost(&self, label: &SearchLabel) -> Option<Cost> {
        label.cost()
    }
}

/// Stored cost plus a caller-supplied estimate for the label's node
#[derive(Debug, Clone, Copy)]
pub struct Heuristic<F>(pub F);

impl<F: Fn(NodeId) -> Cost> CostModel for Heuristic<F> {
    fn total_cost(&self, label: &SearchLabel) -> Option<Cost> {
        label.cost().map(|cost| cost + (self.0)(label.node()))
    }
}

/// Great-circle estimate of the remaining cost to a goal node.
///
/// For [`Metric::Shortest`] the estimate is the distance in meters; for
/// [`Metric::Fastest`] it is the time to cover that distance at `top_speed`,
/// which must be at least the highest speed limit of the graph.
#[derive(Debug, Clone)]
pub struct CrowFlyEstimate<'g> {
    graph: &'g RoadGraph,
    goal: Point<f64>,
    metric: Metric,
    top_speed: f64,
}

impl<'g> CrowFlyEstimate<'g> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] if `goal` is not in the graph.
    pub fn new(graph: &'g RoadGraph, goal: NodeId, metric: Metric) -> Result<Self, Error> {
        let goal = graph.node(goal).ok_or(Error::InvalidNodeIndex)?.geometry;
        Ok(Self {
            graph,
            goal,
            metric,
            top_speed: DEFAULT_TOP_SPEED,
        })
    }

    /// Sets the speed (km/h) used to turn distances into times
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the speed is not strictly positive.
    pub fn with_top_speed(mut self, top_speed: f64) -> Result<Self, Error> {
        if !(top_speed.is_finite() && top_speed > 0.0) {
            return Err(Error::InvalidData(format!(
                "Top speed must be positive, got {top_speed}"
            )));
        }
        self.top_speed = top_speed;
        Ok(self)
    }

    /// Estimated remaining cost from `node`; zero for nodes outside the graph
    pub fn estimate(&self, node: NodeId) -> Cost {
        let Some(node) = self.graph.node(node) else {
            return 0.0;
        };
        let meters = Haversine.distance(node.geometry, self.goal);
        match self.metric {
            Metric::Shortest => meters,
            Metric::Fastest => meters * 3600.0 / (self.top_speed * 1000.0),
        }
    }
}

impl CostModel for CrowFlyEstimate<'_> {
    fn total_cost(&self, label: &SearchLabel) -> Option<Cost> {
        label.cost().map(|cost| cost + self.estimate(label.node()))
    }
}
