use hashbrown::HashMap;
use log::debug;

use super::{Route, SearchLabel};
use crate::{Error, NodeId, RoadGraph};

/// Labels of a single search, created on first touch.
///
/// The origin label starts at cost zero. Discard the set once the search is
/// over; it is not meant to be reused for another origin.
#[derive(Debug, Clone)]
pub struct LabelSet {
    origin: NodeId,
    labels: HashMap<NodeId, SearchLabel>,
}

impl LabelSet {
    pub fn new(origin: NodeId) -> Self {
        Self::with_capacity(origin, 1)
    }

    pub fn with_capacity(origin: NodeId, capacity: usize) -> Self {
        let mut labels = HashMap::with_capacity(capacity.max(1));
        let mut start = SearchLabel::new(origin);
        start.set_cost(0.0);
        labels.insert(origin, start);
        Self { origin, labels }
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    pub fn get(&self, node: NodeId) -> Option<&SearchLabel> {
        self.labels.get(&node)
    }

    /// Label of `node`, created unreached if the search has not touched it yet
    pub fn label_mut(&mut self, node: NodeId) -> &mut SearchLabel {
        self.labels
            .entry(node)
            .or_insert_with(|| SearchLabel::new(node))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: the origin label exists from the start
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn finalized_count(&self) -> usize {
        self.labels.values().filter(|label| label.is_finalized()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchLabel> {
        self.labels.values()
    }

    /// Route from the search origin to `target` along predecessor arcs.
    ///
    /// An unreached target gives the empty route, the origin itself a
    /// single-node route.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeIndex`] if `target` is not in the graph,
    /// [`Error::InvalidArcIndex`] for a predecessor arc outside the graph and
    /// [`Error::InvalidData`] if the predecessor chain does not lead back to
    /// the origin.
    pub fn route_to<'g>(&self, graph: &'g RoadGraph, target: NodeId) -> Result<Route<'g>, Error> {
        if !graph.contains_node(target) {
            return Err(Error::InvalidNodeIndex);
        }
        if target == self.origin {
            return Route::single_node(graph, target);
        }
        if !self.get(target).is_some_and(SearchLabel::is_reached) {
            debug!("Node {target:?} was not reached from {:?}", self.origin);
            return Ok(Route::empty(graph));
        }

        // Follow predecessors backward from target to origin
        let mut arcs = Vec::new();
        let mut current = target;
        while current != self.origin {
            let Some(arc) = self.get(current).and_then(SearchLabel::predecessor) else {
                return Err(Error::InvalidData(format!(
                    "Predecessor chain of {target:?} stops at {current:?} before the origin"
                )));
            };
            if arcs.len() >= self.labels.len() {
                return Err(Error::InvalidData(format!(
                    "Predecessor chain of {target:?} loops"
                )));
            }
            let (from, to) = graph.arc_endpoints(arc).ok_or(Error::InvalidArcIndex)?;
            if to != current {
                return Err(Error::InvalidData(format!(
                    "Predecessor of {current:?} ends at {to:?}"
                )));
            }
            arcs.push(arc);
            current = from;
        }
        arcs.reverse(); // Now route is from origin to target

        Route::from_arcs(graph, arcs)
    }
}
