//! Weighted A* over the street graph.

use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::{HashMap, HashSet};
use log::debug;

use crate::{
    MAX_SEARCH_ITERATIONS, NodeId,
    geodesy::haversine_distance,
    model::{StreetEdge, StreetGraph},
    overlay::RiskOverlay,
};

#[derive(Clone)]
struct State {
    f_score: f64,
    /// Monotonic insertion counter; equal-priority entries pop in
    /// insertion order.
    seq: u64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.seq == other.seq
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by f-score (reversed from standard Rust BinaryHeap);
        // ties break to the earlier-inserted entry.
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Predecessor links of a finished search, handed to the route assembler.
#[derive(Debug, Clone)]
pub struct SearchTree {
    pub(crate) goal: NodeId,
    pub(crate) predecessors: HashMap<NodeId, (NodeId, StreetEdge)>,
}

/// A* search from `start` to `goal` with a blended cost function.
///
/// `safety_factor` in `[0, 1]` trades distance against risk: the cost of
/// traversing an edge is `(length_m / 1000) * (1 - sf) + adjusted_weight *
/// sf`, and the heuristic is `(haversine(n, goal) / 1000) * (1 - sf)`.
///
/// The heuristic is admissible for the distance term only; it does not
/// model remaining risk, so for `safety_factor > 0` the search is not
/// guaranteed optimal. That is an accepted approximation of this system,
/// not something to correct here.
///
/// Returns `None` - never an error - when `start` or `goal` is unknown,
/// when the frontier empties without reaching `goal`, or when the
/// [`MAX_SEARCH_ITERATIONS`] expansion cap is hit. The three cases are
/// indistinguishable by design: all mean "no usable path in bounded
/// effort". On reaching `goal` the search stops immediately.
#[must_use]
pub fn astar(
    graph: &StreetGraph,
    overlay: &RiskOverlay,
    start: &str,
    goal: &str,
    safety_factor: f64,
) -> Option<SearchTree> {
    let sf = safety_factor.clamp(0.0, 1.0);

    let start_node = graph.node(start)?;
    let goal_node = graph.node(goal)?;

    let mut frontier = BinaryHeap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeId, (NodeId, StreetEdge)> = HashMap::new();
    let mut seq: u64 = 0;

    g_score.insert(start.to_string(), 0.0);
    frontier.push(State {
        f_score: haversine_distance(start_node.geometry, goal_node.geometry) / 1000.0 * (1.0 - sf),
        seq,
        node: start.to_string(),
    });

    let mut iterations = 0usize;

    while let Some(State { node: current, .. }) = frontier.pop() {
        iterations += 1;
        if iterations > MAX_SEARCH_ITERATIONS {
            debug!("Search capped at {MAX_SEARCH_ITERATIONS} expansions, treating as no route");
            return None;
        }

        if !settled.insert(current.clone()) {
            continue;
        }

        if current == goal {
            debug!("Path found after {iterations} expansions (safety_factor={sf})");
            return Some(SearchTree {
                goal: current,
                predecessors,
            });
        }

        // Targets were verified against the node table at load time, so
        // the lookups below cannot miss for a well-formed graph.
        let Some(current_node) = graph.node(&current) else {
            continue;
        };
        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

        for edge in graph.edges(&current) {
            let neighbor = edge.target.as_str();
            if settled.contains(neighbor) {
                continue;
            }
            let Some(neighbor_node) = graph.node(neighbor) else {
                continue;
            };

            let edge_cost = edge.length_km() * (1.0 - sf)
                + overlay.adjusted_weight(edge, current_node, neighbor_node) * sf;
            let tentative = current_g + edge_cost;

            if tentative < g_score.get(neighbor).copied().unwrap_or(f64::INFINITY) {
                predecessors.insert(neighbor.to_string(), (current.clone(), edge.clone()));
                g_score.insert(neighbor.to_string(), tentative);

                let h = haversine_distance(neighbor_node.geometry, goal_node.geometry) / 1000.0
                    * (1.0 - sf);
                seq += 1;
                frontier.push(State {
                    f_score: tentative + h,
                    seq,
                    node: neighbor.to_string(),
                });
            }
        }
    }

    debug!("Frontier exhausted after {iterations} expansions, no route");
    None
}
