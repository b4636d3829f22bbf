//! In-memory street graph: node table, adjacency table, snap index.

use geo::Point;
use hashbrown::HashMap;
use rstar::{RTree, primitives::GeomWithData};

use crate::{NEAREST_CANDIDATES, NodeId, geodesy::haversine_distance};

use super::{Node, StreetEdge};

/// R-tree entry: planar point in degree space carrying the node id and
/// its first-encountered load position.
type IndexedPoint = GeomWithData<[f64; 2], (NodeId, usize)>;

/// The street-intersection graph.
///
/// Both tables are keyed by the canonical string id. Built once by
/// [`loading::graph_input`](crate::loading::graph_input), then read-only
/// apart from the single road-class enrichment pass.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    nodes: HashMap<NodeId, Node>,
    adjacency: HashMap<NodeId, Vec<StreetEdge>>,
    /// Node ids in first-encountered order; tie-breaks in `nearest_node`
    /// resolve to the earliest entry here.
    node_order: Vec<NodeId>,
    snap_index: RTree<IndexedPoint>,
    dropped_edges: usize,
}

impl StreetGraph {
    pub(crate) fn insert_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    /// Appends an outgoing edge under its source key. Returns `false`
    /// (and leaves the graph untouched) when the target is absent from the
    /// node table; the caller records the diagnostic.
    pub(crate) fn insert_edge(&mut self, edge: StreetEdge) -> bool {
        if !self.nodes.contains_key(&edge.target) {
            self.dropped_edges += 1;
            return false;
        }
        self.adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(edge);
        true
    }

    /// Bulk-loads the snap index once all nodes are inserted.
    pub(crate) fn build_snap_index(&mut self) {
        let entries: Vec<IndexedPoint> = self
            .node_order
            .iter()
            .enumerate()
            .map(|(order, id)| {
                let node = &self.nodes[id];
                IndexedPoint::new([node.geometry.x(), node.geometry.y()], (id.clone(), order))
            })
            .collect();
        self.snap_index = RTree::bulk_load(entries);
    }

    pub(crate) fn adjacency_mut(&mut self) -> impl Iterator<Item = (&NodeId, &mut Vec<StreetEdge>)> {
        self.adjacency.iter_mut()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Outgoing edges of a node, in input order. Unknown ids yield an
    /// empty slice.
    #[must_use]
    pub fn edges(&self, id: &str) -> &[StreetEdge] {
        self.adjacency.get(id).map_or(&[], Vec::as_slice)
    }

    /// Whether a graph was actually loaded. Callers must check before
    /// searching: a failed load leaves the store empty, it never panics.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.nodes.is_empty()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Edges dropped at load time because their target was missing from
    /// the node table.
    #[must_use]
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    /// Node ids in first-encountered input order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.node_order.iter()
    }

    /// Nearest node to a coordinate by haversine distance.
    ///
    /// The R-tree yields candidates in planar degree order, which at
    /// non-zero latitudes can disagree with the haversine order because a
    /// longitude degree is shorter than a latitude degree. The walk keeps
    /// taking candidates until the planar lower bound on any remaining
    /// candidate's distance exceeds the best haversine distance found, so
    /// the pick is the true haversine minimum, ties resolved to the node
    /// loaded first. Equivalent to the linear scan over a bounded service
    /// area, just cheaper per call.
    #[must_use]
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Option<&Node> {
        let query = Point::new(lon, lat);
        // A planar degree distance d spans at least
        // d * (pi / 180) * R * cos(lat) meters: both components shrink by
        // no more than the longitude compression factor.
        let meters_per_degree = crate::EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let lower_bound_factor = meters_per_degree * lat.to_radians().cos().abs();

        let mut best: Option<(&Node, usize, f64)> = None;
        for (taken, entry) in self.snap_index.nearest_neighbor_iter(&[lon, lat]).enumerate() {
            if let Some((_, _, best_dist)) = best {
                let dx = entry.geom()[0] - lon;
                let dy = entry.geom()[1] - lat;
                let planar_floor = (dx * dx + dy * dy).sqrt() * lower_bound_factor;
                if taken >= NEAREST_CANDIDATES && planar_floor > best_dist {
                    break;
                }
            }

            let (id, order) = &entry.data;
            let node = &self.nodes[id];
            let dist = haversine_distance(node.geometry, query);
            let order = *order;
            let closer = match best {
                None => true,
                Some((_, best_order, best_dist)) => {
                    dist < best_dist || (dist == best_dist && order < best_order)
                }
            };
            if closer {
                best = Some((node, order, dist));
            }
        }

        best.map(|(node, _, _)| node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, lat: f64, lon: f64) -> Node {
        Node {
            id: id.to_string(),
            geometry: Point::new(lon, lat),
            static_weight: 1.0,
        }
    }

    fn edge(source: &str, target: &str) -> StreetEdge {
        StreetEdge {
            source: source.to_string(),
            target: target.to_string(),
            length_m: 100.0,
            base_weight: 5.0,
            road_class: crate::model::RoadClass::Unclassified,
        }
    }

    #[test]
    fn edge_with_missing_target_is_dropped() {
        let mut graph = StreetGraph::default();
        graph.insert_node(node("a", 43.65, -79.38));
        graph.insert_node(node("b", 43.66, -79.39));

        assert!(graph.insert_edge(edge("a", "b")));
        assert!(!graph.insert_edge(edge("a", "ghost")));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dropped_edges(), 1);
    }

    #[test]
    fn nearest_node_picks_haversine_minimum() {
        let mut graph = StreetGraph::default();
        graph.insert_node(node("far", 43.70, -79.38));
        graph.insert_node(node("near", 43.6540, -79.3830));
        graph.build_snap_index();

        let hit = graph.nearest_node(43.6532, -79.3832).unwrap();
        assert_eq!(hit.id, "near");
    }

    #[test]
    fn nearest_node_is_exact_where_planar_order_disagrees() {
        // At 80 degrees north a longitude degree spans ~19 km against
        // ~111 km for a latitude degree. The node 2 degrees east is the
        // haversine minimum (~39 km) even though every decoy a single
        // latitude degree away (~111 km) ranks ahead of it in planar
        // degree space.
        let mut graph = StreetGraph::default();
        for i in 0..10 {
            let offset = 1.0 + 0.1 * f64::from(i);
            graph.insert_node(node(&format!("decoy{i}"), 80.0 + offset, 0.0));
        }
        graph.insert_node(node("east", 80.0, 2.0));
        graph.build_snap_index();

        let hit = graph.nearest_node(80.0, 0.0).unwrap();
        assert_eq!(hit.id, "east");
    }

    #[test]
    fn empty_graph_is_not_ready() {
        let graph = StreetGraph::default();
        assert!(!graph.is_ready());
        assert!(graph.nearest_node(43.0, -79.0).is_none());
    }
}
