//! Small graphs shared by the unit tests.

use wayfind_core::{Graph, GraphBuilder, LatLng, NodeId};

pub(crate) fn ids(v: &[&str]) -> Vec<NodeId> {
    v.iter().map(|&s| NodeId::from(s)).collect()
}

/// `A --10-- B --5-- C` along the equator, edges in both directions.
pub(crate) fn line() -> Graph {
    let mut b = GraphBuilder::new();
    b.add_node("A", LatLng::new(0.0, 0.0))
        .add_node("B", LatLng::new(0.0, 1.0))
        .add_node("C", LatLng::new(0.0, 2.0));
    for (from, to, w) in [("A", "B", 10.0), ("B", "A", 10.0), ("B", "C", 5.0), ("C", "B", 5.0)] {
        b.add_edge(from, to, w).unwrap();
    }
    b.build()
}

/// Directed graph from `(from, to, weight)` triples. Coordinates are all
/// at the origin.
pub(crate) fn directed(edges: &[(&str, &str, f64)]) -> Graph {
    let mut b = GraphBuilder::new();
    for &(from, to, _) in edges {
        b.add_node(from, LatLng::default());
        b.add_node(to, LatLng::default());
    }
    for &(from, to, w) in edges {
        b.add_edge(from, to, w).unwrap();
    }
    b.build()
}
