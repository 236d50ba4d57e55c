//! The road-network adjacency structure: [`NodeId`], [`Node`], [`Graph`]
//! and [`GraphBuilder`].
//!
//! A [`Graph`] is read-only once built. Node and neighbor iteration follow
//! insertion order, so every search over the same graph visits nodes in the
//! same order.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;

use crate::geom::{LatLng, haversine};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable identifier of a graph node.
///
/// Numeric map identifiers are stored in their decimal string form so that
/// every identifier compares and hashes the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    /// Create an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A graph vertex: identifier, coordinate and outgoing weighted edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    coord: LatLng,
    neighbors: IndexMap<NodeId, f64>,
}

impl Node {
    /// Create a node with no outgoing edges.
    pub fn new(id: impl Into<NodeId>, coord: LatLng) -> Self {
        Self {
            id: id.into(),
            coord,
            neighbors: IndexMap::new(),
        }
    }

    /// Add (or re-weigh) an outgoing edge without any validation.
    ///
    /// The neighbor does not have to exist in the graph the node ends up
    /// in. Use [`GraphBuilder`] for checked construction.
    pub fn with_neighbor(mut self, id: impl Into<NodeId>, weight: f64) -> Self {
        self.neighbors.insert(id.into(), weight);
        self
    }

    #[inline]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[inline]
    pub fn coord(&self) -> LatLng {
        self.coord
    }

    /// Outgoing edges in insertion order.
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = (&NodeId, f64)> + '_ {
        self.neighbors.iter().map(|(id, &w)| (id, w))
    }

    /// Number of outgoing edges.
    #[inline]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Weight of the edge to `id`, if there is one.
    pub fn weight_to(&self, id: &str) -> Option<f64> {
        self.neighbors.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Immutable weighted adjacency over geographic nodes.
///
/// Lookups for absent identifiers return `None`. Edges may point at
/// identifiers that have no node (a partial upstream extract); consumers
/// are expected to skip those.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a graph from raw nodes without validating edges.
    ///
    /// A node whose identifier repeats an earlier one replaces it in place.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        Self { nodes }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of directed edges, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::degree).sum()
    }

    /// Look up a node by identifier.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Dense index of `id` in insertion order.
    #[inline]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// The node at a dense index.
    #[inline]
    pub fn node_at(&self, idx: usize) -> Option<&Node> {
        self.nodes.get_index(idx).map(|(_, n)| n)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Outgoing edges of `id`, or `None` if the node is absent.
    pub fn neighbors(&self, id: &str) -> Option<impl ExactSizeIterator<Item = (&NodeId, f64)> + '_> {
        self.get(id).map(Node::neighbors)
    }

    /// Node closest to `p` by great-circle distance, with that distance.
    ///
    /// Ties go to the node inserted first.
    pub fn nearest(&self, p: LatLng) -> Option<(&Node, f64)> {
        let mut best: Option<(&Node, f64)> = None;
        for n in self.nodes.values() {
            let d = haversine(p, n.coord);
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((n, d)),
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Errors raised while building a [`Graph`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An edge endpoint was never added with [`GraphBuilder::add_node`].
    UnknownNode(NodeId),
    /// Edge weights must be finite and non-negative.
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "graph: unknown node \u{201c}{id}\u{201d}"),
            Self::InvalidWeight { from, to, weight } => {
                write!(f, "graph: invalid weight {weight} on edge {from} -> {to}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Checked, incremental construction of a [`Graph`].
///
/// Mirrors how road extracts are turned into graphs: nodes first, then
/// ways whose consecutive nodes become undirected edges weighted by
/// great-circle distance.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    nodes: IndexMap<NodeId, Node>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: IndexMap::with_capacity(n),
        }
    }

    /// Add a node. Re-adding an identifier moves it to `coord` and keeps
    /// its edges.
    pub fn add_node(&mut self, id: impl Into<NodeId>, coord: LatLng) -> &mut Self {
        let id = id.into();
        match self.nodes.get_mut(id.as_str()) {
            Some(n) => n.coord = coord,
            None => {
                self.nodes.insert(id.clone(), Node::new(id, coord));
            }
        }
        self
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a directed edge `from -> to`.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) -> Result<(), GraphError> {
        if !self.nodes.contains_key(to) {
            return Err(GraphError::UnknownNode(to.into()));
        }
        let Some(node) = self.nodes.get_mut(from) else {
            return Err(GraphError::UnknownNode(from.into()));
        };
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: from.into(),
                to: to.into(),
                weight,
            });
        }
        node.neighbors.insert(to.into(), weight);
        Ok(())
    }

    /// Add an undirected road between `a` and `b`, weighted by great-circle
    /// distance. Returns the weight.
    pub fn add_road(&mut self, a: &str, b: &str) -> Result<f64, GraphError> {
        let (Some(na), Some(nb)) = (self.nodes.get(a), self.nodes.get(b)) else {
            let missing = if self.nodes.contains_key(a) { b } else { a };
            return Err(GraphError::UnknownNode(missing.into()));
        };
        let w = haversine(na.coord, nb.coord);
        self.add_edge(a, b, w)?;
        self.add_edge(b, a, w)?;
        Ok(w)
    }

    /// Connect consecutive nodes of a way with undirected roads.
    ///
    /// Segments touching an unknown node are skipped. Returns the number of
    /// segments added.
    pub fn add_way<I: AsRef<str>>(&mut self, way: &[I]) -> usize {
        let mut added = 0;
        for pair in way.windows(2) {
            let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
            match self.add_road(a, b) {
                Ok(_) => added += 1,
                Err(e) => log::trace!("skipping way segment {a} -> {b}: {e}"),
            }
        }
        added
    }

    /// Finish building.
    pub fn build(self) -> Graph {
        Graph { nodes: self.nodes }
    }
}

// ---------------------------------------------------------------------------
// Serde: `{ "<id>": { "lat": .., "lng": .., "neighbors": { "<id>": w } } }`
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct NodeRepr {
    lat: f64,
    lng: f64,
    #[serde(default)]
    neighbors: IndexMap<NodeId, f64>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Graph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for (id, n) in &self.nodes {
            let repr = NodeRepr {
                lat: n.coord.lat,
                lng: n.coord.lng,
                neighbors: n.neighbors.clone(),
            };
            map.serialize_entry(id, &repr)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Graph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <IndexMap<NodeId, NodeRepr> as serde::Deserialize>::deserialize(deserializer)?;
        let mut nodes = IndexMap::with_capacity(raw.len());
        for (id, r) in raw {
            if let Some((to, &weight)) = r.neighbors.iter().find(|&(_, &w)| !w.is_finite() || w < 0.0) {
                let err = GraphError::InvalidWeight {
                    from: id,
                    to: to.clone(),
                    weight,
                };
                return Err(serde::de::Error::custom(err));
            }
            let node = Node {
                id: id.clone(),
                coord: LatLng::new(r.lat, r.lng),
                neighbors: r.neighbors,
            };
            nodes.insert(id, node);
        }
        Ok(Graph { nodes })
    }
}
