//! **wayfind-core**: the road-network graph shared by every wayfind crate.
//!
//! This crate provides geographic coordinates and distance functions, and
//! the immutable adjacency [`Graph`] that search strategies consume. Graphs
//! are assembled with [`GraphBuilder`], which validates edge weights and
//! weighs roads by great-circle distance.

pub mod geom;
pub mod graph;

pub use geom::{LatLng, METERS_PER_DEGREE, haversine, planar_meters};
pub use graph::{Graph, GraphBuilder, GraphError, Node, NodeId};
