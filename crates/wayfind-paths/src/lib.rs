//! Traced shortest-path search over road graphs.
//!
//! This crate runs one of three interchangeable strategies over a
//! [`wayfind_core::Graph`] and records not only the resulting path but the
//! full order in which nodes were finalized:
//!
//! - **BFS** hop-count search ([`PathFinder::bfs`])
//! - **Dijkstra** weighted shortest path ([`PathFinder::dijkstra`])
//! - **A\*** heuristic-guided shortest path ([`PathFinder::astar`],
//!   [`PathFinder::astar_with`])
//!
//! All strategies share a single traversal routine and differ only in how
//! they order their frontier. [`PathFinder`] owns and reuses its per-node
//! caches so that repeated queries avoid reallocating.
//!
//! # Example
//!
//! ```
//! use wayfind_core::{Graph, LatLng, Node};
//! use wayfind_paths::{Strategy, run};
//!
//! let graph = Graph::from_nodes([
//!     Node::new("A", LatLng::new(0.0, 0.0)).with_neighbor("B", 10.0),
//!     Node::new("B", LatLng::new(0.0, 1.0)).with_neighbor("C", 5.0),
//!     Node::new("C", LatLng::new(0.0, 2.0)),
//! ]);
//! let trace = run(&graph, "A", "C", Strategy::Dijkstra).unwrap();
//! assert_eq!(trace.path(), ["A", "B", "C"]);
//! assert_eq!(trace.cost(), 15.0);
//! ```

mod astar;
mod bfs;
mod dijkstra;
mod frontier;
mod heuristic;
mod pathfinder;
mod strategy;
mod trace;

#[cfg(test)]
pub(crate) mod fixtures;

pub use heuristic::{HaversineHeuristic, Heuristic, PlanarHeuristic};
pub use pathfinder::{PathFinder, run};
pub use strategy::{SearchError, Strategy};
pub use trace::{ASSUMED_SPEED_MPS, RouteSummary, SearchTrace};
