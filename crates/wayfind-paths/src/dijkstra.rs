use std::mem;

use wayfind_core::Graph;

use crate::PathFinder;
use crate::pathfinder::{Label, SearchPolicy};
use crate::strategy::{SearchError, Strategy};
use crate::trace::SearchTrace;

/// Expand by tentative distance; only a strictly cheaper route relabels.
struct Dijkstra;

impl SearchPolicy for Dijkstra {
    fn rank(&self, _graph: &Graph, _idx: usize, cost: f64, _hops: u32) -> f64 {
        cost
    }

    fn improves(&self, cost: f64, _hops: u32, current: &Label) -> bool {
        cost < current.cost
    }
}

impl PathFinder {
    /// Compute the minimum-weight path from `source` to `target` using
    /// Dijkstra's algorithm.
    ///
    /// The search stops as soon as the target is finalized. Edge weights
    /// must be non-negative.
    pub fn dijkstra(&mut self, graph: &Graph, source: &str, target: &str) -> Result<SearchTrace, SearchError> {
        let Some(ends) = Self::endpoints(graph, source, target)? else {
            return Ok(SearchTrace::unreachable(Strategy::Dijkstra));
        };
        let mut heap = mem::take(&mut self.heap);
        let trace = self.search(graph, ends, Strategy::Dijkstra, &Dijkstra, &mut heap);
        self.heap = heap;
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{directed, ids};

    #[test]
    fn cheaper_route_relabels() {
        let g = directed(&[("A", "B", 5.0), ("A", "C", 1.0), ("C", "B", 1.0)]);
        let t = PathFinder::new().dijkstra(&g, "A", "B").unwrap();
        assert_eq!(t.path(), ids(&["A", "C", "B"]).as_slice());
        assert_eq!(t.cost(), 2.0);
        assert_eq!(t.visited_order(), ids(&["A", "C", "B"]).as_slice());
    }

    #[test]
    fn equal_cost_keeps_first_parent() {
        let g = directed(&[
            ("A", "B", 1.0),
            ("A", "C", 1.0),
            ("B", "D", 1.0),
            ("C", "D", 1.0),
        ]);
        let t = PathFinder::new().dijkstra(&g, "A", "D").unwrap();
        assert_eq!(t.path(), ids(&["A", "B", "D"]).as_slice());
        assert_eq!(t.visited_order(), ids(&["A", "B", "C", "D"]).as_slice());
    }

    #[test]
    fn ties_follow_discovery_order() {
        let g = directed(&[("S", "z", 2.0), ("S", "y", 2.0), ("S", "x", 2.0)]);
        let t = PathFinder::new().dijkstra(&g, "S", "none").unwrap();
        assert_eq!(t.visited_order(), ids(&["S", "z", "y", "x"]).as_slice());
    }

    #[test]
    fn stops_when_target_finalized() {
        let g = directed(&[("A", "B", 1.0), ("A", "C", 3.0), ("C", "D", 1.0)]);
        let t = PathFinder::new().dijkstra(&g, "A", "B").unwrap();
        assert_eq!(t.visited_order(), ids(&["A", "B"]).as_slice());
    }

    #[test]
    fn zero_weight_edges() {
        let g = directed(&[("A", "B", 0.0), ("B", "C", 0.0), ("A", "C", 1.0)]);
        let t = PathFinder::new().dijkstra(&g, "A", "C").unwrap();
        assert_eq!(t.path(), ids(&["A", "B", "C"]).as_slice());
        assert_eq!(t.cost(), 0.0);
    }
}
