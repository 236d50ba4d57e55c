use std::mem;

use wayfind_core::Graph;

use crate::PathFinder;
use crate::pathfinder::{Label, SearchPolicy};
use crate::strategy::{SearchError, Strategy};
use crate::trace::SearchTrace;

/// Expand in discovery order; the first route found to a node is kept.
struct Bfs;

impl SearchPolicy for Bfs {
    fn rank(&self, _graph: &Graph, _idx: usize, _cost: f64, hops: u32) -> f64 {
        f64::from(hops)
    }

    fn improves(&self, _cost: f64, _hops: u32, _current: &Label) -> bool {
        false
    }
}

impl PathFinder {
    /// Breadth-first search from `source` to `target`.
    ///
    /// The returned path has the fewest edges. Its cost is the summed edge
    /// weight along that path, which is not necessarily the lightest route
    /// between the endpoints.
    pub fn bfs(&mut self, graph: &Graph, source: &str, target: &str) -> Result<SearchTrace, SearchError> {
        let Some(ends) = Self::endpoints(graph, source, target)? else {
            return Ok(SearchTrace::unreachable(Strategy::Bfs));
        };
        let mut fifo = mem::take(&mut self.fifo);
        let trace = self.search(graph, ends, Strategy::Bfs, &Bfs, &mut fifo);
        self.fifo = fifo;
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{directed, ids};

    #[test]
    fn fewest_hops_not_lightest() {
        let g = directed(&[("A", "B", 1.0), ("A", "C", 10.0), ("B", "C", 1.0)]);
        let t = PathFinder::new().bfs(&g, "A", "C").unwrap();
        assert_eq!(t.path(), ids(&["A", "C"]).as_slice());
        assert_eq!(t.cost(), 10.0);
        assert_eq!(t.visited_order(), ids(&["A", "B", "C"]).as_slice());
        assert_eq!(t.strategy(), Strategy::Bfs);
    }

    #[test]
    fn expands_level_by_level() {
        // Two levels below S; level one discovered in adjacency order.
        let g = directed(&[
            ("S", "b", 5.0),
            ("S", "a", 1.0),
            ("a", "d", 1.0),
            ("b", "c", 1.0),
            ("c", "x", 1.0),
        ]);
        let t = PathFinder::new().bfs(&g, "S", "zzz").unwrap();
        assert_eq!(t.visited_order(), ids(&["S", "b", "a", "c", "d", "x"]).as_slice());
    }

    #[test]
    fn first_discovery_keeps_parent() {
        // D is reached through B first; the lighter route through C does
        // not replace it.
        let g = directed(&[
            ("A", "B", 1.0),
            ("A", "C", 1.0),
            ("B", "D", 9.0),
            ("C", "D", 1.0),
        ]);
        let t = PathFinder::new().bfs(&g, "A", "D").unwrap();
        assert_eq!(t.path(), ids(&["A", "B", "D"]).as_slice());
        assert_eq!(t.cost(), 10.0);
    }
}
