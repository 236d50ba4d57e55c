use std::mem;

use wayfind_core::{Graph, LatLng};

use crate::PathFinder;
use crate::heuristic::{Heuristic, PlanarHeuristic};
use crate::pathfinder::{Label, SearchPolicy};
use crate::strategy::{SearchError, Strategy};
use crate::trace::SearchTrace;

/// Expand by tentative distance plus the heuristic estimate to the target.
struct AStar<'h, H> {
    heuristic: &'h H,
    /// `None` when the target is not in the graph; the estimate is then 0.
    target: Option<LatLng>,
}

impl<H: Heuristic> SearchPolicy for AStar<'_, H> {
    fn rank(&self, graph: &Graph, idx: usize, cost: f64, _hops: u32) -> f64 {
        let estimate = match (self.target, graph.node_at(idx)) {
            (Some(to), Some(node)) => self.heuristic.estimate(node.coord(), to),
            _ => 0.0,
        };
        cost + estimate
    }

    fn improves(&self, cost: f64, _hops: u32, current: &Label) -> bool {
        cost < current.cost
    }
}

impl PathFinder {
    /// Compute the shortest path from `source` to `target` using A* with
    /// the [`PlanarHeuristic`].
    pub fn astar(&mut self, graph: &Graph, source: &str, target: &str) -> Result<SearchTrace, SearchError> {
        self.astar_with(graph, source, target, &PlanarHeuristic)
    }

    /// Compute the shortest path from `source` to `target` using A* with a
    /// caller-supplied heuristic.
    ///
    /// The path is minimal in weight only if `heuristic` is admissible and
    /// consistent for `graph`.
    pub fn astar_with<H: Heuristic>(
        &mut self,
        graph: &Graph,
        source: &str,
        target: &str,
        heuristic: &H,
    ) -> Result<SearchTrace, SearchError> {
        let Some(ends) = Self::endpoints(graph, source, target)? else {
            return Ok(SearchTrace::unreachable(Strategy::AStar));
        };
        let policy = AStar {
            heuristic,
            target: graph.get(target).map(|n| n.coord()),
        };
        let mut heap = mem::take(&mut self.heap);
        let trace = self.search(graph, ends, Strategy::AStar, &policy, &mut heap);
        self.heap = heap;
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use wayfind_core::{GraphBuilder, LatLng};

    use super::*;
    use crate::HaversineHeuristic;
    use crate::fixtures::{directed, ids, line};

    /// S has a cheap branch heading west, away from T, and a direct edge
    /// east to T.
    fn decoys() -> Graph {
        let mut b = GraphBuilder::new();
        b.add_node("S", LatLng::new(0.0, 0.0))
            .add_node("T", LatLng::new(0.0, 0.01))
            .add_node("W1", LatLng::new(0.0, -0.001))
            .add_node("W2", LatLng::new(0.0, -0.002))
            .add_node("W3", LatLng::new(0.0, -0.003));
        for (from, to, w) in [
            ("S", "W1", 100.0),
            ("W1", "W2", 100.0),
            ("W2", "W3", 100.0),
            ("S", "T", 1200.0),
        ] {
            b.add_edge(from, to, w).unwrap();
        }
        b.build()
    }

    #[test]
    fn heuristic_prunes_expansion() {
        let g = decoys();
        let mut pf = PathFinder::new();
        let d = pf.dijkstra(&g, "S", "T").unwrap();
        let a = pf.astar(&g, "S", "T").unwrap();
        assert_eq!(d.visited_order(), ids(&["S", "W1", "W2", "W3", "T"]).as_slice());
        assert_eq!(a.visited_order(), ids(&["S", "T"]).as_slice());
        assert_eq!(a.path(), d.path());
        assert_eq!(a.cost(), 1200.0);
        assert_eq!(a.strategy(), Strategy::AStar);
    }

    #[test]
    fn zero_heuristic_matches_dijkstra() {
        let g = decoys();
        let mut pf = PathFinder::new();
        let d = pf.dijkstra(&g, "S", "T").unwrap();
        let a = pf
            .astar_with(&g, "S", "T", &|_: LatLng, _: LatLng| 0.0)
            .unwrap();
        assert_eq!(a.visited_order(), d.visited_order());
        assert_eq!(a.path(), d.path());
        assert_eq!(a.cost(), d.cost());
    }

    #[test]
    fn absent_target_searches_exhaustively() {
        let t = PathFinder::new().astar(&decoys(), "S", "nowhere").unwrap();
        assert_eq!(t.len(), 5);
        assert!(!t.is_found());
    }

    #[test]
    fn single_route_line_graph() {
        let t = PathFinder::new().astar(&line(), "A", "C").unwrap();
        assert_eq!(t.path(), ids(&["A", "B", "C"]).as_slice());
        assert_eq!(t.cost(), 15.0);
    }

    #[test]
    fn haversine_heuristic_on_road_weights() {
        // A small grid of roads weighted by great-circle length.
        let mut b = GraphBuilder::new();
        for r in 0..4 {
            for c in 0..4 {
                b.add_node(format!("{r}-{c}"), LatLng::new(45.0 + r as f64 * 0.001, 7.0 + c as f64 * 0.0013));
            }
        }
        for r in 0..4 {
            for c in 0..4 {
                if c + 1 < 4 {
                    b.add_road(&format!("{r}-{c}"), &format!("{r}-{}", c + 1)).unwrap();
                }
                if r + 1 < 4 {
                    b.add_road(&format!("{r}-{c}"), &format!("{}-{c}", r + 1)).unwrap();
                }
            }
        }
        let g = b.build();
        let mut pf = PathFinder::new();
        let d = pf.dijkstra(&g, "0-0", "3-3").unwrap();
        let a = pf.astar_with(&g, "0-0", "3-3", &HaversineHeuristic).unwrap();
        assert!((a.cost() - d.cost()).abs() < 1e-6);
        assert!(a.len() <= d.len());
        assert_eq!(a.path().len(), 7);
    }

    #[test]
    fn unreachable_target_is_empty_path() {
        let g = directed(&[("A", "B", 1.0), ("C", "A", 1.0)]);
        let t = PathFinder::new().astar(&g, "A", "C").unwrap();
        assert!(t.path().is_empty());
        assert_eq!(t.visited_order(), ids(&["A", "B"]).as_slice());
    }
}
