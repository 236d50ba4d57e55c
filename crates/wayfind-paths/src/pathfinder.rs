use wayfind_core::{Graph, NodeId};

use crate::frontier::{FifoFrontier, Frontier, HeapFrontier};
use crate::strategy::{SearchError, Strategy};
use crate::trace::SearchTrace;

// ---------------------------------------------------------------------------
// Per-node search labels
// ---------------------------------------------------------------------------

/// Parent sentinel: the node has no predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

#[derive(Clone, Debug)]
pub(crate) struct Label {
    /// Summed edge weight from the source along the parent chain.
    pub(crate) cost: f64,
    /// Edge count from the source along the parent chain.
    pub(crate) hops: u32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    /// Discovered but not finalized.
    pub(crate) open: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            hops: 0,
            parent: NO_PARENT,
            generation: 0,
            open: false,
        }
    }
}

/// What distinguishes one strategy from another in the shared traversal.
pub(crate) trait SearchPolicy {
    /// Frontier rank of node `idx` reached with `cost` and `hops`.
    fn rank(&self, graph: &Graph, idx: usize, cost: f64, hops: u32) -> f64;

    /// Whether a new route to an already discovered, still open node
    /// replaces its label.
    fn improves(&self, cost: f64, hops: u32, current: &Label) -> bool;

    /// Stop once node `idx` has been finalized.
    fn is_goal(&self, idx: usize, goal: Option<usize>) -> bool {
        Some(idx) == goal
    }
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Runs traced searches over [`Graph`]s.
///
/// `PathFinder` owns the per-node labels and frontiers so that repeated
/// searches over graphs of similar size do not reallocate. Labels are
/// invalidated lazily with a generation counter.
#[derive(Default)]
pub struct PathFinder {
    pub(crate) labels: Vec<Label>,
    pub(crate) generation: u32,
    pub(crate) fifo: FifoFrontier,
    pub(crate) heap: HeapFrontier,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `PathFinder` with label storage for `n` nodes.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            labels: vec![Label::default(); n],
            ..Self::default()
        }
    }

    /// Run `strategy` from `source` to `target`.
    ///
    /// An absent or unreachable `target` is a normal outcome: the trace
    /// then holds every node reachable from `source`, an empty path and an
    /// infinite cost. An empty graph yields an empty trace. A `source` that
    /// is absent from a non-empty graph is an error.
    pub fn run(
        &mut self,
        graph: &Graph,
        source: &str,
        target: &str,
        strategy: Strategy,
    ) -> Result<SearchTrace, SearchError> {
        match strategy {
            Strategy::Bfs => self.bfs(graph, source, target),
            Strategy::Dijkstra => self.dijkstra(graph, source, target),
            Strategy::AStar => self.astar(graph, source, target),
        }
    }

    /// Resolve endpoints to dense indices. `Ok(None)` means the graph is
    /// empty and there is nothing to search.
    pub(crate) fn endpoints(
        graph: &Graph,
        source: &str,
        target: &str,
    ) -> Result<Option<(usize, Option<usize>)>, SearchError> {
        if graph.is_empty() {
            return Ok(None);
        }
        let si = graph
            .index_of(source)
            .ok_or_else(|| SearchError::UnknownSource(source.into()))?;
        Ok(Some((si, graph.index_of(target))))
    }

    /// Run the shared traversal with `policy` over `frontier` and package
    /// the result. `si` and `goal` come from [`endpoints`](Self::endpoints).
    pub(crate) fn search<F: Frontier, P: SearchPolicy>(
        &mut self,
        graph: &Graph,
        (si, goal): (usize, Option<usize>),
        strategy: Strategy,
        policy: &P,
        frontier: &mut F,
    ) -> SearchTrace {
        let visited = self.traverse(graph, si, goal, policy, frontier);

        let (path, cost) = self.reconstruct(graph, si, goal);
        let visited: Vec<NodeId> = visited.into_iter().map(|i| id_at(graph, i)).collect();

        log::debug!(
            "{strategy}: finalized {} nodes, path of {} nodes, cost {cost}",
            visited.len(),
            path.len()
        );
        SearchTrace::new(strategy, visited, path, cost)
    }

    /// The traversal shared by every strategy.
    ///
    /// Pops the best frontier node, finalizes it, stops if it is the goal,
    /// and otherwise relaxes its outgoing edges. Finalized nodes are never
    /// reopened and edges to identifiers missing from the graph are
    /// skipped. Returns node indices in finalize order.
    pub(crate) fn traverse<F: Frontier, P: SearchPolicy>(
        &mut self,
        graph: &Graph,
        source: usize,
        goal: Option<usize>,
        policy: &P,
        frontier: &mut F,
    ) -> Vec<usize> {
        let cur_gen = self.next_generation(graph.len());
        frontier.clear();

        self.labels[source] = Label {
            cost: 0.0,
            hops: 0,
            parent: NO_PARENT,
            generation: cur_gen,
            open: true,
        };
        frontier.push(source, policy.rank(graph, source, 0.0, 0));

        let mut visited = Vec::new();

        while let Some(ci) = frontier.pop() {
            let current = &mut self.labels[ci];
            // Skip stale entries.
            if current.generation != cur_gen || !current.open {
                continue;
            }
            current.open = false;
            let (cost, hops) = (current.cost, current.hops);
            visited.push(ci);

            if policy.is_goal(ci, goal) {
                break;
            }

            let Some(node) = graph.node_at(ci) else {
                continue;
            };
            for (nid, weight) in node.neighbors() {
                let Some(ni) = graph.index_of(nid.as_str()) else {
                    log::trace!("skipping dangling edge {} -> {nid}", node.id());
                    continue;
                };
                let tentative = cost + weight;
                if !tentative.is_finite() {
                    log::trace!("skipping edge {} -> {nid}: cost overflows", node.id());
                    continue;
                }
                let n = &mut self.labels[ni];
                if n.generation == cur_gen && (!n.open || !policy.improves(tentative, hops + 1, n)) {
                    continue;
                }
                *n = Label {
                    cost: tentative,
                    hops: hops + 1,
                    parent: ci,
                    generation: cur_gen,
                    open: true,
                };
                frontier.push(ni, policy.rank(graph, ni, tentative, hops + 1));
            }
        }

        visited
    }

    /// Walk parent pointers back from the goal. Returns an empty path and
    /// infinite cost if the goal was not finalized or the chain does not
    /// lead back to `source`.
    fn reconstruct(&self, graph: &Graph, source: usize, goal: Option<usize>) -> (Vec<NodeId>, f64) {
        let unreachable = (Vec::new(), f64::INFINITY);
        let Some(gi) = goal else {
            return unreachable;
        };
        let gl = &self.labels[gi];
        if gl.generation != self.generation || gl.open {
            return unreachable;
        }

        let mut path = Vec::new();
        let mut ci = gi;
        loop {
            path.push(id_at(graph, ci));
            if ci == source {
                break;
            }
            ci = self.labels[ci].parent;
            if ci == NO_PARENT {
                return unreachable;
            }
        }
        path.reverse();
        (path, gl.cost)
    }

    /// Bump the generation and make sure there is a label for every node.
    fn next_generation(&mut self, len: usize) -> u32 {
        if self.labels.len() < len {
            self.labels.resize(len, Label::default());
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: labels from 2^32 searches ago would look current.
            for l in self.labels.iter_mut() {
                l.generation = 0;
            }
            self.generation = 1;
        }
        self.generation
    }
}

fn id_at(graph: &Graph, idx: usize) -> NodeId {
    graph
        .node_at(idx)
        .map(|n| n.id().clone())
        .unwrap_or_default()
}

/// Run `strategy` on `graph` with a throw-away [`PathFinder`].
pub fn run(graph: &Graph, source: &str, target: &str, strategy: Strategy) -> Result<SearchTrace, SearchError> {
    PathFinder::with_capacity(graph.len()).run(graph, source, target, strategy)
}
