//! Frontier containers for the shared traversal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// The set of discovered-but-not-finalized nodes a search picks from.
pub(crate) trait Frontier {
    fn clear(&mut self);
    /// Add node `idx` with the given rank. Lower ranks pop first.
    fn push(&mut self, idx: usize, rank: f64);
    fn pop(&mut self) -> Option<usize>;
}

// ---------------------------------------------------------------------------
// FIFO (breadth-first)
// ---------------------------------------------------------------------------

/// First-in first-out queue. Ranks are ignored: discovery order is the
/// expansion order.
#[derive(Default)]
pub(crate) struct FifoFrontier {
    queue: VecDeque<usize>,
}

impl Frontier for FifoFrontier {
    fn clear(&mut self) {
        self.queue.clear();
    }

    fn push(&mut self, idx: usize, _rank: f64) {
        self.queue.push_back(idx);
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Min-heap (Dijkstra / A*)
// ---------------------------------------------------------------------------

/// Heap entry ordered by rank, ties broken by push order (FIFO).
#[derive(Clone, Copy, Debug)]
struct Entry {
    idx: usize,
    rank: f64,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the smallest rank, then
        // the earliest push.
        other
            .rank
            .total_cmp(&self.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority frontier with lazy deletion: a node may be pushed several times
/// as its label improves, and the traversal skips stale entries on pop.
#[derive(Default)]
pub(crate) struct HeapFrontier {
    heap: BinaryHeap<Entry>,
    seq: u64,
}

impl Frontier for HeapFrontier {
    fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }

    fn push(&mut self, idx: usize, rank: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Entry { idx, rank, seq });
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.idx)
    }
}
