//! Search output: [`SearchTrace`] and [`RouteSummary`].

use std::fmt;
use std::time::Duration;

use wayfind_core::NodeId;

use crate::strategy::Strategy;

/// Travel speed used to turn a route length into an estimated duration.
pub const ASSUMED_SPEED_MPS: f64 = 10.0;

/// The complete, read-only output of one search.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchTrace {
    strategy: Strategy,
    visited: Vec<NodeId>,
    path: Vec<NodeId>,
    #[cfg_attr(feature = "serde", serde(with = "cost_or_null"))]
    cost: f64,
}

impl SearchTrace {
    /// Assemble a trace from its parts. Searches build these through
    /// [`PathFinder`](crate::PathFinder); this is for replaying stored ones.
    pub fn new(strategy: Strategy, visited: Vec<NodeId>, path: Vec<NodeId>, cost: f64) -> Self {
        Self {
            strategy,
            visited,
            path,
            cost,
        }
    }

    /// A trace that expanded nothing and found no path.
    pub(crate) fn unreachable(strategy: Strategy) -> Self {
        Self::new(strategy, Vec::new(), Vec::new(), f64::INFINITY)
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Nodes in the order they were finalized. Never contains duplicates.
    #[inline]
    pub fn visited_order(&self) -> &[NodeId] {
        &self.visited
    }

    /// Source-to-target path, empty if the target was not reached.
    #[inline]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Summed edge weight along [`path`](Self::path), or `f64::INFINITY`
    /// when there is no path.
    ///
    /// For BFS this is the weight of the hop-minimal path found, not the
    /// minimum weight between the endpoints.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of finalized nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Human-readable distance and duration, `None` without a path.
    pub fn summary(&self) -> Option<RouteSummary> {
        self.is_found().then(|| RouteSummary::new(self.cost))
    }
}

/// Route length with an estimated travel time at [`ASSUMED_SPEED_MPS`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration: Duration,
}

impl RouteSummary {
    pub fn new(distance_m: f64) -> Self {
        let secs = (distance_m / ASSUMED_SPEED_MPS).round().max(0.0);
        Self {
            distance_m,
            duration: Duration::from_secs(secs as u64),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distance_m > 1000.0 {
            write!(f, "{:.2} km", self.distance_m / 1000.0)?;
        } else {
            write!(f, "{} m", self.distance_m.round() as u64)?;
        }
        let secs = self.duration.as_secs();
        if secs > 60 {
            write!(f, ", {} min {} s", secs / 60, secs % 60)
        } else {
            write!(f, ", {secs} s")
        }
    }
}

/// Non-finite costs travel as JSON `null`.
#[cfg(feature = "serde")]
mod cost_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cost: &f64, s: S) -> Result<S::Ok, S::Error> {
        if cost.is_finite() {
            s.serialize_some(cost)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<NodeId> {
        v.iter().map(|&s| NodeId::from(s)).collect()
    }

    #[test]
    fn unreachable_trace() {
        let t = SearchTrace::unreachable(Strategy::Bfs);
        assert!(t.is_empty());
        assert!(!t.is_found());
        assert_eq!(t.cost(), f64::INFINITY);
        assert!(t.summary().is_none());
    }

    #[test]
    fn summary_short_route() {
        let t = SearchTrace::new(Strategy::Dijkstra, ids(&["A", "B"]), ids(&["A", "B"]), 449.6);
        let s = t.summary().unwrap();
        assert_eq!(s.duration, Duration::from_secs(45));
        assert_eq!(s.to_string(), "450 m, 45 s");
    }

    #[test]
    fn summary_long_route() {
        let s = RouteSummary::new(1234.0);
        assert_eq!(s.duration, Duration::from_secs(123));
        assert_eq!(s.to_string(), "1.23 km, 2 min 3 s");
    }

    #[test]
    fn summary_boundaries() {
        assert_eq!(RouteSummary::new(1000.0).to_string(), "1000 m, 1 min 40 s");
        assert_eq!(RouteSummary::new(600.0).to_string(), "600 m, 60 s");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn found_trace_round_trip() {
        let t = SearchTrace::new(
            Strategy::AStar,
            vec!["A".into(), "C".into()],
            vec!["A".into(), "C".into()],
            7.5,
        );
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r#""strategy":"astar""#));
        let back: SearchTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn infinite_cost_is_null() {
        let t = SearchTrace::unreachable(Strategy::Dijkstra);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r#""cost":null"#));
        let back: SearchTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cost(), f64::INFINITY);
    }
}
