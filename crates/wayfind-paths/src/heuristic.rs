use wayfind_core::{LatLng, haversine, planar_meters};

/// Estimated remaining cost between two coordinates, used to order the A*
/// frontier.
///
/// A* only returns minimum-cost paths when the estimate never exceeds the
/// real remaining cost (admissible). Nodes are never reopened once
/// finalized, so the estimate should also be consistent.
pub trait Heuristic {
    fn estimate(&self, from: LatLng, to: LatLng) -> f64;
}

impl<F: Fn(LatLng, LatLng) -> f64> Heuristic for F {
    fn estimate(&self, from: LatLng, to: LatLng) -> f64 {
        self(from, to)
    }
}

/// Euclidean distance on degrees scaled by 111 000 m per degree.
///
/// This is the default A* heuristic. It is cheap and close to great-circle
/// distance near the equator, but it ignores longitude convergence, so on
/// graphs weighted by real distances away from the equator it can
/// overestimate and A* may return a slightly longer path than Dijkstra.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarHeuristic;

impl Heuristic for PlanarHeuristic {
    #[inline]
    fn estimate(&self, from: LatLng, to: LatLng) -> f64 {
        planar_meters(from, to)
    }
}

/// Great-circle distance. Admissible for graphs whose edges are weighted by
/// great-circle length, as produced by `GraphBuilder::add_road`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HaversineHeuristic;

impl Heuristic for HaversineHeuristic {
    #[inline]
    fn estimate(&self, from: LatLng, to: LatLng) -> f64 {
        haversine(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_matches_scaled_degrees() {
        let h = PlanarHeuristic.estimate(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert_eq!(h, 111_000.0);
    }

    #[test]
    fn haversine_close_to_planar_at_equator() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.01);
        assert!(HaversineHeuristic.estimate(a, b) > PlanarHeuristic.estimate(a, b));
        assert!(HaversineHeuristic.estimate(a, b) < PlanarHeuristic.estimate(a, b) * 1.01);
    }

    #[test]
    fn closures_are_heuristics() {
        let zero = |_: LatLng, _: LatLng| 0.0;
        assert_eq!(zero.estimate(LatLng::new(1.0, 1.0), LatLng::default()), 0.0);
    }
}
