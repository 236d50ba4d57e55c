//! Shared pieces of the `wayfind-demo` binary: a synthetic road grid, graph
//! loading from JSON, and a one-line text rendering of playback progress.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use wayfind_core::{Graph, GraphBuilder, LatLng, NodeId};
use wayfind_paths::SearchTrace;
use wayfind_replay::PlaybackState;

// ---------------------------------------------------------------------------
// Synthetic road grid
// ---------------------------------------------------------------------------

/// Shape of the generated road grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Coordinate of the top-left intersection.
    pub origin: LatLng,
    /// Distance between neighbouring intersections, in degrees.
    pub spacing_deg: f64,
    /// Intersections are moved by up to this fraction of the spacing.
    pub jitter: f64,
    /// Probability that a street segment is left out.
    pub drop_rate: f64,
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            cols: 24,
            origin: LatLng::new(0.0, 0.0),
            spacing_deg: 0.001,
            jitter: 0.2,
            drop_rate: 0.15,
            seed: 1,
        }
    }
}

impl GridConfig {
    /// Id of the intersection at `row`, `col`.
    pub fn node_id(row: usize, col: usize) -> NodeId {
        NodeId::new(format!("r{row}c{col}"))
    }

    /// Top-left and bottom-right intersections.
    pub fn corners(&self) -> (NodeId, NodeId) {
        (
            Self::node_id(0, 0),
            Self::node_id(self.rows.saturating_sub(1), self.cols.saturating_sub(1)),
        )
    }
}

/// Build a grid of two-way streets weighted by great-circle length, with a
/// seeded share of segments removed.
pub fn road_grid(cfg: &GridConfig) -> Graph {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut b = GraphBuilder::with_capacity(cfg.rows * cfg.cols);
    let wobble = cfg.spacing_deg * cfg.jitter.clamp(0.0, 0.49);
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            let mut coord = cfg
                .origin
                .shift(-(row as f64) * cfg.spacing_deg, col as f64 * cfg.spacing_deg);
            if wobble > 0.0 {
                coord = coord.shift(
                    rng.random_range(-wobble..=wobble),
                    rng.random_range(-wobble..=wobble),
                );
            }
            b.add_node(GridConfig::node_id(row, col), coord);
        }
    }
    let drop = cfg.drop_rate.clamp(0.0, 1.0);
    let mut roads = 0;
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            let here = GridConfig::node_id(row, col);
            let across = [(row, col + 1), (row + 1, col)];
            for (r, c) in across {
                if r >= cfg.rows || c >= cfg.cols || rng.random_bool(drop) {
                    continue;
                }
                let there = GridConfig::node_id(r, c);
                if b.add_road(here.as_str(), there.as_str()).is_ok() {
                    roads += 1;
                }
            }
        }
    }
    log::debug!("grid: {}x{} intersections, {roads} roads", cfg.rows, cfg.cols);
    b.build()
}

// ---------------------------------------------------------------------------
// Graph files
// ---------------------------------------------------------------------------

/// Failure to load a graph file.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "reading graph: {e}"),
            Self::Json(e) => write!(f, "parsing graph: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Parse a graph from its JSON document form.
pub fn parse_graph(json: &str) -> Result<Graph, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a graph from a JSON file.
pub fn load_graph(path: &Path) -> Result<Graph, LoadError> {
    let text = fs::read_to_string(path)?;
    let graph = parse_graph(&text)?;
    log::debug!(
        "loaded {} nodes, {} edges from {}",
        graph.len(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Resolve a node id, or a `lat,lng` pair snapped to the nearest node.
pub fn resolve_endpoint(graph: &Graph, spec: &str) -> Option<NodeId> {
    if let Some(node) = graph.get(spec) {
        return Some(node.id().clone());
    }
    let (lat, lng) = spec.split_once(',')?;
    let p = LatLng::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
    let (node, dist) = graph.nearest(p)?;
    log::debug!("snapped {p} to {} ({dist:.0} m away)", node.id());
    Some(node.id().clone())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Render playback as `[####......]  12/40 playing`.
pub fn progress_line(state: &PlaybackState, width: usize) -> String {
    let filled = ((state.progress() * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {:>5}/{} {}",
        "#".repeat(filled),
        ".".repeat(width - filled),
        state.revealed,
        state.total,
        state.phase
    )
}

/// One line per search: strategy, work done, and the route if any.
pub fn summary_line(trace: &SearchTrace) -> String {
    let route = match trace.summary() {
        Some(s) => format!("{} hops, {s}", trace.path().len().saturating_sub(1)),
        None => "no route".to_owned(),
    };
    format!("{:<8} visited {:>6}  {route}", trace.strategy(), trace.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_paths::Strategy;
    use wayfind_replay::Phase;

    #[test]
    fn full_grid_has_every_street() {
        let cfg = GridConfig {
            rows: 3,
            cols: 4,
            drop_rate: 0.0,
            ..GridConfig::default()
        };
        let g = road_grid(&cfg);
        assert_eq!(g.len(), 12);
        // Three rows of three segments, two rows of four, both directions.
        assert_eq!(g.edge_count(), 2 * (3 * 3 + 2 * 4));
        let (from, to) = cfg.corners();
        assert!(g.contains(from.as_str()));
        assert_eq!(to.as_str(), "r2c3");
    }

    #[test]
    fn grid_is_deterministic_per_seed() {
        let cfg = GridConfig::default();
        let a = road_grid(&cfg);
        let b = road_grid(&cfg);
        assert_eq!(a.edge_count(), b.edge_count());
        let ca: Vec<_> = a.nodes().map(|n| n.coord()).collect();
        let cb: Vec<_> = b.nodes().map(|n| n.coord()).collect();
        assert_eq!(ca, cb);
    }

    #[test]
    fn dropping_everything_leaves_isolated_nodes() {
        let cfg = GridConfig {
            rows: 2,
            cols: 2,
            drop_rate: 1.0,
            ..GridConfig::default()
        };
        let g = road_grid(&cfg);
        assert_eq!(g.len(), 4);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn parse_graph_document() {
        let g = parse_graph(r#"{"1": {"lat": 0.0, "lng": 0.0, "neighbors": {"2": 5.0}}, "2": {"lat": 0.0, "lng": 0.001}}"#)
            .unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.get("1").and_then(|n| n.weight_to("2")), Some(5.0));
        assert!(matches!(parse_graph("[1, 2]"), Err(LoadError::Json(_))));
    }

    #[test]
    fn negative_weight_document_is_rejected() {
        let err = parse_graph(r#"{"1": {"lat": 0.0, "lng": 0.0, "neighbors": {"2": -5.0}}, "2": {"lat": 0.0, "lng": 0.001}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().contains("invalid weight"), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_graph(Path::new("/nonexistent/wayfind/graph.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().starts_with("reading graph:"));
    }

    #[test]
    fn progress_line_rendering() {
        let s = PlaybackState {
            phase: Phase::Playing,
            revealed: 5,
            total: 20,
            speed_ms: 50,
        };
        assert_eq!(progress_line(&s, 8), "[##......]     5/20 playing");
        let done = PlaybackState {
            phase: Phase::Finished,
            revealed: 20,
            ..s
        };
        assert_eq!(progress_line(&done, 4), "[####]    20/20 finished");
    }

    #[test]
    fn endpoints_by_id_or_coordinate() {
        let cfg = GridConfig {
            rows: 3,
            cols: 4,
            jitter: 0.0,
            drop_rate: 0.0,
            ..GridConfig::default()
        };
        let g = road_grid(&cfg);
        assert_eq!(resolve_endpoint(&g, "r1c2").map(|id| id.to_string()), Some("r1c2".into()));
        assert_eq!(
            resolve_endpoint(&g, "-0.0021, 0.0029").map(|id| id.to_string()),
            Some("r2c3".into())
        );
        assert_eq!(resolve_endpoint(&g, "nowhere"), None);
        assert_eq!(resolve_endpoint(&g, "1.0,east"), None);
        assert_eq!(resolve_endpoint(&Graph::new(), "0,0"), None);
    }

    #[test]
    fn summary_lines() {
        let found = SearchTrace::new(
            Strategy::Dijkstra,
            vec!["a".into(), "b".into(), "c".into()],
            vec!["a".into(), "c".into()],
            1234.0,
        );
        assert_eq!(summary_line(&found), "dijkstra visited      3  1 hops, 1.23 km, 2 min 3 s");
        let lost = SearchTrace::new(Strategy::Bfs, vec!["a".into()], Vec::new(), f64::INFINITY);
        assert_eq!(summary_line(&lost), "bfs      visited      1  no route");
    }
}
