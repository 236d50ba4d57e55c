use std::fmt;
use std::str::FromStr;

use wayfind_core::NodeId;

/// The search strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Breadth-first search: minimum hop count.
    Bfs,
    /// Dijkstra: minimum total edge weight.
    Dijkstra,
    /// A*: minimum total edge weight, frontier guided by a heuristic.
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Bfs, Strategy::Dijkstra, Strategy::AStar];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
        }
    }

    /// Whether the returned cost is guaranteed minimal in edge weight.
    ///
    /// BFS minimizes hops; its reported cost is the summed weight of the
    /// hop-minimal path it found, which may be heavier than the lightest one.
    pub fn is_weight_optimal(self) -> bool {
        !matches!(self, Self::Bfs)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dijkstra" => Ok(Self::Dijkstra),
            "astar" | "a*" => Ok(Self::AStar),
            _ => Err(SearchError::UnknownStrategy(s.to_owned())),
        }
    }
}

/// Invalid search input.
///
/// An absent or unreachable target is not an error: it yields a trace with
/// an empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The source identifier is not a node of a non-empty graph.
    UnknownSource(NodeId),
    /// The strategy name is not one of `bfs`, `dijkstra`, `astar`.
    UnknownStrategy(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSource(id) => write!(f, "search: source node \u{201c}{id}\u{201d} is not in the graph"),
            Self::UnknownStrategy(s) => {
                write!(f, "search: unknown strategy \u{201c}{s}\u{201d} (expected bfs, dijkstra or astar)")
            }
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("bfs".parse::<Strategy>(), Ok(Strategy::Bfs));
        assert_eq!("Dijkstra".parse::<Strategy>(), Ok(Strategy::Dijkstra));
        assert_eq!(" astar ".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!("A*".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!(
            "dfs".parse::<Strategy>(),
            Err(SearchError::UnknownStrategy("dfs".into()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>(), Ok(s));
        }
    }

    #[test]
    fn only_bfs_is_not_weight_optimal() {
        assert!(!Strategy::Bfs.is_weight_optimal());
        assert!(Strategy::Dijkstra.is_weight_optimal());
        assert!(Strategy::AStar.is_weight_optimal());
    }
}
