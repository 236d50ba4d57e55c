//! Search a road graph and play the search back in the terminal.
//!
//! Run: cargo run --bin wayfind-demo -- --strategy dijkstra --speed 20
//!
//! Without `--graph` a seeded synthetic grid is searched corner to corner.
//! Endpoints may be node ids or `lat,lng` pairs, which snap to the nearest
//! node. Set `RUST_LOG=debug` (or pass `-v`) for engine and playback logs.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wayfind_core::NodeId;
use wayfind_demos::{GridConfig, load_graph, progress_line, resolve_endpoint, road_grid, summary_line};
use wayfind_paths::{PathFinder, Strategy};
use wayfind_replay::{PlaybackConfig, PlaybackController, ThreadScheduler};

/// How long past its due time a tick may be late before playback gives up.
const STALL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "wayfind-demo")]
#[command(about = "Find a route on a road graph and animate the search", long_about = None)]
#[command(version)]
struct Cli {
    /// Search strategy: bfs, dijkstra or astar
    #[arg(short, long, default_value = "astar")]
    strategy: Strategy,

    /// JSON graph file ({"id": {"lat", "lng", "neighbors": {"id": weight}}})
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Source node id or "lat,lng"
    #[arg(long)]
    from: Option<String>,

    /// Target node id or "lat,lng"
    #[arg(long)]
    to: Option<String>,

    /// Milliseconds between reveal steps (0 reveals in large batches)
    #[arg(long, env = "WAYFIND_SPEED_MS", default_value_t = PlaybackConfig::default().speed_ms)]
    speed: u64,

    /// Grid rows when no graph file is given
    #[arg(long, default_value_t = GridConfig::default().rows)]
    rows: usize,

    /// Grid columns when no graph file is given
    #[arg(long, default_value_t = GridConfig::default().cols)]
    cols: usize,

    /// Seed for the synthetic grid
    #[arg(long, default_value_t = GridConfig::default().seed)]
    seed: u64,

    /// Run every strategy and print a comparison instead of playing back
    #[arg(long)]
    compare: bool,

    /// Print the trace as JSON instead of playing it back
    #[arg(long, conflicts_with = "compare")]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let grid = GridConfig {
        rows: cli.rows,
        cols: cli.cols,
        seed: cli.seed,
        ..GridConfig::default()
    };
    let (graph, corners) = match &cli.graph {
        Some(path) => {
            let g = load_graph(path)?;
            let first = g.node_at(0).map(|n| n.id().clone());
            let last = g.len().checked_sub(1).and_then(|i| g.node_at(i)).map(|n| n.id().clone());
            (g, first.zip(last))
        }
        None => (road_grid(&grid), Some(grid.corners())),
    };
    if graph.is_empty() {
        return Err("graph has no nodes".into());
    }

    let endpoint = |spec: Option<&String>, fallback: Option<&NodeId>| match spec {
        Some(s) => resolve_endpoint(&graph, s).ok_or_else(|| format!("no node matches \u{201c}{s}\u{201d}")),
        None => fallback.cloned().ok_or_else(|| "no default endpoint".to_owned()),
    };
    let source = endpoint(cli.from.as_ref(), corners.as_ref().map(|c| &c.0))?;
    let target = endpoint(cli.to.as_ref(), corners.as_ref().map(|c| &c.1))?;
    println!(
        "{} nodes, {} edges; {source} -> {target}",
        graph.len(),
        graph.edge_count()
    );

    let mut finder = PathFinder::with_capacity(graph.len());
    if cli.compare {
        for strategy in Strategy::ALL {
            let trace = finder.run(&graph, source.as_str(), target.as_str(), strategy)?;
            println!("{}", summary_line(&trace));
        }
        return Ok(());
    }

    let trace = finder.run(&graph, source.as_str(), target.as_str(), cli.strategy)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    let mut player = PlaybackController::with_config(
        ThreadScheduler::new(),
        PlaybackConfig {
            speed_ms: cli.speed,
            ..PlaybackConfig::default()
        },
    );
    let updates = player.subscribe();
    player.load(trace);
    player.play();

    let patience = Duration::from_millis(cli.speed) + STALL_TIMEOUT;
    let mut err = io::stderr();
    while !player.state().is_finished() {
        let Some(tick) = player.scheduler_mut().recv_timeout(patience) else {
            return Err("playback stalled".into());
        };
        player.on_tick(tick);
        for state in updates.try_iter() {
            write!(err, "\r{}", progress_line(&state, 40))?;
        }
        err.flush()?;
    }
    writeln!(err)?;

    if let Some(trace) = player.trace() {
        println!("{}", summary_line(trace));
    }
    match player.final_path() {
        Some(path) if !path.is_empty() => {
            let hops: Vec<&str> = path.iter().map(|id| id.as_str()).collect();
            println!("path: {}", hops.join(" -> "));
        }
        _ => println!("no route from {source} to {target}"),
    }
    Ok(())
}
