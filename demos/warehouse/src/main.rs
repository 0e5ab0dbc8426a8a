//! warehouse — runnable demo for the fleet traffic engine.
//!
//! Loads a small warehouse nav graph, spawns a handful of robots on distinct
//! vertices, and keeps handing out random destinations for a fixed number of
//! rounds.  Every engine event goes to the `fleet` tracing target and to
//! `events.csv`; the robots' status table is written to `agent_status.csv`.
//!
//! ```text
//! cargo run -p warehouse -- [nav_graph.json] [output_dir]
//! RUST_LOG=fleet=info,ft_sim=debug cargo run -p warehouse
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ft_agent::RobotStore;
use ft_core::{EngineConfig, SimRng, Tick, VertexId};
use ft_graph::{load_nav_graph, DijkstraPlanner};
use ft_output::{CsvEventLog, EventLogObserver, TracingSink};
use ft_sim::{Engine, EngineBuilder, EngineError, Event, EventSink};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROBOT_COUNT:      usize = 5;
const SEED:             u64   = 7;
const ROUNDS:           u64   = 6;
const TICKS_PER_ROUND:  u64   = 10;
const REPLAN_AFTER:     u64   = 3;  // consecutive denied ticks before re-planning
const STATUS_INTERVAL:  u64   = 5;

const DEFAULT_GRAPH:  &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/nav_graph.json");
const DEFAULT_OUTPUT: &str = "output/warehouse";

// ── Event sink ────────────────────────────────────────────────────────────────

/// Fans events out to the CSV log and the tracing log, counting a few
/// headline numbers on the way.
struct DemoSink {
    log:       EventLogObserver<CsvEventLog>,
    #[cfg(feature = "sqlite")]
    db:        EventLogObserver<ft_output::SqliteEventLog>,
    trace:     TracingSink,
    events:    usize,
    waits:     usize,
    deadlocks: usize,
    completed: usize,
}

impl DemoSink {
    fn new(dir: &Path) -> Result<Self> {
        let log = EventLogObserver::new(CsvEventLog::new(dir)?)
            .with_status_interval(STATUS_INTERVAL);
        #[cfg(feature = "sqlite")]
        let db = EventLogObserver::new(ft_output::SqliteEventLog::new(dir)?)
            .with_status_interval(STATUS_INTERVAL);
        Ok(Self {
            log,
            #[cfg(feature = "sqlite")]
            db,
            trace:     TracingSink,
            events:    0,
            waits:     0,
            deadlocks: 0,
            completed: 0,
        })
    }

    /// Flush every backend, returning the first stored write error.
    fn finish(&mut self) -> Result<()> {
        self.log.finish()?;
        if let Some(e) = self.log.take_error() {
            return Err(e.into());
        }
        #[cfg(feature = "sqlite")]
        {
            self.db.finish()?;
            if let Some(e) = self.db.take_error() {
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl EventSink for DemoSink {
    fn on_tick_start(&mut self, tick: Tick) {
        self.log.on_tick_start(tick);
        #[cfg(feature = "sqlite")]
        self.db.on_tick_start(tick);
    }

    fn on_event(&mut self, tick: Tick, event: &Event) {
        self.events += 1;
        match event {
            Event::Waiting { .. }          => self.waits += 1,
            Event::DeadlockResolved { .. } => self.deadlocks += 1,
            Event::TaskComplete { .. }     => self.completed += 1,
            _ => {}
        }
        self.log.on_event(tick, event);
        #[cfg(feature = "sqlite")]
        self.db.on_event(tick, event);
        self.trace.on_event(tick, event);
    }

    fn on_tick_end(&mut self, tick: Tick, robots: &RobotStore) {
        self.log.on_tick_end(tick, robots);
        #[cfg(feature = "sqlite")]
        self.db.on_tick_end(tick, robots);
    }
}

// ── Task generation ───────────────────────────────────────────────────────────

/// `count` distinct vertices drawn without replacement.
fn spawn_points(vertices: &[VertexId], count: usize, rng: &mut SimRng) -> Vec<VertexId> {
    let mut pool = vertices.to_vec();
    let mut out = Vec::with_capacity(count.min(pool.len()));
    while out.len() < count && !pool.is_empty() {
        let i = rng.gen_range(0..pool.len());
        out.push(pool.swap_remove(i));
    }
    out
}

/// Give every idle robot a fresh random destination.  Returns how many
/// tasks were handed out.
fn dispatch(engine: &mut Engine<DijkstraPlanner>, rng: &mut SimRng) -> Result<usize> {
    let vertices: Vec<VertexId> = engine.graph().vertices().collect();
    let idle: Vec<_> = engine
        .robots()
        .iter()
        .filter(|r| !r.status.is_active())
        .map(|r| (r.id, r.current))
        .collect();

    let mut assigned = 0;
    for (agent, at) in idle {
        let Some(&dest) = rng.choose(&vertices) else {
            break;
        };
        if dest == at {
            continue;
        }
        match engine.assign_destination(agent, dest) {
            Ok(()) => assigned += 1,
            // One-way lanes make some pairs unreachable; try again next round.
            Err(EngineError::Unreachable { .. }) => {
                warn!(agent = agent.0, dest = dest.0, "no route, task dropped");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(assigned)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_logging() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let graph_path = args.next().map(PathBuf::from).unwrap_or_else(|| DEFAULT_GRAPH.into());
    let out_dir    = args.next().map(PathBuf::from).unwrap_or_else(|| DEFAULT_OUTPUT.into());

    println!("=== warehouse — fleet traffic engine ===");
    println!("Robots: {ROBOT_COUNT}  |  Rounds: {ROUNDS} × {TICKS_PER_ROUND} ticks  |  Seed: {SEED}");
    println!();

    // 1. Nav graph.
    let graph = load_nav_graph(&graph_path)
        .with_context(|| format!("loading {}", graph_path.display()))?;
    println!(
        "Graph: {} vertices, {} lanes  ({})",
        graph.vertex_count(),
        graph.lane_count(),
        graph_path.display()
    );

    // 2. Config and RNG streams.
    let config = EngineConfig {
        replan_after_wait_ticks: Some(REPLAN_AFTER),
        resolve_deadlocks:       true,
        total_ticks:             ROUNDS * TICKS_PER_ROUND,
        seed:                    SEED,
    };
    let mut rng       = SimRng::new(config.seed);
    let mut spawn_rng = rng.child(0);
    let mut task_rng  = rng.child(1);

    // 3. Engine with robots on distinct vertices.
    let vertices: Vec<VertexId> = graph.vertices().collect();
    let spawns = spawn_points(&vertices, ROBOT_COUNT, &mut spawn_rng);
    let mut engine = EngineBuilder::new(graph)
        .config(config)
        .planner(DijkstraPlanner)
        .initial_agents(spawns)
        .build()?;
    info!(robots = engine.robots().len(), "engine ready");

    // 4. Output.
    std::fs::create_dir_all(&out_dir)?;
    let mut sink = DemoSink::new(&out_dir)?;

    // 5. Run: dispatch, then let the fleet negotiate for a round.
    let t0 = Instant::now();
    let mut tasks = 0;
    for _ in 0..ROUNDS {
        tasks += dispatch(&mut engine, &mut task_rng)?;
        engine.run_ticks(TICKS_PER_ROUND, &mut sink);
    }
    sink.trace.on_run_end(engine.now());
    sink.finish()?;
    let elapsed = t0.elapsed();

    // 6. Summary.
    println!();
    println!("Run complete in {:.3} ms", elapsed.as_secs_f64() * 1_000.0);
    println!("  ticks              : {}", engine.now().0);
    println!("  tasks assigned     : {tasks}");
    println!("  tasks completed    : {}", sink.completed);
    println!("  events             : {}", sink.events);
    println!("  waits              : {}", sink.waits);
    println!("  deadlocks resolved : {}", sink.deadlocks);
    println!("  output             : {}", out_dir.display());
    println!();

    // 7. Final status table.
    let graph = engine.graph();
    println!("{:<8} {:<15} {:<15} {:<14} {:>8}", "Robot", "Vertex", "Destination", "Status", "Left");
    println!("{}", "-".repeat(64));
    for robot in engine.robots().iter() {
        let dest = robot.destination.map_or("-", |d| graph.name(d));
        println!(
            "{:<8} {:<15} {:<15} {:<14} {:>8.1}",
            robot.id.0,
            graph.name(robot.current),
            dest,
            robot.status.as_str(),
            robot.remaining_distance(graph),
        );
    }

    Ok(())
}
