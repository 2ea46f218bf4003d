use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use geofence::config::FileConfig;
use geofence::geometry::{Projector, degrees_to_meters};
use geofence::store::{EntityStore, JsonFileStore};
use geofence::tracking::{CancelToken, TrackingLoop};
use geofence::{
    FenceEditor, GeoPoint, GeofenceSession, MovementSimulator, Polygon, PositionUpdate,
    TrackedEntity,
};

/// Draw polygon geofences and track a moving point for breach and recovery events
///
/// Examples:
///   # Build a fence from clicked points and save it on a new entity
///   geofence draw -p 40.712,-74.010 -p 40.716,-74.004 -p 40.709,-74.001 --name "Van 7"
///
///   # Check a single position against a stored fence
///   geofence check --entity 3f2a... --lat 40.7125 --lng -74.006
///
///   # Random-walk a point inside a fence file, reproducibly
///   geofence simulate --fence fence.json --seed 42 --ticks 500 --interval-ms 0
#[derive(Parser, Debug)]
#[command(name = "geofence")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (optional, auto-searches geofence.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Entity store JSON file (overrides the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a fence from a sequence of vertices
    Draw(DrawArgs),
    /// Check whether a single position is inside a fence
    Check(CheckArgs),
    /// Track a randomly moving point and report breaches
    Simulate(SimulateArgs),
    /// Manage stored entities
    #[command(subcommand)]
    Entity(EntityCommand),
}

/// Where to read the fence from
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct FenceSource {
    /// JSON file holding an array of {"lat", "lng"} vertices
    #[arg(long)]
    fence: Option<PathBuf>,

    /// Id of a stored entity whose fence to use
    #[arg(long)]
    entity: Option<String>,
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Fence vertex as LAT,LNG (repeat in drawing order)
    #[arg(short = 'p', long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    points: Vec<GeoPoint>,

    /// Store the fence on an existing entity
    #[arg(long, conflicts_with = "name")]
    save: Option<String>,

    /// Create a new entity with this name holding the fence
    #[arg(long)]
    name: Option<String>,

    /// Write the fence JSON to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    source: FenceSource,

    /// Latitude of the position to test
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the position to test
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    source: FenceSource,

    /// Number of ticks to run
    #[arg(short = 'n', long)]
    ticks: Option<u64>,

    /// RNG seed for a reproducible walk
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum per-axis step in degrees
    #[arg(long)]
    step: Option<f64>,

    /// Delay between ticks in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print every update as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum EntityCommand {
    /// List stored entities
    List,
    /// Show one entity as JSON
    Show { id: String },
    /// Create a new entity
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// JSON fence file to attach
        #[arg(long)]
        fence: Option<PathBuf>,
    },
    /// Remove the fence from an entity
    ClearFence { id: String },
    /// Delete an entity
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config: FileConfig = if let Some(ref config_path) = cli.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = cli.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| file_config.store_path());

    match cli.command {
        Command::Draw(args) => run_draw(args, &store_path),
        Command::Check(args) => run_check(args, &store_path),
        Command::Simulate(args) => run_simulate(args, &file_config, &store_path),
        Command::Entity(cmd) => run_entity(cmd, &store_path),
    }
}

fn run_draw(args: DrawArgs, store_path: &Path) -> Result<()> {
    let mut editor = FenceEditor::new();
    editor.start_draw();

    for point in args.points {
        editor
            .add_vertex(point)
            .context(format!("Rejected vertex {}", point))?;
        log::info!("{}", editor.prompt());
    }

    let polygon = editor.finish_draw().context("Failed to finish fence")?;
    let centroid = FenceEditor::centroid(&polygon);
    let bounds = polygon.bounds();

    let json = serde_json::to_string_pretty(&polygon)?;
    if let Some(ref output) = args.output {
        std::fs::write(output, format!("{}\n", json))
            .with_context(|| format!("Failed to write fence file: {}", output.display()))?;
        println!("Wrote fence to {}", output.display());
    } else {
        println!("{}", json);
    }

    eprintln!("Geofence created with {} vertices", polygon.len());
    eprintln!("  Centroid: {}", centroid);
    eprintln!(
        "  Bounds:   {:.6}..{:.6} lat, {:.6}..{:.6} lng",
        bounds.south, bounds.north, bounds.west, bounds.east
    );

    if args.save.is_some() || args.name.is_some() {
        let mut store = open_store(store_path)?;
        if let Some(id) = args.save {
            let mut entity = store
                .get(&id)
                .context(format!("Failed to load entity {}", id))?;
            entity.set_fence(Some(&polygon));
            store.update(&id, entity).context("Failed to save fence")?;
            eprintln!("Saved fence on entity {}", id);
        } else if let Some(name) = args.name {
            let created = store
                .create(TrackedEntity::new(name).with_fence(&polygon))
                .context("Failed to create entity")?;
            eprintln!(
                "Created entity {} with fence",
                created.id.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

fn run_check(args: CheckArgs, store_path: &Path) -> Result<()> {
    let polygon = load_fence(&args.source, store_path)?;
    let point = GeoPoint::new(args.lat, args.lng)
        .validate()
        .context("Invalid position")?;

    let mut session = GeofenceSession::new();
    session.set_fence(polygon);
    let update = session.update_position(point)?;

    println!("{}: {}", point, update.status);
    Ok(())
}

fn run_simulate(args: SimulateArgs, config: &FileConfig, store_path: &Path) -> Result<()> {
    let polygon = load_fence(&args.source, store_path)?;
    let sim_config = &config.simulation;

    let ticks = args.ticks.unwrap_or(sim_config.ticks);
    let step = args.step.unwrap_or(sim_config.step);
    let interval = Duration::from_millis(args.interval_ms.unwrap_or(sim_config.interval_ms));
    let seed = args.seed.or(sim_config.seed);

    let simulator = MovementSimulator::new(step).context("Invalid simulator step")?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    log::info!(
        "Simulating {} ticks, step {} deg (~{:.0} m), interval {:?}, seed {:?}",
        ticks,
        step,
        degrees_to_meters(step),
        interval,
        seed
    );

    let mut session = GeofenceSession::new();
    session.set_fence(polygon);
    let start = session.start_tracking()?;
    let origin = start.position;

    let total_start = Instant::now();
    let summary = if args.json {
        print_update_json(&start)?;
        let mut write_error = None;
        let summary = TrackingLoop::new(interval).with_max_ticks(ticks).run(
            &mut session,
            &simulator,
            &mut rng,
            &CancelToken::new(),
            |_, update| {
                if write_error.is_none()
                    && let Err(e) = print_update_json(update)
                {
                    write_error = Some(e);
                }
            },
        )?;
        if let Some(e) = write_error {
            return Err(e);
        }
        summary
    } else {
        println!("Tracking started at {} ({})", origin, start.status);
        if let Some(event) = start.event {
            println!("  {}", event);
        }

        let spinner = create_spinner("Tracking...")?;
        let summary = TrackingLoop::new(interval).with_max_ticks(ticks).run(
            &mut session,
            &simulator,
            &mut rng,
            &CancelToken::new(),
            |s, update| {
                if let Some(event) = update.event {
                    spinner.println(format!("  {}", event));
                }
                if let Some(p) = s.position() {
                    spinner.set_message(format!("{} ({})", p, update.status));
                }
            },
        )?;
        spinner.finish_with_message(format!(
            "Ran {} ticks [{:.1}s]",
            summary.ticks,
            total_start.elapsed().as_secs_f32()
        ));
        summary
    };

    if !args.json {
        let projector = Projector::new(origin);
        println!();
        println!("Final status: {}", summary.final_status);
        if let Some(p) = summary.final_position {
            println!(
                "Final position: {} ({:.0} m from start)",
                p,
                projector.distance(origin, p)
            );
        }
        println!(
            "Breaches: {}, recoveries: {}",
            summary.breaches, summary.recoveries
        );
    }

    Ok(())
}

fn run_entity(cmd: EntityCommand, store_path: &Path) -> Result<()> {
    let mut store = open_store(store_path)?;

    match cmd {
        EntityCommand::List => {
            let entities = store.list()?;
            if entities.is_empty() {
                println!("No entities in {}", store_path.display());
            }
            for entity in entities {
                let fence = match &entity.fence_coordinates {
                    Some(coords) if !coords.is_empty() => format!("{} pts", coords.len()),
                    _ => "No fence".to_string(),
                };
                println!(
                    "{}  {:<24} {:<28} {:<16} {}",
                    entity.id.as_deref().unwrap_or("-"),
                    entity.name,
                    entity.email.as_deref().unwrap_or("-"),
                    entity.phone.as_deref().unwrap_or("-"),
                    fence
                );
            }
        }
        EntityCommand::Show { id } => {
            let entity = store.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&entity)?);
        }
        EntityCommand::Create {
            name,
            email,
            phone,
            fence,
        } => {
            let mut entity = TrackedEntity::new(name);
            entity.email = email;
            entity.phone = phone;
            if let Some(ref path) = fence {
                entity.set_fence(Some(&read_fence_file(path)?));
            }
            let created = store.create(entity).context("Failed to create entity")?;
            println!("{}", created.id.as_deref().unwrap_or("-"));
        }
        EntityCommand::ClearFence { id } => {
            let mut entity = store.get(&id)?;
            entity.set_fence(None);
            store.update(&id, entity)?;
            println!("Cleared fence on {}", id);
        }
        EntityCommand::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn open_store(path: &Path) -> Result<JsonFileStore> {
    JsonFileStore::open(path)
        .with_context(|| format!("Failed to open entity store: {}", path.display()))
}

fn load_fence(source: &FenceSource, store_path: &Path) -> Result<Polygon> {
    if let Some(ref path) = source.fence {
        return read_fence_file(path);
    }

    let Some(ref id) = source.entity else {
        bail!("Must provide either --fence or --entity");
    };

    let store = open_store(store_path)?;
    let entity = store
        .get(id)
        .context(format!("Failed to load entity {}", id))?;
    match entity.fence().context("Stored fence is invalid")? {
        Some(polygon) => Ok(polygon),
        None => bail!("Entity {} ({}) has no fence", id, entity.name),
    }
}

fn read_fence_file(path: &Path) -> Result<Polygon> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fence file: {}", path.display()))?;
    serde_json::from_str(&contents).context("Failed to parse fence file")
}

fn print_update_json(update: &PositionUpdate) -> Result<()> {
    println!("{}", serde_json::to_string(update)?);
    Ok(())
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {:?}", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude {:?}: {}", lat, e))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude {:?}: {}", lng, e))?;
    GeoPoint::new(lat, lng).validate().map_err(|e| e.to_string())
}

fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_point("40.7128, -74.006").unwrap(),
            GeoPoint::new(40.7128, -74.006)
        );
        assert!(parse_point("40.7128").is_err());
        assert!(parse_point("abc,1").is_err());
        assert!(parse_point("NaN,1").is_err());
    }

    #[test]
    fn test_cli_parses_draw() {
        let cli = Cli::try_parse_from([
            "geofence", "draw", "-p", "0,0", "-p", "0,1", "-p", "-1,1",
        ])
        .unwrap();
        match cli.command {
            Command::Draw(args) => assert_eq!(args.points.len(), 3),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_fence_source_is_exclusive() {
        let both = Cli::try_parse_from([
            "geofence", "check", "--fence", "f.json", "--entity", "x", "--lat", "0", "--lng",
            "0",
        ]);
        assert!(both.is_err());

        let neither = Cli::try_parse_from(["geofence", "check", "--lat", "0", "--lng", "0"]);
        assert!(neither.is_err());
    }
}
