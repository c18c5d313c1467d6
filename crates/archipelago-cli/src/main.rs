use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use archipelago_lib::{
    plan_itinerary, shortest_path, Coordinates, GraphStore, Island, Itinerary, ItineraryRequest,
    NewPort, PathRequest, SearchGuard, SqliteStore,
};

mod seed;

#[derive(Parser, Debug)]
#[command(author, version, about = "Archipelago seaplane routing utilities")]
struct Cli {
    /// Path to the SQLite graph database.
    #[arg(long, default_value = "archipelago.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate the database with the demonstration archipelago.
    Seed,
    /// Create an island.
    CreateIsland {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Island area in square kilometres.
        #[arg(long)]
        area: f64,
        #[arg(long, default_value_t = 0)]
        population: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create a port on an existing island.
    CreatePort {
        name: String,
        #[arg(long)]
        island: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value_t = 0)]
        lockers: u32,
        #[arg(long, default_value_t = 1)]
        aircraft_capacity: u32,
    },
    /// Create a bidirectional route between two ports; the distance
    /// is derived from their stored coordinates.
    CreateRoute {
        from: String,
        to: String,
    },
    /// List islands.
    Islands {
        #[arg(long)]
        json: bool,
    },
    /// List ports, optionally restricted to a single island.
    Ports {
        #[arg(long)]
        island: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Compute the shortest path between two ports.
    ShortestPath {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Abort the search after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Plan an efficient visiting order over several ports.
    Itinerary {
        /// Ports to visit, each exactly once.
        #[arg(required = true)]
        stops: Vec<String>,
        /// Fixed starting port.
        #[arg(long)]
        start: Option<String>,
        /// Abort the search after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut store = SqliteStore::open(&cli.db)
        .with_context(|| format!("failed to open database at {}", cli.db.display()))?;

    match cli.command {
        Command::Seed => seed::seed_demo(&mut store),
        Command::CreateIsland {
            name,
            lat,
            lon,
            area,
            population,
            description,
        } => {
            store.create_island(&Island {
                name: name.clone(),
                coordinates: Coordinates::new(lat, lon)?,
                area_km2: area,
                population,
                description,
            })?;
            println!("Created island {name}");
            Ok(())
        }
        Command::CreatePort {
            name,
            island,
            lat,
            lon,
            lockers,
            aircraft_capacity,
        } => {
            let port = store.create_port(
                &NewPort {
                    name,
                    coordinates: Coordinates::new(lat, lon)?,
                    locker_count: lockers,
                    aircraft_capacity,
                },
                &island,
            )?;
            println!("Created port {} on {}", port.name, port.island);
            Ok(())
        }
        Command::CreateRoute { from, to } => {
            let route = store.create_route(&from, &to)?;
            println!(
                "Created route {from} <-> {to}: {:.1} km, {:.0} min",
                route.distance_km, route.flight_minutes
            );
            Ok(())
        }
        Command::Islands { json } => handle_islands(&store, json),
        Command::Ports { island, json } => handle_ports(&store, island.as_deref(), json),
        Command::ShortestPath {
            from,
            to,
            timeout_secs,
            json,
        } => handle_shortest_path(&store, &from, &to, timeout_secs, json),
        Command::Itinerary {
            stops,
            start,
            timeout_secs,
            json,
        } => handle_itinerary(&store, stops, start, timeout_secs, json),
    }
}

fn handle_islands(store: &SqliteStore, json: bool) -> Result<()> {
    let islands = store.islands()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&islands)?);
        return Ok(());
    }

    for island in islands {
        println!(
            "{} ({:.4}, {:.4}) - {:.0} km2, population {}",
            island.name,
            island.coordinates.latitude,
            island.coordinates.longitude,
            island.area_km2,
            island.population
        );
    }
    Ok(())
}

fn handle_ports(store: &SqliteStore, island: Option<&str>, json: bool) -> Result<()> {
    let ports = match island {
        Some(island) => store.ports_on_island(island)?,
        None => store.ports()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
        return Ok(());
    }

    for port in ports {
        println!(
            "{} on {} ({:.4}, {:.4}) - {} lockers, {} aircraft",
            port.name,
            port.island,
            port.coordinates.latitude,
            port.coordinates.longitude,
            port.locker_count,
            port.aircraft_capacity
        );
    }
    Ok(())
}

fn handle_shortest_path(
    store: &SqliteStore,
    from: &str,
    to: &str,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    let graph = store.snapshot()?;
    let request = PathRequest::new(from, to).with_guard(guard_from(timeout_secs));
    let itinerary = shortest_path(&graph, &request)
        .with_context(|| format!("failed to compute a shortest path from {from} to {to}"))?;
    print_itinerary(&itinerary, json)
}

fn handle_itinerary(
    store: &SqliteStore,
    stops: Vec<String>,
    start: Option<String>,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    let graph = store.snapshot()?;
    let mut request = ItineraryRequest::new(stops).with_guard(guard_from(timeout_secs));
    if let Some(start) = start {
        request = request.with_start(start);
    }

    let itinerary =
        plan_itinerary(&graph, &request).context("failed to plan a multi-port itinerary")?;
    print_itinerary(&itinerary, json)
}

fn guard_from(timeout_secs: Option<u64>) -> SearchGuard {
    match timeout_secs {
        Some(seconds) => SearchGuard::with_timeout(Duration::from_secs(seconds)),
        None => SearchGuard::none(),
    }
}

fn print_itinerary(itinerary: &Itinerary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(itinerary)?);
        return Ok(());
    }

    println!("Itinerary: {}", itinerary.ports.join(" -> "));
    for segment in &itinerary.segments {
        println!(
            "  {} -> {}: {:.1} km, {:.0} min",
            segment.origin, segment.destination, segment.distance_km, segment.flight_minutes
        );
    }
    println!(
        "Total: {:.1} km, {:.0} min, {:.1} fuel units",
        itinerary.total_distance_km, itinerary.total_minutes, itinerary.total_fuel_units
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
