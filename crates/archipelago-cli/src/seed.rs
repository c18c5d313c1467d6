//! Demonstration archipelago: the Galápagos islands with their real
//! GPS coordinates, ten seaplane ports, and a realistic route mesh.

use anyhow::{Context, Result};
use archipelago_lib::{Coordinates, GraphStore, Island, NewPort, SqliteStore};

struct SeedIsland {
    name: &'static str,
    latitude: f64,
    longitude: f64,
    area_km2: f64,
    population: u32,
    description: &'static str,
}

struct SeedPort {
    name: &'static str,
    island: &'static str,
    latitude: f64,
    longitude: f64,
    locker_count: u32,
    aircraft_capacity: u32,
}

const ISLANDS: &[SeedIsland] = &[
    SeedIsland {
        name: "San Cristobal",
        latitude: -0.8406,
        longitude: -89.4325,
        area_km2: 558.0,
        population: 7000,
        description: "Home of the provincial capital and the main cargo warehouse.",
    },
    SeedIsland {
        name: "Santa Cruz",
        latitude: -0.6396,
        longitude: -90.3312,
        area_km2: 986.0,
        population: 15000,
        description: "Most populated island, hosting the Charles Darwin research station.",
    },
    SeedIsland {
        name: "Isabela",
        latitude: -0.9485,
        longitude: -91.0984,
        area_km2: 4640.0,
        population: 2200,
        description: "Largest island of the archipelago, known for its active volcanoes.",
    },
    SeedIsland {
        name: "Floreana",
        latitude: -1.2869,
        longitude: -90.4378,
        area_km2: 173.0,
        population: 100,
        description: "Small inhabited island, important for marine biodiversity studies.",
    },
    SeedIsland {
        name: "Fernandina",
        latitude: -0.3709,
        longitude: -91.5523,
        area_km2: 642.0,
        population: 0,
        description: "Uninhabited volcanic island, protected research zone.",
    },
    SeedIsland {
        name: "Santiago",
        latitude: -0.2569,
        longitude: -90.7708,
        area_km2: 585.0,
        population: 0,
        description: "Uninhabited island, important for geological surveys.",
    },
    SeedIsland {
        name: "Espanola",
        latitude: -1.3829,
        longitude: -89.6208,
        area_km2: 60.0,
        population: 0,
        description: "Southernmost island, famous for its albatross colonies.",
    },
    SeedIsland {
        name: "Genovesa",
        latitude: 0.3197,
        longitude: -89.9553,
        area_km2: 14.0,
        population: 0,
        description: "Horseshoe-shaped islet, a birdwatcher's paradise.",
    },
];

const PORTS: &[SeedPort] = &[
    SeedPort {
        name: "Puerto Baquerizo Moreno",
        island: "San Cristobal",
        latitude: -0.9019,
        longitude: -89.6108,
        locker_count: 50,
        aircraft_capacity: 5,
    },
    SeedPort {
        name: "Wreck Bay",
        island: "San Cristobal",
        latitude: -0.8950,
        longitude: -89.6150,
        locker_count: 20,
        aircraft_capacity: 2,
    },
    SeedPort {
        name: "Puerto Ayora",
        island: "Santa Cruz",
        latitude: -0.7406,
        longitude: -90.3120,
        locker_count: 80,
        aircraft_capacity: 6,
    },
    SeedPort {
        name: "Academy Bay",
        island: "Santa Cruz",
        latitude: -0.7350,
        longitude: -90.3050,
        locker_count: 30,
        aircraft_capacity: 3,
    },
    SeedPort {
        name: "Puerto Villamil",
        island: "Isabela",
        latitude: -0.9572,
        longitude: -90.9658,
        locker_count: 40,
        aircraft_capacity: 3,
    },
    SeedPort {
        name: "Puerto Velasco Ibarra",
        island: "Floreana",
        latitude: -1.2875,
        longitude: -90.4772,
        locker_count: 25,
        aircraft_capacity: 2,
    },
    SeedPort {
        name: "Punta Espinoza",
        island: "Fernandina",
        latitude: -0.2647,
        longitude: -91.4436,
        locker_count: 15,
        aircraft_capacity: 1,
    },
    SeedPort {
        name: "James Bay",
        island: "Santiago",
        latitude: -0.2108,
        longitude: -90.8244,
        locker_count: 20,
        aircraft_capacity: 2,
    },
    SeedPort {
        name: "Punta Suarez",
        island: "Espanola",
        latitude: -1.3689,
        longitude: -89.7319,
        locker_count: 10,
        aircraft_capacity: 1,
    },
    SeedPort {
        name: "Darwin Bay",
        island: "Genovesa",
        latitude: 0.3208,
        longitude: -89.9647,
        locker_count: 10,
        aircraft_capacity: 1,
    },
];

const ROUTES: &[(&str, &str)] = &[
    ("Puerto Baquerizo Moreno", "Puerto Ayora"),
    ("Puerto Baquerizo Moreno", "Wreck Bay"),
    ("Puerto Ayora", "Academy Bay"),
    ("Puerto Ayora", "Puerto Villamil"),
    ("Puerto Ayora", "Puerto Velasco Ibarra"),
    ("Puerto Villamil", "Punta Espinoza"),
    ("Puerto Baquerizo Moreno", "Punta Suarez"),
    ("Puerto Ayora", "James Bay"),
    ("James Bay", "Darwin Bay"),
    ("Wreck Bay", "Puerto Ayora"),
    ("Academy Bay", "Puerto Villamil"),
    ("Puerto Baquerizo Moreno", "Puerto Villamil"),
];

/// Populate a store with the demonstration network. Route distances
/// are derived from the ports' coordinates.
pub fn seed_demo(store: &mut SqliteStore) -> Result<()> {
    for island in ISLANDS {
        store
            .create_island(&Island {
                name: island.name.to_string(),
                coordinates: Coordinates::new(island.latitude, island.longitude)?,
                area_km2: island.area_km2,
                population: island.population,
                description: island.description.to_string(),
            })
            .with_context(|| format!("failed to seed island {}", island.name))?;
    }

    for port in PORTS {
        store
            .create_port(
                &NewPort {
                    name: port.name.to_string(),
                    coordinates: Coordinates::new(port.latitude, port.longitude)?,
                    locker_count: port.locker_count,
                    aircraft_capacity: port.aircraft_capacity,
                },
                port.island,
            )
            .with_context(|| format!("failed to seed port {}", port.name))?;
    }

    for (from, to) in ROUTES {
        store
            .create_route(from, to)
            .with_context(|| format!("failed to seed route {from} - {to}"))?;
    }

    println!(
        "Seeded {} islands, {} ports, {} bidirectional routes",
        ISLANDS.len(),
        PORTS.len(),
        ROUTES.len()
    );
    Ok(())
}
