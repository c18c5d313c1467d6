//! Common fixture helpers for the integration tests.

use archipelago_lib::{
    Coordinates, Edge, GraphStore, Island, NewPort, Port, PortId, SqliteStore,
};

#[allow(dead_code)]
pub fn empty_store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("in-memory store opens")
}

#[allow(dead_code)]
pub fn island(name: &str, latitude: f64, longitude: f64) -> Island {
    Island {
        name: name.to_string(),
        coordinates: Coordinates::new(latitude, longitude).expect("valid fixture coordinates"),
        area_km2: 100.0,
        population: 0,
        description: String::new(),
    }
}

#[allow(dead_code)]
pub fn port(name: &str, latitude: f64, longitude: f64) -> NewPort {
    NewPort {
        name: name.to_string(),
        coordinates: Coordinates::new(latitude, longitude).expect("valid fixture coordinates"),
        locker_count: 10,
        aircraft_capacity: 2,
    }
}

/// Store with one island and three equatorial ports: Alpha at (0, 0),
/// Bravo one degree east, Charlie one degree north. Routes connect
/// Alpha-Bravo and Alpha-Charlie; Bravo and Charlie have no direct
/// link.
#[allow(dead_code)]
pub fn equator_store() -> SqliteStore {
    let mut store = empty_store();
    store
        .create_island(&island("Equator", 0.0, 0.0))
        .expect("island creates");

    store
        .create_port(&port("Alpha", 0.0, 0.0), "Equator")
        .expect("port creates");
    store
        .create_port(&port("Bravo", 0.0, 1.0), "Equator")
        .expect("port creates");
    store
        .create_port(&port("Charlie", 1.0, 0.0), "Equator")
        .expect("port creates");

    store.create_route("Alpha", "Bravo").expect("route creates");
    store.create_route("Alpha", "Charlie").expect("route creates");

    store
}

/// Port record for graphs assembled directly, without a store.
#[allow(dead_code)]
pub fn graph_port(id: PortId, name: &str) -> Port {
    Port {
        id,
        name: name.to_string(),
        island: "Test".to_string(),
        coordinates: Coordinates::new(0.0, 0.0).expect("valid fixture coordinates"),
        locker_count: 0,
        aircraft_capacity: 1,
    }
}

/// Push a bidirectional edge pair with a 200 km/h flight time.
#[allow(dead_code)]
pub fn link(edges: &mut Vec<(PortId, Edge)>, a: PortId, b: PortId, distance_km: f64) {
    let flight_minutes = distance_km * 0.3;
    edges.push((
        a,
        Edge {
            target: b,
            distance_km,
            flight_minutes,
        },
    ));
    edges.push((
        b,
        Edge {
            target: a,
            distance_km,
            flight_minutes,
        },
    ));
}
