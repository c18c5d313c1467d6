use std::collections::HashSet;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cost::CostModel;
use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinates};
use crate::graph::{Edge, PortGraph};

/// Numeric identifier for a port, assigned by the storage backend.
pub type PortId = i64;

/// An island of the archipelago. Identified by a unique name and
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Island {
    pub name: String,
    pub coordinates: Coordinates,
    pub area_km2: f64,
    pub population: u32,
    pub description: String,
}

/// A named docking location on an island, as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub island: String,
    pub coordinates: Coordinates,
    pub locker_count: u32,
    pub aircraft_capacity: u32,
}

/// Attributes of a port to be created. The island it sits on is
/// supplied separately at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPort {
    pub name: String,
    pub coordinates: Coordinates,
    pub locker_count: u32,
    pub aircraft_capacity: u32,
}

/// Result of creating a bidirectional route between two ports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteCreated {
    pub distance_km: f64,
    pub flight_minutes: f64,
}

/// Storage contract for the archipelago graph.
///
/// Reads take `&self` and may run concurrently; mutations take
/// `&mut self` and commit atomically. The store is the single source
/// of truth for graph topology; the routing engines consume immutable
/// [`PortGraph`] snapshots taken via [`GraphStore::snapshot`].
pub trait GraphStore {
    /// Create an island. Fails if the name is already taken.
    fn create_island(&mut self, island: &Island) -> Result<()>;

    /// Create a port on an existing island. The port record and its
    /// located-on relationship are created together or not at all.
    fn create_port(&mut self, port: &NewPort, island_name: &str) -> Result<Port>;

    /// Create the forward and reverse route edges between two ports
    /// with identical distance, committed as a single transaction.
    fn create_route_pair(&mut self, origin: &str, destination: &str, distance_km: f64)
        -> Result<RouteCreated>;

    /// Lookup an island by name.
    fn island(&self, name: &str) -> Result<Island>;

    /// Lookup a port by name.
    fn port(&self, name: &str) -> Result<Port>;

    /// List every island, ordered by name.
    fn islands(&self) -> Result<Vec<Island>>;

    /// List every port, ordered by name.
    fn ports(&self) -> Result<Vec<Port>>;

    /// List the ports located on an island, ordered by name. Returns
    /// an empty list when the island has no ports; the island itself
    /// must exist.
    fn ports_on_island(&self, island_name: &str) -> Result<Vec<Port>>;

    /// Direct edge weight from `origin` to `destination` in km, or
    /// `None` when no such directed edge exists. The reverse edge is
    /// never inferred.
    fn route_weight(&self, origin: &str, destination: &str) -> Result<Option<f64>>;

    /// Load the current port network into an in-memory graph.
    fn snapshot(&self) -> Result<PortGraph>;

    /// Create a bidirectional route whose distance is derived from
    /// the two ports' stored coordinates via the haversine formula.
    fn create_route(&mut self, origin: &str, destination: &str) -> Result<RouteCreated> {
        let from = self.port(origin)?;
        let to = self.port(destination)?;
        let distance_km = haversine_km(&from.coordinates, &to.coordinates);
        self.create_route_pair(origin, destination, distance_km)
    }
}

/// SQLite-backed [`GraphStore`].
///
/// The durable layout mirrors the logical graph shape: an `islands`
/// table, a `ports` table whose island column is the located-on
/// relationship, and a `routes` table holding one row per directed
/// edge (two rows per created route).
pub struct SqliteStore {
    connection: Connection,
    cost: CostModel,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        debug!(path = %path.display(), "opening archipelago store");
        Self::from_connection(connection)
    }

    /// Open an in-memory store, useful for tests and ephemeral runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Replace the cost model used to derive flight times at route
    /// creation.
    pub fn with_cost_model(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS islands (
                 name        TEXT PRIMARY KEY,
                 latitude    REAL NOT NULL,
                 longitude   REAL NOT NULL,
                 area_km2    REAL NOT NULL,
                 population  INTEGER NOT NULL DEFAULT 0,
                 description TEXT NOT NULL DEFAULT ''
             );
             CREATE TABLE IF NOT EXISTS ports (
                 id                INTEGER PRIMARY KEY,
                 name              TEXT NOT NULL UNIQUE,
                 island_name       TEXT NOT NULL REFERENCES islands(name),
                 latitude          REAL NOT NULL,
                 longitude         REAL NOT NULL,
                 locker_count      INTEGER NOT NULL,
                 aircraft_capacity INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS routes (
                 origin_id      INTEGER NOT NULL REFERENCES ports(id),
                 target_id      INTEGER NOT NULL REFERENCES ports(id),
                 distance_km    REAL NOT NULL,
                 flight_minutes REAL NOT NULL,
                 PRIMARY KEY (origin_id, target_id)
             );",
        )?;

        Ok(Self {
            connection,
            cost: CostModel::default(),
        })
    }

    fn port_id(connection: &Connection, name: &str) -> Result<PortId> {
        connection
            .query_row("SELECT id FROM ports WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| Error::PortNotFound {
                name: name.to_string(),
            })
    }

    fn island_exists(connection: &Connection, name: &str) -> Result<bool> {
        let found: Option<i64> = connection
            .query_row("SELECT 1 FROM islands WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}

impl GraphStore for SqliteStore {
    fn create_island(&mut self, island: &Island) -> Result<()> {
        island.coordinates.validate()?;

        if Self::island_exists(&self.connection, &island.name)? {
            return Err(Error::IslandAlreadyExists {
                name: island.name.clone(),
            });
        }

        self.connection.execute(
            "INSERT INTO islands (name, latitude, longitude, area_km2, population, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &island.name,
                island.coordinates.latitude,
                island.coordinates.longitude,
                island.area_km2,
                island.population,
                &island.description,
            ),
        )?;
        debug!(island = %island.name, "created island");
        Ok(())
    }

    fn create_port(&mut self, port: &NewPort, island_name: &str) -> Result<Port> {
        port.coordinates.validate()?;

        let tx = self.connection.transaction()?;

        if !Self::island_exists(&tx, island_name)? {
            return Err(Error::IslandNotFound {
                name: island_name.to_string(),
            });
        }

        let taken: Option<i64> = tx
            .query_row("SELECT 1 FROM ports WHERE name = ?1", [&port.name], |row| {
                row.get(0)
            })
            .optional()?;
        if taken.is_some() {
            return Err(Error::PortAlreadyExists {
                name: port.name.clone(),
            });
        }

        tx.execute(
            "INSERT INTO ports (name, island_name, latitude, longitude, locker_count, aircraft_capacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &port.name,
                island_name,
                port.coordinates.latitude,
                port.coordinates.longitude,
                port.locker_count,
                port.aircraft_capacity,
            ),
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(port = %port.name, island = %island_name, "created port");

        Ok(Port {
            id,
            name: port.name.clone(),
            island: island_name.to_string(),
            coordinates: port.coordinates,
            locker_count: port.locker_count,
            aircraft_capacity: port.aircraft_capacity,
        })
    }

    fn create_route_pair(
        &mut self,
        origin: &str,
        destination: &str,
        distance_km: f64,
    ) -> Result<RouteCreated> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(Error::NegativeDistance { distance_km });
        }

        let flight_minutes = self.cost.flight_minutes(distance_km);
        let tx = self.connection.transaction()?;

        let origin_id = Self::port_id(&tx, origin)?;
        let target_id = Self::port_id(&tx, destination)?;

        // Both directions commit together so the graph never observes
        // a half-created bidirectional route.
        tx.execute(
            "INSERT OR REPLACE INTO routes (origin_id, target_id, distance_km, flight_minutes)
             VALUES (?1, ?2, ?3, ?4)",
            (origin_id, target_id, distance_km, flight_minutes),
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO routes (origin_id, target_id, distance_km, flight_minutes)
             VALUES (?1, ?2, ?3, ?4)",
            (target_id, origin_id, distance_km, flight_minutes),
        )?;
        tx.commit()?;
        debug!(%origin, %destination, distance_km, "created route pair");

        Ok(RouteCreated {
            distance_km,
            flight_minutes,
        })
    }

    fn island(&self, name: &str) -> Result<Island> {
        self.connection
            .query_row(
                "SELECT name, latitude, longitude, area_km2, population, description
                 FROM islands WHERE name = ?1",
                [name],
                row_to_island,
            )
            .optional()?
            .ok_or_else(|| Error::IslandNotFound {
                name: name.to_string(),
            })
    }

    fn port(&self, name: &str) -> Result<Port> {
        self.connection
            .query_row(
                "SELECT id, name, island_name, latitude, longitude, locker_count, aircraft_capacity
                 FROM ports WHERE name = ?1",
                [name],
                row_to_port,
            )
            .optional()?
            .ok_or_else(|| Error::PortNotFound {
                name: name.to_string(),
            })
    }

    fn islands(&self) -> Result<Vec<Island>> {
        let mut stmt = self.connection.prepare(
            "SELECT name, latitude, longitude, area_km2, population, description
             FROM islands ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_island)?;
        collect_rows(rows)
    }

    fn ports(&self) -> Result<Vec<Port>> {
        let mut stmt = self.connection.prepare(
            "SELECT id, name, island_name, latitude, longitude, locker_count, aircraft_capacity
             FROM ports ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_port)?;
        collect_rows(rows)
    }

    fn ports_on_island(&self, island_name: &str) -> Result<Vec<Port>> {
        if !Self::island_exists(&self.connection, island_name)? {
            return Err(Error::IslandNotFound {
                name: island_name.to_string(),
            });
        }

        let mut stmt = self.connection.prepare(
            "SELECT id, name, island_name, latitude, longitude, locker_count, aircraft_capacity
             FROM ports WHERE island_name = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map([island_name], row_to_port)?;
        collect_rows(rows)
    }

    fn route_weight(&self, origin: &str, destination: &str) -> Result<Option<f64>> {
        let origin_id = Self::port_id(&self.connection, origin)?;
        let target_id = Self::port_id(&self.connection, destination)?;

        let weight = self
            .connection
            .query_row(
                "SELECT distance_km FROM routes WHERE origin_id = ?1 AND target_id = ?2",
                (origin_id, target_id),
                |row| row.get(0),
            )
            .optional()?;
        Ok(weight)
    }

    fn snapshot(&self) -> Result<PortGraph> {
        let ports = self.ports()?;
        let known: HashSet<PortId> = ports.iter().map(|port| port.id).collect();

        let mut stmt = self
            .connection
            .prepare("SELECT origin_id, target_id, distance_km, flight_minutes FROM routes")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, PortId>(0)?,
                Edge {
                    target: row.get(1)?,
                    distance_km: row.get(2)?,
                    flight_minutes: row.get(3)?,
                },
            ))
        })?;

        let mut edges = Vec::new();
        let mut skipped_edges = 0usize;
        for entry in rows {
            let (origin, edge) = entry?;
            if !known.contains(&origin) || !known.contains(&edge.target) {
                skipped_edges += 1;
                continue;
            }
            edges.push((origin, edge));
        }

        if skipped_edges > 0 {
            warn!(skipped_edges, "ignored route edges referencing unknown ports");
        }

        Ok(PortGraph::from_parts(ports, edges))
    }
}

fn row_to_island(row: &Row<'_>) -> rusqlite::Result<Island> {
    Ok(Island {
        name: row.get(0)?,
        coordinates: Coordinates {
            latitude: row.get(1)?,
            longitude: row.get(2)?,
        },
        area_km2: row.get(3)?,
        population: row.get(4)?,
        description: row.get(5)?,
    })
}

fn row_to_port(row: &Row<'_>) -> rusqlite::Result<Port> {
    Ok(Port {
        id: row.get(0)?,
        name: row.get(1)?,
        island: row.get(2)?,
        coordinates: Coordinates {
            latitude: row.get(3)?,
            longitude: row.get(4)?,
        },
        locker_count: row.get(5)?,
        aircraft_capacity: row.get(6)?,
    })
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for entry in rows {
        out.push(entry?);
    }
    Ok(out)
}
