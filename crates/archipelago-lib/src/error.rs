use thiserror::Error;

/// Convenient result alias for the archipelago library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Domain outcomes (`NoPath`, `NoFeasibleRoute`, not-found lookups)
/// are expected results that callers branch on; only the transparent
/// wrappers at the bottom represent infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an island name could not be found in the store.
    #[error("unknown island: {name}")]
    IslandNotFound { name: String },

    /// Raised when a port name could not be found in the store.
    #[error("unknown port: {name}")]
    PortNotFound { name: String },

    /// Raised when creating an island whose name is already taken.
    #[error("island {name} already exists")]
    IslandAlreadyExists { name: String },

    /// Raised when creating a port whose name is already taken.
    #[error("port {name} already exists")]
    PortAlreadyExists { name: String },

    /// Raised when no chain of routes connects two ports.
    #[error("no route connects {origin} to {destination}")]
    NoPath { origin: String, destination: String },

    /// Raised when no complete visiting order exists over the
    /// requested ports with the available direct routes.
    #[error("no feasible itinerary over the requested ports")]
    NoFeasibleRoute,

    /// Raised when an itinerary is requested over an empty port list.
    #[error("itinerary requires at least one port")]
    EmptyPortList,

    /// Raised when a coordinate falls outside the valid GPS domain.
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Raised when a route is created with a negative distance.
    #[error("route distance must be non-negative, got {distance_km}")]
    NegativeDistance { distance_km: f64 },

    /// Raised when an itinerary request exceeds the configured stop limit.
    #[error("itinerary over {requested} stops exceeds the limit of {limit}")]
    TooManyStops { requested: usize, limit: usize },

    /// Raised when a search is cancelled or runs past its deadline.
    #[error("route computation was cancelled")]
    Cancelled,

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
