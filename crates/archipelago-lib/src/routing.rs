//! High-level routing entry points.
//!
//! This module resolves port names, runs the search engines over a
//! [`PortGraph`] snapshot, and applies the cost model to produce
//! [`Itinerary`] values. It fulfils the two query contracts exposed
//! to the API layer: single-pair shortest path and multi-port
//! itinerary planning.

use tracing::debug;

use crate::cost::CostModel;
use crate::error::{Error, Result};
use crate::graph::PortGraph;
use crate::itinerary::{solve_order, Itinerary, PlannerConfig};
use crate::path::{find_route_dijkstra, SearchGuard};
use crate::store::PortId;

/// Single-pair shortest path request.
#[derive(Debug, Clone, Default)]
pub struct PathRequest {
    pub origin: String,
    pub destination: String,
    pub cost: CostModel,
    pub guard: SearchGuard,
}

impl PathRequest {
    /// Request with default cost model and no cancellation guard.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_guard(mut self, guard: SearchGuard) -> Self {
        self.guard = guard;
        self
    }
}

/// Multi-port itinerary request.
#[derive(Debug, Clone, Default)]
pub struct ItineraryRequest {
    /// Ports to visit, each exactly once. Must be non-empty.
    pub stops: Vec<String>,
    /// Optional fixed starting port; prepended to the visiting order
    /// when it is not already among the stops.
    pub start: Option<String>,
    pub config: PlannerConfig,
    pub cost: CostModel,
    pub guard: SearchGuard,
}

impl ItineraryRequest {
    /// Request with default planner configuration and cost model.
    pub fn new(stops: Vec<String>) -> Self {
        Self {
            stops,
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_guard(mut self, guard: SearchGuard) -> Self {
        self.guard = guard;
        self
    }
}

/// Compute the minimum-total-distance path between two ports.
///
/// Returns [`Error::NoPath`] when the ports lie in disconnected
/// components and [`Error::PortNotFound`] for unknown endpoints. An
/// origin equal to the destination yields a zero-segment itinerary.
pub fn shortest_path(graph: &PortGraph, request: &PathRequest) -> Result<Itinerary> {
    let origin_id = resolve_port(graph, &request.origin)?;
    let destination_id = resolve_port(graph, &request.destination)?;

    let found = find_route_dijkstra(graph, origin_id, destination_id, &request.guard)?
        .ok_or_else(|| Error::NoPath {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
        })?;

    debug!(
        origin = %request.origin,
        destination = %request.destination,
        distance_km = found.distance_km,
        hops = found.steps.len().saturating_sub(1),
        "shortest path computed"
    );

    let mut legs = Vec::with_capacity(found.steps.len().saturating_sub(1));
    for pair in found.steps.windows(2) {
        let edge = graph
            .direct_edge(pair[0], pair[1])
            .ok_or_else(|| Error::NoPath {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            })?;
        legs.push(edge.distance_km);
    }

    let ports = port_names(graph, &found.steps);
    Ok(Itinerary::assemble(ports, &legs, &request.cost))
}

/// Decide an efficient visiting order over the requested ports and
/// report its aggregate cost.
///
/// The order minimizes total direct-route distance: exactly via
/// Held-Karp for small requests, heuristically (greedy plus 2-opt)
/// beyond [`PlannerConfig::exact_stop_limit`]. Port pairs without a
/// direct route are never linked; when no complete order exists the
/// result is [`Error::NoFeasibleRoute`].
pub fn plan_itinerary(graph: &PortGraph, request: &ItineraryRequest) -> Result<Itinerary> {
    if request.stops.is_empty() {
        return Err(Error::EmptyPortList);
    }

    let mut stop_ids: Vec<PortId> = Vec::with_capacity(request.stops.len() + 1);
    let mut fixed_start = None;

    if let Some(start) = &request.start {
        stop_ids.push(resolve_port(graph, start)?);
        fixed_start = Some(0);
    }
    for stop in &request.stops {
        let id = resolve_port(graph, stop)?;
        if !stop_ids.contains(&id) {
            stop_ids.push(id);
        }
    }

    if stop_ids.len() > request.config.max_stops {
        return Err(Error::TooManyStops {
            requested: stop_ids.len(),
            limit: request.config.max_stops,
        });
    }

    let matrix = distance_matrix(graph, &stop_ids);
    let order = solve_order(&matrix, fixed_start, &request.config, &request.guard)?
        .ok_or(Error::NoFeasibleRoute)?;

    let ordered_ids: Vec<PortId> = order.iter().map(|&index| stop_ids[index]).collect();
    let legs: Vec<f64> = order
        .windows(2)
        .map(|pair| matrix[pair[0]][pair[1]])
        .collect();

    debug!(
        stops = stop_ids.len(),
        exact = stop_ids.len() <= request.config.exact_stop_limit,
        "itinerary planned"
    );

    let ports = port_names(graph, &ordered_ids);
    Ok(Itinerary::assemble(ports, &legs, &request.cost))
}

fn resolve_port(graph: &PortGraph, name: &str) -> Result<PortId> {
    graph
        .port_id_by_name(name)
        .ok_or_else(|| Error::PortNotFound {
            name: name.to_string(),
        })
}

fn port_names(graph: &PortGraph, ids: &[PortId]) -> Vec<String> {
    ids.iter()
        .map(|&id| graph.port_name(id).unwrap_or("<unknown>").to_string())
        .collect()
}

fn distance_matrix(graph: &PortGraph, stops: &[PortId]) -> Vec<Vec<f64>> {
    let n = stops.len();
    let mut matrix = vec![vec![f64::INFINITY; n]; n];

    for (i, &from) in stops.iter().enumerate() {
        matrix[i][i] = 0.0;
        for (j, &to) in stops.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(edge) = graph.direct_edge(from, to) {
                matrix[i][j] = edge.distance_km;
            }
        }
    }

    matrix
}
