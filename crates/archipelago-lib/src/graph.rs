use std::collections::HashMap;

use crate::store::{Port, PortId};

/// Directed weighted edge within the routing graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: PortId,
    pub distance_km: f64,
    pub flight_minutes: f64,
}

/// In-memory snapshot of the port network used by the pathfinding and
/// itinerary engines.
///
/// A snapshot is taken per query from the backing [`GraphStore`]
/// (`crate::store::GraphStore`), so searches never observe a
/// half-applied mutation. Adjacency lists are kept sorted by target
/// identifier to make equal-cost search results reproducible.
#[derive(Debug, Clone, Default)]
pub struct PortGraph {
    ports: HashMap<PortId, Port>,
    name_to_id: HashMap<String, PortId>,
    adjacency: HashMap<PortId, Vec<Edge>>,
}

impl PortGraph {
    /// Assemble a graph from port records and directed edges.
    pub fn from_parts(ports: Vec<Port>, edges: Vec<(PortId, Edge)>) -> Self {
        let mut adjacency: HashMap<PortId, Vec<Edge>> = HashMap::new();
        let mut name_to_id = HashMap::new();
        let mut by_id = HashMap::new();

        for port in ports {
            adjacency.entry(port.id).or_default();
            name_to_id.insert(port.name.clone(), port.id);
            by_id.insert(port.id, port);
        }

        for (origin, edge) in edges {
            if let Some(out) = adjacency.get_mut(&origin) {
                out.push(edge);
            }
        }

        for out in adjacency.values_mut() {
            out.sort_by_key(|edge| edge.target);
        }

        Self {
            ports: by_id,
            name_to_id,
            adjacency,
        }
    }

    /// Lookup a port identifier by its case-sensitive name.
    pub fn port_id_by_name(&self, name: &str) -> Option<PortId> {
        self.name_to_id.get(name).copied()
    }

    /// Lookup a port record by identifier.
    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(&id)
    }

    /// Lookup a port name by identifier.
    pub fn port_name(&self, id: PortId) -> Option<&str> {
        self.ports.get(&id).map(|port| port.name.as_str())
    }

    /// Return the outgoing edges for a given port identifier.
    pub fn neighbours(&self, id: PortId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Return the direct edge between two ports, if one exists.
    ///
    /// Edges are directional: the presence of the reverse edge is
    /// never inferred from the forward one.
    pub fn direct_edge(&self, origin: PortId, destination: PortId) -> Option<&Edge> {
        self.neighbours(origin)
            .iter()
            .find(|edge| edge.target == destination)
    }

    /// Number of ports in the snapshot.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}
