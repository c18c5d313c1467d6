use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::graph::PortGraph;
use crate::store::PortId;

/// Cooperative cancellation for path and itinerary searches.
///
/// The guard is checked inside the main search loops; a tripped flag
/// or an expired deadline aborts the computation with
/// [`Error::Cancelled`]. Held-Karp is exponential in stop count, so
/// callers issuing large requests should always attach a deadline.
#[derive(Debug, Clone, Default)]
pub struct SearchGuard {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SearchGuard {
    /// A guard that never interrupts the search.
    pub fn none() -> Self {
        Self::default()
    }

    /// Abort the search once the given duration has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// Abort the search when the shared flag is set.
    pub fn with_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            deadline: None,
            cancel: Some(flag),
        }
    }

    /// Return `Err(Cancelled)` if the search should stop.
    pub fn check(&self) -> Result<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::Cancelled);
            }
        }
        if let Some(flag) = &self.cancel {
            if flag.load(AtomicOrdering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        Ok(())
    }
}

/// A minimum-distance path through the port graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub steps: Vec<PortId>,
    pub distance_km: f64,
}

/// Run Dijkstra's algorithm over the directed route graph.
///
/// All edge weights are non-negative route distances. Returns `None`
/// when the two ports lie in disconnected components. Ties between
/// equal-cost paths break on port identifier so results are
/// deterministic for identical graph state.
pub fn find_route_dijkstra(
    graph: &PortGraph,
    start: PortId,
    goal: PortId,
    guard: &SearchGuard,
) -> Result<Option<ShortestPath>> {
    if start == goal {
        return Ok(Some(ShortestPath {
            steps: vec![start],
            distance_km: 0.0,
        }));
    }

    let mut distances: HashMap<PortId, f64> = HashMap::new();
    let mut parents: HashMap<PortId, Option<PortId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        guard.check()?;

        let best = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Ok(Some(ShortestPath {
                steps: reconstruct_path(&parents, start, goal),
                distance_km: best,
            }));
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let next_cost = best + edge.distance_km;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    Ok(None)
}

fn reconstruct_path(
    parents: &HashMap<PortId, Option<PortId>>,
    start: PortId,
    goal: PortId,
) -> Vec<PortId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: PortId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: PortId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_without_limits_never_trips() {
        assert!(SearchGuard::none().check().is_ok());
    }

    #[test]
    fn tripped_flag_cancels() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = SearchGuard::with_flag(flag.clone());
        assert!(guard.check().is_ok());

        flag.store(true, AtomicOrdering::Relaxed);
        assert!(matches!(guard.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn expired_deadline_cancels() {
        let guard = SearchGuard::with_timeout(Duration::from_secs(0));
        assert!(matches!(guard.check(), Err(Error::Cancelled)));
    }
}
