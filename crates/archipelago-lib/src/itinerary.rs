//! Visiting-order optimization over a set of ports.
//!
//! The planner solves a shortest-Hamiltonian-path problem over the
//! direct route edges between the requested ports. Small requests are
//! solved exactly with Held-Karp dynamic programming over subsets;
//! larger ones fall back to a greedy nearest-port construction
//! followed by 2-opt improvement. Missing direct edges carry infinite
//! cost, so an ordering that would need one is never produced.

use serde::Serialize;

use crate::cost::CostModel;
use crate::error::Result;
use crate::path::SearchGuard;

/// Improvement threshold for 2-opt swaps, guarding against float noise.
const TWO_OPT_EPSILON: f64 = 1e-9;

/// Size limits applied to itinerary requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Largest stop count solved exactly with Held-Karp. The DP table
    /// is `2^n x n`, so this bounds memory explicitly.
    pub exact_stop_limit: usize,
    /// Hard cap on stops per request; larger requests are rejected
    /// before any computation starts.
    pub max_stops: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exact_stop_limit: 12,
            max_stops: 20,
        }
    }
}

/// One leg of an itinerary, between two consecutive ports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub flight_minutes: f64,
}

/// A computed visiting plan with derived cost totals. Ephemeral: it
/// exists only as a query result and is owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub ports: Vec<String>,
    pub segments: Vec<Segment>,
    pub total_distance_km: f64,
    pub total_minutes: f64,
    pub total_fuel_units: f64,
}

impl Itinerary {
    /// Assemble an itinerary from an ordered port sequence and the
    /// per-leg distances between consecutive ports.
    pub(crate) fn assemble(ports: Vec<String>, leg_distances: &[f64], cost: &CostModel) -> Self {
        debug_assert_eq!(leg_distances.len(), ports.len().saturating_sub(1));

        let mut segments = Vec::with_capacity(leg_distances.len());
        let mut total_distance_km = 0.0;
        for (pair, &distance_km) in ports.windows(2).zip(leg_distances) {
            total_distance_km += distance_km;
            segments.push(Segment {
                origin: pair[0].clone(),
                destination: pair[1].clone(),
                distance_km,
                flight_minutes: cost.flight_minutes(distance_km),
            });
        }

        Self {
            ports,
            segments,
            total_distance_km,
            total_minutes: cost.flight_minutes(total_distance_km),
            total_fuel_units: cost.fuel_units(total_distance_km),
        }
    }

    /// Number of legs in the plan.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Find a minimum-distance visiting order over the given distance
/// matrix. `matrix[i][j]` is the direct edge weight from stop `i` to
/// stop `j`, `f64::INFINITY` when no direct route exists.
///
/// Returns `Ok(None)` when no complete ordering is feasible.
pub(crate) fn solve_order(
    matrix: &[Vec<f64>],
    fixed_start: Option<usize>,
    config: &PlannerConfig,
    guard: &SearchGuard,
) -> Result<Option<Vec<usize>>> {
    let n = matrix.len();
    if n <= 1 {
        return Ok(Some((0..n).collect()));
    }

    if n <= config.exact_stop_limit {
        held_karp(matrix, fixed_start, guard)
    } else {
        greedy_two_opt(matrix, fixed_start, guard)
    }
}

/// Exact minimum via dynamic programming over subsets.
///
/// State is `(visited bitmask, last stop) -> min cost`, held in an
/// explicit table with parent pointers for reconstruction. Without a
/// fixed start every stop seeds the table, so the free-start optimum
/// falls out of the same pass.
fn held_karp(
    matrix: &[Vec<f64>],
    fixed_start: Option<usize>,
    guard: &SearchGuard,
) -> Result<Option<Vec<usize>>> {
    let n = matrix.len();
    let full = 1usize << n;

    let mut cost = vec![vec![f64::INFINITY; n]; full];
    let mut parent = vec![vec![usize::MAX; n]; full];

    match fixed_start {
        Some(start) => cost[1 << start][start] = 0.0,
        None => {
            for stop in 0..n {
                cost[1 << stop][stop] = 0.0;
            }
        }
    }

    for mask in 1..full {
        guard.check()?;
        for last in 0..n {
            if mask & (1 << last) == 0 {
                continue;
            }
            let base = cost[mask][last];
            if !base.is_finite() {
                continue;
            }
            for next in 0..n {
                if mask & (1 << next) != 0 {
                    continue;
                }
                let weight = matrix[last][next];
                if !weight.is_finite() {
                    continue;
                }
                let next_mask = mask | (1 << next);
                let candidate = base + weight;
                if candidate < cost[next_mask][next] {
                    cost[next_mask][next] = candidate;
                    parent[next_mask][next] = last;
                }
            }
        }
    }

    let full_mask = full - 1;
    let mut best: Option<(f64, usize)> = None;
    for last in 0..n {
        let total = cost[full_mask][last];
        if total.is_finite() && best.is_none_or(|(previous, _)| total < previous) {
            best = Some((total, last));
        }
    }

    let Some((_, mut last)) = best else {
        return Ok(None);
    };

    let mut order = vec![last];
    let mut mask = full_mask;
    while order.len() < n {
        let previous = parent[mask][last];
        mask &= !(1 << last);
        last = previous;
        order.push(last);
    }
    order.reverse();

    Ok(Some(order))
}

/// Heuristic for stop counts beyond the exact limit: greedy nearest
/// unvisited construction, then pairwise 2-opt reversal until no swap
/// reduces total distance.
fn greedy_two_opt(
    matrix: &[Vec<f64>],
    fixed_start: Option<usize>,
    guard: &SearchGuard,
) -> Result<Option<Vec<usize>>> {
    let n = matrix.len();
    let starts: Vec<usize> = match fixed_start {
        Some(start) => vec![start],
        None => (0..n).collect(),
    };

    let mut best: Option<(f64, Vec<usize>)> = None;
    for start in starts {
        guard.check()?;
        let Some(mut order) = greedy_from(matrix, start) else {
            continue;
        };
        two_opt(matrix, &mut order, fixed_start.is_some(), guard)?;
        let total = order_cost(matrix, &order);
        if total.is_finite() && best.as_ref().is_none_or(|(previous, _)| total < *previous) {
            best = Some((total, order));
        }
    }

    Ok(best.map(|(_, order)| order))
}

fn greedy_from(matrix: &[Vec<f64>], start: usize) -> Option<Vec<usize>> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    visited[start] = true;
    order.push(start);

    let mut current = start;
    while order.len() < n {
        let mut nearest: Option<(f64, usize)> = None;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let weight = matrix[current][candidate];
            if weight.is_finite()
                && nearest.is_none_or(|(previous, _)| weight < previous)
            {
                nearest = Some((weight, candidate));
            }
        }

        let (_, next) = nearest?;
        visited[next] = true;
        order.push(next);
        current = next;
    }

    Some(order)
}

fn two_opt(
    matrix: &[Vec<f64>],
    order: &mut [usize],
    pin_first: bool,
    guard: &SearchGuard,
) -> Result<()> {
    let n = order.len();
    let lowest = usize::from(pin_first);
    let mut current = order_cost(matrix, order);

    loop {
        guard.check()?;
        let mut improved = false;

        for i in lowest..n.saturating_sub(1) {
            for j in (i + 1)..n {
                order[i..=j].reverse();
                let candidate = order_cost(matrix, order);
                if candidate < current - TWO_OPT_EPSILON {
                    current = candidate;
                    improved = true;
                } else {
                    order[i..=j].reverse();
                }
            }
        }

        if !improved {
            return Ok(());
        }
    }
}

fn order_cost(matrix: &[Vec<f64>], order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|pair| matrix[pair[0]][pair[1]])
        .sum()
}
