use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use archipelago_lib::{
    plan_itinerary, Error, GraphStore, ItineraryRequest, PlannerConfig, PortGraph, SearchGuard,
};

mod common;
use common::{equator_store, graph_port, link};

/// Fully connected four-port graph with one clearly best tour.
fn quad_graph() -> PortGraph {
    let ports = vec![
        graph_port(1, "One"),
        graph_port(2, "Two"),
        graph_port(3, "Three"),
        graph_port(4, "Four"),
    ];
    let mut edges = Vec::new();
    link(&mut edges, 1, 2, 10.0);
    link(&mut edges, 1, 3, 15.0);
    link(&mut edges, 1, 4, 20.0);
    link(&mut edges, 2, 3, 35.0);
    link(&mut edges, 2, 4, 25.0);
    link(&mut edges, 3, 4, 30.0);
    PortGraph::from_parts(ports, edges)
}

/// Chain One - Two - ... - Five with unit edges and no shortcuts.
fn chain_graph() -> PortGraph {
    let names = ["One", "Two", "Three", "Four", "Five"];
    let ports = names
        .iter()
        .enumerate()
        .map(|(index, &name)| graph_port(index as i64 + 1, name))
        .collect();
    let mut edges = Vec::new();
    for id in 1..names.len() as i64 {
        link(&mut edges, id, id + 1, 1.0);
    }
    PortGraph::from_parts(ports, edges)
}

fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for (index, &item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(index);
        for mut tail in permutations(&rest) {
            tail.insert(0, item);
            result.push(tail);
        }
    }
    result
}

#[test]
fn a_single_stop_yields_an_empty_plan() {
    let graph = equator_store().snapshot().unwrap();

    let itinerary =
        plan_itinerary(&graph, &ItineraryRequest::new(vec!["Alpha".to_string()])).unwrap();

    assert_eq!(itinerary.ports, vec!["Alpha"]);
    assert_eq!(itinerary.segment_count(), 0);
    assert_eq!(itinerary.total_distance_km, 0.0);
    assert_eq!(itinerary.total_minutes, 0.0);
    assert_eq!(itinerary.total_fuel_units, 0.0);
}

#[test]
fn no_stops_is_an_error() {
    let graph = equator_store().snapshot().unwrap();
    assert!(matches!(
        plan_itinerary(&graph, &ItineraryRequest::new(Vec::new())),
        Err(Error::EmptyPortList)
    ));
}

#[test]
fn unknown_stops_are_reported() {
    let graph = equator_store().snapshot().unwrap();
    let request = ItineraryRequest::new(vec!["Alpha".to_string(), "Zulu".to_string()]);
    assert!(matches!(
        plan_itinerary(&graph, &request),
        Err(Error::PortNotFound { name }) if name == "Zulu"
    ));
}

#[test]
fn exact_planner_matches_brute_force() {
    let graph = quad_graph();
    let stops: Vec<String> = ["One", "Two", "Three", "Four"]
        .iter()
        .map(ToString::to_string)
        .collect();

    let itinerary = plan_itinerary(&graph, &ItineraryRequest::new(stops)).unwrap();

    // Enumerate every visiting order over the same distances.
    let matrix = [
        [0.0, 10.0, 15.0, 20.0],
        [10.0, 0.0, 35.0, 25.0],
        [15.0, 35.0, 0.0, 30.0],
        [20.0, 25.0, 30.0, 0.0],
    ];
    let best = permutations(&[0, 1, 2, 3])
        .into_iter()
        .map(|order| {
            order
                .windows(2)
                .map(|pair| matrix[pair[0]][pair[1]])
                .sum::<f64>()
        })
        .fold(f64::INFINITY, f64::min);

    assert_eq!(itinerary.total_distance_km, best);
    assert_eq!(itinerary.segment_count(), 3);
}

#[test]
fn a_fixed_start_leads_the_order() {
    let graph = quad_graph();
    let stops: Vec<String> = ["Two", "Three", "Four"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let request = ItineraryRequest::new(stops).with_start("One");

    let itinerary = plan_itinerary(&graph, &request).unwrap();

    assert_eq!(itinerary.ports[0], "One");
    assert_eq!(itinerary.ports.len(), 4);
}

#[test]
fn a_start_already_among_the_stops_is_not_duplicated() {
    let graph = quad_graph();
    let stops: Vec<String> = ["One", "Two", "Three"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let request = ItineraryRequest::new(stops).with_start("One");

    let itinerary = plan_itinerary(&graph, &request).unwrap();

    assert_eq!(itinerary.ports[0], "One");
    assert_eq!(itinerary.ports.len(), 3);
    assert_eq!(
        itinerary.ports.iter().filter(|name| *name == "One").count(),
        1
    );
}

#[test]
fn totals_are_the_exact_sum_of_segment_distances() {
    let graph = chain_graph();
    let stops: Vec<String> = ["One", "Two", "Three", "Four", "Five"]
        .iter()
        .map(ToString::to_string)
        .collect();

    let itinerary = plan_itinerary(&graph, &ItineraryRequest::new(stops)).unwrap();

    let leg_sum: f64 = itinerary
        .segments
        .iter()
        .map(|segment| segment.distance_km)
        .sum();
    assert_eq!(itinerary.total_distance_km, leg_sum);
    assert_eq!(itinerary.total_distance_km, 4.0);
}

#[test]
fn cost_totals_follow_the_default_model() {
    // A 300 km chain: 90 minutes at 200 km/h, 60 units at 0.20 per km.
    let ports = vec![
        graph_port(1, "One"),
        graph_port(2, "Two"),
        graph_port(3, "Three"),
    ];
    let mut edges = Vec::new();
    link(&mut edges, 1, 2, 100.0);
    link(&mut edges, 2, 3, 200.0);
    let graph = PortGraph::from_parts(ports, edges);

    let stops: Vec<String> = ["One", "Two", "Three"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let request = ItineraryRequest::new(stops).with_start("One");
    let itinerary = plan_itinerary(&graph, &request).unwrap();

    assert_eq!(itinerary.total_distance_km, 300.0);
    assert!((itinerary.total_minutes - 90.0).abs() < 1e-9);
    assert!((itinerary.total_fuel_units - 60.0).abs() < 1e-9);
}

#[test]
fn missing_direct_routes_make_a_fixed_start_plan_infeasible() {
    // From Alpha both remaining stops need the absent Bravo-Charlie
    // edge, so no complete order exists.
    let graph = equator_store().snapshot().unwrap();
    let stops: Vec<String> = ["Bravo", "Charlie"].iter().map(ToString::to_string).collect();
    let request = ItineraryRequest::new(stops).with_start("Alpha");

    assert!(matches!(
        plan_itinerary(&graph, &request),
        Err(Error::NoFeasibleRoute)
    ));
}

#[test]
fn a_free_start_can_rescue_an_otherwise_infeasible_request() {
    // Without a pinned start the planner may begin at Bravo and pass
    // through Alpha, which direct routes support.
    let graph = equator_store().snapshot().unwrap();
    let stops: Vec<String> = ["Bravo", "Alpha", "Charlie"]
        .iter()
        .map(ToString::to_string)
        .collect();

    let itinerary = plan_itinerary(&graph, &ItineraryRequest::new(stops)).unwrap();

    assert_eq!(itinerary.ports[1], "Alpha");
    assert_eq!(itinerary.segment_count(), 2);
}

#[test]
fn requests_beyond_the_stop_cap_are_rejected_upfront() {
    let graph = quad_graph();
    let stops: Vec<String> = ["One", "Two", "Three", "Four"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let config = PlannerConfig {
        exact_stop_limit: 12,
        max_stops: 3,
    };
    let request = ItineraryRequest::new(stops).with_config(config);

    assert!(matches!(
        plan_itinerary(&graph, &request),
        Err(Error::TooManyStops {
            requested: 4,
            limit: 3
        })
    ));
}

#[test]
fn the_heuristic_planner_still_orders_a_chain() {
    // Force the heuristic path by lowering the exact limit below the
    // stop count. On a shortcut-free chain only the end-to-end walk
    // is feasible.
    let graph = chain_graph();
    let stops: Vec<String> = ["One", "Two", "Three", "Four", "Five"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let config = PlannerConfig {
        exact_stop_limit: 2,
        max_stops: 20,
    };
    let request = ItineraryRequest::new(stops)
        .with_start("One")
        .with_config(config);

    let itinerary = plan_itinerary(&graph, &request).unwrap();

    assert_eq!(
        itinerary.ports,
        vec!["One", "Two", "Three", "Four", "Five"]
    );
    assert_eq!(itinerary.total_distance_km, 4.0);
}

#[test]
fn a_tripped_guard_aborts_planning() {
    let graph = quad_graph();
    let stops: Vec<String> = ["One", "Two", "Three", "Four"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let flag = Arc::new(AtomicBool::new(true));
    let request = ItineraryRequest::new(stops).with_guard(SearchGuard::with_flag(flag));

    assert!(matches!(
        plan_itinerary(&graph, &request),
        Err(Error::Cancelled)
    ));
}
