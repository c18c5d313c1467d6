//! Conversion of route distances into planning-grade time and fuel
//! estimates.
//!
//! The constants approximate a generic seaplane; per-aircraft figures
//! belong to the fleet service and are refined downstream.

use serde::{Deserialize, Serialize};

/// Default cruise speed of a seaplane in km/h.
pub const DEFAULT_CRUISE_SPEED_KMH: f64 = 200.0;

/// Default fuel consumption in units per kilometre flown.
pub const DEFAULT_FUEL_RATE_PER_KM: f64 = 0.20;

/// Fixed physical constants used to derive flight time and fuel
/// consumption from a distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub cruise_speed_kmh: f64,
    pub fuel_rate_per_km: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: DEFAULT_CRUISE_SPEED_KMH,
            fuel_rate_per_km: DEFAULT_FUEL_RATE_PER_KM,
        }
    }
}

impl CostModel {
    /// Estimated flight time in minutes for a distance in kilometres.
    pub fn flight_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.cruise_speed_kmh * 60.0
    }

    /// Estimated fuel consumption in units for a distance in kilometres.
    pub fn fuel_units(&self, distance_km: f64) -> f64 {
        distance_km * self.fuel_rate_per_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants_match_planning_estimates() {
        let model = CostModel::default();
        assert_eq!(model.flight_minutes(300.0), 90.0);
        assert_eq!(model.fuel_units(300.0), 60.0);
    }

    #[test]
    fn zero_distance_costs_nothing() {
        let model = CostModel::default();
        assert_eq!(model.flight_minutes(0.0), 0.0);
        assert_eq!(model.fuel_units(0.0), 0.0);
    }
}
