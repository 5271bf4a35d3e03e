//! Consumers: populated map cells and the plants that can reach them.

use gridwright_core::fixed::Fixed64;
use gridwright_spatial::{HexCoordinate, HexGrid};
use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::network::{PlantPath, PoleNetwork};

/// A populated cell drawing power this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    pub hex: HexCoordinate,
    pub population: u8,
    pub demand_kwh: Fixed64,
    pub remaining_demand_kwh: Fixed64,
    /// Reachable plants with their shortest pole paths, in discovery order.
    pub connected_plants: Vec<PlantPath>,
}

impl Consumer {
    pub fn reset(&mut self) {
        self.remaining_demand_kwh = self.demand_kwh;
    }

    pub fn supplied_kwh(&self) -> Fixed64 {
        self.demand_kwh - self.remaining_demand_kwh
    }

    pub fn is_satisfied(&self) -> bool {
        self.remaining_demand_kwh <= Fixed64::ZERO
    }
}

/// One consumer per populated cell, in map order.
pub fn build_consumers(
    hex_grid: &HexGrid,
    network: &PoleNetwork,
    config: &DispatchConfig,
) -> Vec<Consumer> {
    hex_grid
        .populated_cells()
        .map(|(&hex, cell)| {
            let demand = config.demand_for_tier(cell.population);
            Consumer {
                hex,
                population: cell.population,
                demand_kwh: demand,
                remaining_demand_kwh: demand,
                connected_plants: network.find_connected_power_plants(hex).connected_plants,
            }
        })
        .collect()
}
