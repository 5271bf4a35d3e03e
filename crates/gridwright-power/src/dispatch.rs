//! Dispatch resolver: one production cycle over a captured snapshot.
//!
//! # Phases
//!
//! Every call runs the same phases, in order, with no interleaving:
//!
//! 1. **Refresh** -- compile grids and consumers from the snapshot.
//! 2. **Reset** -- plants regain full capacity if they hold fuel for at least
//!    one kWh (otherwise zero); grids clear usage and blackout; consumers
//!    regain full demand.
//! 3. **Blackout detection** -- a consumer whose reachable grids cannot cover
//!    its demand blacks out *every* grid it reaches, including grids with
//!    spare capacity.
//! 4. **Dispatch** -- each consumer buys from its cheapest reachable plant
//!    (ties to the first discovered) until satisfied or out of sources.
//! 5. **Fuel** -- each plant burns fuel for what it generated, floored at
//!    zero.
//!
//! The snapshot is never touched; everything lands in a [`DispatchResult`]
//! that the caller commits with [`crate::apply::apply_dispatch`].

use std::collections::{BTreeMap, BTreeSet};

use gridwright_core::fixed::Fixed64;
use gridwright_core::id::{EntityId, PlayerId};
use gridwright_spatial::{HexCoordinate, HexGrid};
use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::consumer::{Consumer, build_consumers};
use crate::grid::{Grid, GridIndex, compile_grids};
use crate::view::{PowerPlant, PowerSnapshot};

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Errors from encoding a result.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// How one consumer fared this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerOutcome {
    pub hex: HexCoordinate,
    pub demand_kwh: Fixed64,
    pub supplied_kwh: Fixed64,
}

impl ConsumerOutcome {
    pub fn unserved_kwh(&self) -> Fixed64 {
        self.demand_kwh - self.supplied_kwh
    }
}

/// Outcome of one resolution cycle. A plain value: nothing is committed
/// until the caller applies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub income_per_player: BTreeMap<PlayerId, Fixed64>,
    pub power_sold_per_player_kwh: BTreeMap<PlayerId, Fixed64>,
    pub grids: Vec<Grid>,
    /// Fuel left in every plant that has a tank.
    pub current_fuel_storage_by_plant_id: BTreeMap<EntityId, Fixed64>,
    /// Energy produced by every plant, zero included.
    pub generated_by_plant_kwh: BTreeMap<EntityId, Fixed64>,
    pub consumers: Vec<ConsumerOutcome>,
}

impl DispatchResult {
    /// Stable binary encoding. Identical snapshots encode identically.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        bitcode::serialize(self).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// The grid a plant belongs to.
    pub fn grid_of(&self, plant: EntityId) -> Option<&Grid> {
        self.grids.iter().find(|g| g.contains_plant(plant))
    }

    pub fn blacked_out_grids(&self) -> impl Iterator<Item = &Grid> {
        self.grids.iter().filter(|g| g.blackout)
    }

    pub fn total_supplied_kwh(&self) -> Fixed64 {
        self.consumers
            .iter()
            .fold(Fixed64::ZERO, |acc, c| acc.saturating_add(c.supplied_kwh))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Run one production cycle.
pub fn resolve(
    snapshot: &PowerSnapshot,
    hex_grid: &HexGrid,
    config: &DispatchConfig,
) -> DispatchResult {
    // Refresh.
    let mut plants: Vec<PowerPlant> = snapshot.plants.clone();
    let plant_index: BTreeMap<EntityId, usize> =
        plants.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let mut grids = compile_grids(&plants, &snapshot.network);
    let grid_index = GridIndex::new(&grids);
    let mut consumers = build_consumers(hex_grid, &snapshot.network, config);

    // Reset.
    for plant in &mut plants {
        plant.reset_capacity();
    }
    for grid in &mut grids {
        grid.reset();
    }
    for consumer in &mut consumers {
        consumer.reset();
    }

    detect_blackouts(&consumers, &mut grids, &grid_index);

    let mut sales = Sales::default();
    for consumer in &mut consumers {
        dispatch_consumer(
            consumer,
            &mut plants,
            &plant_index,
            &mut grids,
            &grid_index,
            &mut sales,
        );
    }

    let (current_fuel_storage_by_plant_id, generated_by_plant_kwh) = consume_fuel(&plants);

    log::debug!(
        "resolved {} consumers across {} grids",
        consumers.len(),
        grids.len()
    );

    DispatchResult {
        income_per_player: sales.income,
        power_sold_per_player_kwh: sales.energy,
        grids,
        current_fuel_storage_by_plant_id,
        generated_by_plant_kwh,
        consumers: consumers
            .iter()
            .map(|c| ConsumerOutcome {
                hex: c.hex,
                demand_kwh: c.demand_kwh,
                supplied_kwh: c.supplied_kwh(),
            })
            .collect(),
    }
}

/// Distinct grids reachable by a consumer, in discovery order.
fn reachable_grids(consumer: &Consumer, grid_index: &GridIndex) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    consumer
        .connected_plants
        .iter()
        .filter_map(|p| grid_index.grid_of_plant(p.plant_id))
        .filter(|&g| seen.insert(g))
        .collect()
}

/// Mark every grid shared with an under-served consumer as blacked out.
fn detect_blackouts(consumers: &[Consumer], grids: &mut [Grid], grid_index: &GridIndex) {
    for consumer in consumers {
        let reachable = reachable_grids(consumer, grid_index);
        let capacity = reachable
            .iter()
            .fold(Fixed64::ZERO, |acc, &g| acc.saturating_add(grids[g].total_capacity_kwh));
        if capacity < consumer.demand_kwh {
            for &g in &reachable {
                if !grids[g].blackout {
                    log::info!(
                        "grid {:?} blacked out: consumer at {} needs {} kWh, reachable capacity {}",
                        grids[g].id,
                        consumer.hex,
                        consumer.demand_kwh,
                        capacity
                    );
                }
                grids[g].blackout = true;
            }
        }
    }
}

#[derive(Default)]
struct Sales {
    income: BTreeMap<PlayerId, Fixed64>,
    energy: BTreeMap<PlayerId, Fixed64>,
}

impl Sales {
    fn record(&mut self, owner: Option<PlayerId>, supplied: Fixed64, price: Fixed64) {
        let Some(owner) = owner else {
            return;
        };
        // Saturate rather than overflow on extreme capacities or prices.
        let energy = self.energy.entry(owner).or_insert(Fixed64::ZERO);
        *energy = energy.saturating_add(supplied);
        let income = self.income.entry(owner).or_insert(Fixed64::ZERO);
        *income = income.saturating_add(supplied.saturating_mul(price));
    }
}

/// Merit-order allocation for one consumer.
fn dispatch_consumer(
    consumer: &mut Consumer,
    plants: &mut [PowerPlant],
    plant_index: &BTreeMap<EntityId, usize>,
    grids: &mut [Grid],
    grid_index: &GridIndex,
    sales: &mut Sales,
) {
    let reachable = reachable_grids(consumer, grid_index);
    if reachable.iter().all(|&g| grids[g].blackout) {
        return;
    }

    while consumer.remaining_demand_kwh > Fixed64::ZERO {
        let mut cheapest: Option<(usize, usize)> = None;
        for found in &consumer.connected_plants {
            let Some(&p) = plant_index.get(&found.plant_id) else {
                continue;
            };
            let Some(g) = grid_index.grid_of_plant(found.plant_id) else {
                continue;
            };
            if plants[p].remaining_capacity_kwh <= Fixed64::ZERO || grids[g].blackout {
                continue;
            }
            // Strict comparison keeps the earliest-discovered plant on ties.
            match cheapest {
                Some((best, _)) if plants[best].price_per_kwh <= plants[p].price_per_kwh => {}
                _ => cheapest = Some((p, g)),
            }
        }

        let Some((p, g)) = cheapest else {
            break;
        };
        let plant = &mut plants[p];
        let supplied = consumer
            .remaining_demand_kwh
            .min(plant.remaining_capacity_kwh);
        consumer.remaining_demand_kwh -= supplied;
        plant.remaining_capacity_kwh -= supplied;
        grids[g].used_capacity_kwh = grids[g].used_capacity_kwh.saturating_add(supplied);
        sales.record(plant.owner, supplied, plant.price_per_kwh);
    }
}

/// Burn fuel for generated energy. Returns the fuel left per tanked plant
/// and the energy generated per plant.
fn consume_fuel(
    plants: &[PowerPlant],
) -> (BTreeMap<EntityId, Fixed64>, BTreeMap<EntityId, Fixed64>) {
    let mut fuel_left = BTreeMap::new();
    let mut generated = BTreeMap::new();

    for plant in plants {
        let output = plant.generated_kwh();
        generated.insert(plant.id, output);

        let Some(tank) = plant.fuel else {
            continue;
        };
        let mut current = tank.current;
        if output > Fixed64::ZERO {
            let burned = output.saturating_mul(plant.fuel_consumption_per_kwh);
            current = current.saturating_sub(burned).max(Fixed64::ZERO);
        }
        fuel_left.insert(plant.id, current);
    }

    (fuel_left, generated)
}

// ===========================================================================
// Tests
// ===========================================================================
