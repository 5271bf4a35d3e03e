//! Grid compiler: partitions plants (and the poles joining them) into
//! electrically independent grids.

use std::collections::{BTreeMap, BTreeSet};

use gridwright_core::fixed::Fixed64;
use gridwright_core::id::EntityId;
use gridwright_spatial::HexCoordinate;
use serde::{Deserialize, Serialize};

use crate::network::PoleNetwork;
use crate::view::PowerPlant;

/// A connected set of plants and poles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Id of the plant that seeded the grid.
    pub id: EntityId,
    pub plant_ids: BTreeSet<EntityId>,
    pub pole_ids: BTreeSet<EntityId>,
    /// Sum of member plants' maximum capacity.
    pub total_capacity_kwh: Fixed64,
    /// Energy dispatched from this grid this cycle.
    pub used_capacity_kwh: Fixed64,
    pub blackout: bool,
}

impl Grid {
    fn seeded_with(plant: &PowerPlant) -> Self {
        Self {
            id: plant.id,
            plant_ids: BTreeSet::from([plant.id]),
            pole_ids: BTreeSet::new(),
            total_capacity_kwh: plant.max_capacity_kwh,
            used_capacity_kwh: Fixed64::ZERO,
            blackout: false,
        }
    }

    pub fn contains_plant(&self, id: EntityId) -> bool {
        self.plant_ids.contains(&id)
    }

    pub fn contains_pole(&self, id: EntityId) -> bool {
        self.pole_ids.contains(&id)
    }

    /// Whether a plant or pole belongs to this grid.
    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.contains_plant(id) || self.contains_pole(id)
    }

    /// Start-of-cycle reset of the transient fields.
    pub fn reset(&mut self) {
        self.used_capacity_kwh = Fixed64::ZERO;
        self.blackout = false;
    }
}

/// Partition every plant into grids.
///
/// Plants are visited in slice order; each unclaimed plant seeds a grid. The
/// resolver then runs from the hex of every plant the grid claims, so a
/// plant touching two pole networks joins both into one grid. Membership is
/// the full connected component whatever order the plants come in. A plant
/// with no adjacent pole ends up alone in its grid.
pub fn compile_grids(plants: &[PowerPlant], network: &PoleNetwork) -> Vec<Grid> {
    let by_id: BTreeMap<EntityId, &PowerPlant> = plants.iter().map(|p| (p.id, p)).collect();
    let mut processed: BTreeSet<EntityId> = BTreeSet::new();
    let mut grids = Vec::new();

    for plant in plants {
        if !processed.insert(plant.id) {
            continue;
        }
        let mut grid = Grid::seeded_with(plant);
        let mut explored: BTreeSet<HexCoordinate> = BTreeSet::new();
        let mut frontier = vec![plant.hex];

        while let Some(hex) = frontier.pop() {
            if !explored.insert(hex) {
                continue;
            }
            let reach = network.find_connected_power_plants(hex);
            for found in &reach.connected_plants {
                if !processed.insert(found.plant_id) {
                    continue;
                }
                grid.plant_ids.insert(found.plant_id);
                if let Some(member) = by_id.get(&found.plant_id) {
                    grid.total_capacity_kwh = grid
                        .total_capacity_kwh
                        .saturating_add(member.max_capacity_kwh);
                    frontier.push(member.hex);
                }
            }
            grid.pole_ids.extend(reach.connected_pole_ids);
        }
        grids.push(grid);
    }

    log::debug!(
        "compiled {} grids from {} plants and {} poles",
        grids.len(),
        plants.len(),
        network.pole_count()
    );
    grids
}

/// Reverse lookup from member entity to grid position.
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    by_plant: BTreeMap<EntityId, usize>,
    by_pole: BTreeMap<EntityId, usize>,
}

impl GridIndex {
    pub fn new(grids: &[Grid]) -> Self {
        let mut index = GridIndex::default();
        for (i, grid) in grids.iter().enumerate() {
            for &plant in &grid.plant_ids {
                index.by_plant.insert(plant, i);
            }
            for &pole in &grid.pole_ids {
                index.by_pole.insert(pole, i);
            }
        }
        index
    }

    /// Position of the grid a plant belongs to.
    pub fn grid_of_plant(&self, plant: EntityId) -> Option<usize> {
        self.by_plant.get(&plant).copied()
    }

    /// Position of the grid a pole belongs to. Poles joined to no plant
    /// belong to none.
    pub fn grid_of_pole(&self, pole: EntityId) -> Option<usize> {
        self.by_pole.get(&pole).copied()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
