//! Pole network and the connectivity resolver.
//!
//! Poles store their wires one way. [`PoleNetwork::build`] turns those lists
//! into a symmetric adjacency index once per resolution, together with
//! hex-keyed lookups for the poles touching a cell and the plants standing
//! on it. [`PoleNetwork::find_connected_power_plants`] then runs a
//! breadth-first search over that index.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use gridwright_core::id::EntityId;
use gridwright_spatial::{CornerCoordinate, HexCoordinate};
use serde::{Deserialize, Serialize};

use crate::view::{PowerPlant, PowerPole};

// ---------------------------------------------------------------------------
// Resolver output
// ---------------------------------------------------------------------------

/// A plant reachable from a query origin and the shortest pole path to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantPath {
    pub plant_id: EntityId,
    /// Poles traversed from the origin, first pole first.
    pub path: Vec<EntityId>,
}

/// Everything reachable from one hex through the pole network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPlants {
    /// In discovery order.
    pub connected_plants: Vec<PlantPath>,
    /// Every pole visited, in visit order.
    pub connected_pole_ids: Vec<EntityId>,
}

impl ConnectedPlants {
    pub fn is_empty(&self) -> bool {
        self.connected_plants.is_empty() && self.connected_pole_ids.is_empty()
    }

    pub fn path_to(&self, plant: EntityId) -> Option<&[EntityId]> {
        self.connected_plants
            .iter()
            .find(|p| p.plant_id == plant)
            .map(|p| p.path.as_slice())
    }
}

// ---------------------------------------------------------------------------
// PoleNetwork
// ---------------------------------------------------------------------------

/// Undirected pole adjacency plus hex lookups.
#[derive(Debug, Clone, Default)]
pub struct PoleNetwork {
    corners: BTreeMap<EntityId, CornerCoordinate>,
    /// Own wires first, in stored order, then poles that list this one.
    adjacency: BTreeMap<EntityId, Vec<EntityId>>,
    poles_by_hex: BTreeMap<HexCoordinate, Vec<EntityId>>,
    plants_by_hex: BTreeMap<HexCoordinate, Vec<EntityId>>,
}

impl PoleNetwork {
    /// Index the given plants and poles. Wires pointing at anything that is
    /// not a placed pole are dropped.
    pub fn build(plants: &[PowerPlant], poles: &[PowerPole]) -> Self {
        let mut network = PoleNetwork::default();

        for pole in poles {
            network.corners.insert(pole.id, pole.corner);
            for hex in pole.corner.adjacent_hexes() {
                network.poles_by_hex.entry(hex).or_default().push(pole.id);
            }
        }
        for plant in plants {
            network
                .plants_by_hex
                .entry(plant.hex)
                .or_default()
                .push(plant.id);
        }

        // Forward edges.
        for pole in poles {
            let mut neighbors = Vec::with_capacity(pole.connected_to_ids.len());
            for &target in &pole.connected_to_ids {
                if target == pole.id || neighbors.contains(&target) {
                    continue;
                }
                if !network.corners.contains_key(&target) {
                    log::warn!("pole {:?} lists unknown pole {:?}; ignoring wire", pole.id, target);
                    continue;
                }
                neighbors.push(target);
            }
            network.adjacency.insert(pole.id, neighbors);
        }

        // Reverse edges restore the undirected relation.
        for pole in poles {
            for &target in &pole.connected_to_ids {
                if target == pole.id {
                    continue;
                }
                if let Some(back) = network.adjacency.get_mut(&target) {
                    if !back.contains(&pole.id) {
                        back.push(pole.id);
                    }
                }
            }
        }

        network
    }

    /// Number of indexed poles.
    pub fn pole_count(&self) -> usize {
        self.corners.len()
    }

    pub fn corner_of(&self, pole: EntityId) -> Option<CornerCoordinate> {
        self.corners.get(&pole).copied()
    }

    /// Undirected neighbours of a pole.
    pub fn neighbors(&self, pole: EntityId) -> &[EntityId] {
        self.adjacency.get(&pole).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Poles whose corner touches `hex`.
    pub fn poles_touching(&self, hex: &HexCoordinate) -> &[EntityId] {
        self.poles_by_hex.get(hex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Plants standing on `hex`.
    pub fn plants_at(&self, hex: &HexCoordinate) -> &[EntityId] {
        self.plants_by_hex.get(hex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pole standing on `corner`, if any.
    pub fn pole_at(&self, corner: &CornerCoordinate) -> Option<EntityId> {
        self.poles_touching(&corner.hex)
            .iter()
            .copied()
            .find(|id| self.corners.get(id) == Some(corner))
    }

    /// Breadth-first search from every pole touching `origin`.
    ///
    /// Each plant is recorded on first discovery only. BFS visits poles in
    /// non-decreasing hop count, so every recorded path is a shortest one.
    pub fn find_connected_power_plants(&self, origin: HexCoordinate) -> ConnectedPlants {
        let mut result = ConnectedPlants::default();
        let mut visited: BTreeSet<EntityId> = BTreeSet::new();
        let mut recorded: BTreeSet<EntityId> = BTreeSet::new();

        let mut queue: VecDeque<(EntityId, Vec<EntityId>)> = self
            .poles_touching(&origin)
            .iter()
            .map(|&pole| (pole, Vec::new()))
            .collect();

        while let Some((pole, mut path)) = queue.pop_front() {
            if !visited.insert(pole) {
                continue;
            }
            result.connected_pole_ids.push(pole);
            path.push(pole);

            if let Some(corner) = self.corners.get(&pole) {
                for hex in corner.adjacent_hexes() {
                    for &plant in self.plants_at(&hex) {
                        if recorded.insert(plant) {
                            result.connected_plants.push(PlantPath {
                                plant_id: plant,
                                path: path.clone(),
                            });
                        }
                    }
                }
            }

            for &next in self.neighbors(pole) {
                if !visited.contains(&next) {
                    queue.push_back((next, path.clone()));
                }
            }
        }

        result
    }
}

// ===========================================================================
// Tests
// ===========================================================================
