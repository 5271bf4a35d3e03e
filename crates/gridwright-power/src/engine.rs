//! Engine facade: binds the resolver to a host's entity view and map.
//!
//! The engine keeps no state between calls beyond the borrowed world and
//! the dispatch config. Every operation captures a fresh
//! [`PowerSnapshot`], so results always reflect the view as it is now.

use gridwright_core::entity::EntityView;
use gridwright_spatial::{HexCoordinate, HexGrid};

use crate::config::DispatchConfig;
use crate::dispatch::{DispatchResult, resolve};
use crate::grid::{Grid, compile_grids};
use crate::network::ConnectedPlants;
use crate::placement::{PlacementOutcome, PlacementRequest, validate_buildable_placement};
use crate::view::PowerSnapshot;

/// Errors from misusing the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("power engine used before initialize() supplied an entity view")]
    NotInitialized,
}

#[derive(Clone, Copy)]
struct World<'w> {
    entities: &'w dyn EntityView,
    hex_grid: &'w HexGrid,
}

/// Power distribution over a borrowed world.
pub struct PowerEngine<'w> {
    config: DispatchConfig,
    world: Option<World<'w>>,
}

impl Default for PowerEngine<'_> {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl<'w> PowerEngine<'w> {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            world: None,
        }
    }

    /// Supply the entity view and map. Calling again replaces both.
    pub fn initialize(&mut self, entities: &'w dyn EntityView, hex_grid: &'w HexGrid) {
        self.world = Some(World { entities, hex_grid });
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn world(&self) -> Result<World<'w>, EngineError> {
        self.world.ok_or(EngineError::NotInitialized)
    }

    fn snapshot(&self) -> Result<(PowerSnapshot, &'w HexGrid), EngineError> {
        let world = self.world()?;
        Ok((PowerSnapshot::capture(world.entities), world.hex_grid))
    }

    /// Plants reachable from `hex` through pole networks.
    pub fn find_connected_power_plants(
        &self,
        hex: HexCoordinate,
    ) -> Result<ConnectedPlants, EngineError> {
        let (snapshot, _) = self.snapshot()?;
        Ok(snapshot.network.find_connected_power_plants(hex))
    }

    /// Partition all plants into grids.
    pub fn compile_grids(&self) -> Result<Vec<Grid>, EngineError> {
        let (snapshot, _) = self.snapshot()?;
        Ok(compile_grids(&snapshot.plants, &snapshot.network))
    }

    /// Run one production cycle. Nothing is written back; see
    /// [`crate::apply::apply_dispatch`].
    pub fn resolve(&self) -> Result<DispatchResult, EngineError> {
        let (snapshot, hex_grid) = self.snapshot()?;
        Ok(resolve(&snapshot, hex_grid, &self.config))
    }

    pub fn validate_buildable_placement(
        &self,
        request: &PlacementRequest,
    ) -> Result<PlacementOutcome, EngineError> {
        let (snapshot, hex_grid) = self.snapshot()?;
        let grids = compile_grids(&snapshot.plants, &snapshot.network);
        Ok(validate_buildable_placement(
            request, &snapshot, &grids, hex_grid,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwright_core::entity::EntityStore;
    use gridwright_core::id::PlayerId;
    use gridwright_core::test_utils::*;

    #[test]
    fn operations_fail_before_initialize() {
        let engine = PowerEngine::default();
        assert!(!engine.is_initialized());
        assert_eq!(
            engine.find_connected_power_plants(hex(0, 0)).unwrap_err(),
            EngineError::NotInitialized
        );
        assert_eq!(engine.compile_grids().unwrap_err(), EngineError::NotInitialized);
        assert_eq!(engine.resolve().unwrap_err(), EngineError::NotInitialized);
        let request = PlacementRequest::plant(PlayerId(1), hex(0, 0));
        assert_eq!(
            engine.validate_buildable_placement(&request).unwrap_err(),
            EngineError::NotInitialized
        );
    }

    #[test]
    fn engine_reads_the_current_view() {
        let mut store = EntityStore::new();
        let plant = store.insert(simple_plant(Some(PlayerId(1)), hex(0, -1), 100.0, 0.1));
        store.insert(pole_at(Some(PlayerId(1)), north(0, 0)));
        let map = map_with_population(&[(hex(0, 0), 1)]);

        let mut engine = PowerEngine::default();
        engine.initialize(&store, &map);
        assert!(engine.is_initialized());

        let reach = engine.find_connected_power_plants(hex(0, 0)).unwrap();
        assert_eq!(reach.connected_plants.len(), 1);
        assert_eq!(reach.connected_plants[0].plant_id, plant);

        let grids = engine.compile_grids().unwrap();
        assert_eq!(grids.len(), 1);

        let result = engine.resolve().unwrap();
        assert_eq!(result.power_sold_per_player_kwh[&PlayerId(1)], fixed(10.0));
    }

    #[test]
    fn resolve_is_idempotent_without_apply() {
        let mut store = EntityStore::new();
        store.insert(coal_plant(Some(PlayerId(1)), hex(0, -1), 100.0, 0.1, 0.5, 40.0));
        store.insert(pole_at(Some(PlayerId(1)), north(0, 0)));
        let map = map_with_population(&[(hex(0, 0), 2)]);

        let mut engine = PowerEngine::default();
        engine.initialize(&store, &map);
        let first = engine.resolve().unwrap();
        let second = engine.resolve().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
    }

    #[test]
    fn custom_demand_table_is_used() {
        let mut store = EntityStore::new();
        let plant = store.insert(simple_plant(None, hex(0, -1), 100.0, 0.1));
        store.insert(pole_at(None, north(0, 0)));
        let map = map_with_population(&[(hex(0, 0), 1)]);

        let config = DispatchConfig {
            demand_by_tier: vec![0, 7],
        };
        let mut engine = PowerEngine::new(config);
        engine.initialize(&store, &map);
        let result = engine.resolve().unwrap();
        assert_eq!(result.generated_by_plant_kwh[&plant], fixed(7.0));
    }

    #[test]
    fn placement_through_engine() {
        let store = EntityStore::new();
        let map = region_map("east", 4, 4);
        let mut engine = PowerEngine::default();
        engine.initialize(&store, &map);

        let first = PlacementRequest::plant(PlayerId(3), hex(1, 1));
        assert!(engine.validate_buildable_placement(&first).unwrap().valid);
    }
}
