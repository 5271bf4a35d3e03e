//! Derived plant and pole views, rebuilt from the entity snapshot on every
//! call.

use gridwright_core::entity::{Capability, Entity, EntityView, FuelStorage, FuelType};
use gridwright_core::fixed::Fixed64;
use gridwright_core::id::{EntityId, PlayerId};
use gridwright_spatial::{CornerCoordinate, HexCoordinate};
use serde::{Deserialize, Serialize};

use crate::network::PoleNetwork;

/// Capabilities an entity needs to be treated as a power plant.
pub const PLANT_CAPABILITIES: [Capability; 2] = [Capability::Generation, Capability::HexPosition];

/// Capabilities an entity needs to be treated as a power pole.
pub const POLE_CAPABILITIES: [Capability; 2] =
    [Capability::Connections, Capability::CornerPosition];

// ---------------------------------------------------------------------------
// PowerPlant
// ---------------------------------------------------------------------------

/// A generating entity as seen by one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPlant {
    pub id: EntityId,
    pub owner: Option<PlayerId>,
    pub price_per_kwh: Fixed64,
    pub max_capacity_kwh: Fixed64,
    /// Capacity still unsold this cycle. Reset by [`PowerPlant::reset_capacity`].
    pub remaining_capacity_kwh: Fixed64,
    pub hex: HexCoordinate,
    pub fuel_type: Option<FuelType>,
    pub fuel_consumption_per_kwh: Fixed64,
    pub fuel: Option<FuelStorage>,
}

impl PowerPlant {
    /// Build the view. Returns `None` for non-plants and plants without a hex.
    pub fn from_entity(id: EntityId, entity: &Entity) -> Option<Self> {
        let spec = entity.as_plant()?;
        let hex = spec.hex?;
        Some(Self {
            id,
            owner: entity.owner,
            price_per_kwh: spec.generation.price_per_kwh,
            max_capacity_kwh: spec.generation.max_capacity_kwh,
            remaining_capacity_kwh: spec.generation.max_capacity_kwh,
            hex,
            fuel_type: spec.generation.fuel_type,
            fuel_consumption_per_kwh: spec.generation.fuel_consumption_per_kwh,
            fuel: spec.fuel,
        })
    }

    /// Fuel on hand. A plant without a tank has none.
    pub fn current_fuel(&self) -> Fixed64 {
        self.fuel.map(|f| f.current).unwrap_or(Fixed64::ZERO)
    }

    /// Whether the tank holds enough fuel to produce a single kWh.
    pub fn can_generate(&self) -> bool {
        self.current_fuel() >= self.fuel_consumption_per_kwh
    }

    /// Start-of-cycle reset: full capacity if fuelled, otherwise offline.
    ///
    /// The check is against the per-kWh rate, not the potential output, so a
    /// plant low on fuel still runs at full nominal capacity this cycle.
    pub fn reset_capacity(&mut self) {
        self.remaining_capacity_kwh = if self.can_generate() {
            self.max_capacity_kwh
        } else {
            Fixed64::ZERO
        };
    }

    /// Energy sold so far this cycle.
    pub fn generated_kwh(&self) -> Fixed64 {
        self.max_capacity_kwh - self.remaining_capacity_kwh
    }
}

// ---------------------------------------------------------------------------
// PowerPole
// ---------------------------------------------------------------------------

/// A pole as seen by one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerPole {
    pub id: EntityId,
    pub owner: Option<PlayerId>,
    pub corner: CornerCoordinate,
    /// Stored one way; see [`PoleNetwork`] for the undirected form.
    pub connected_to_ids: Vec<EntityId>,
}

impl PowerPole {
    /// Build the view. Returns `None` for non-poles and poles without a corner.
    pub fn from_entity(id: EntityId, entity: &Entity) -> Option<Self> {
        let spec = entity.as_pole()?;
        let corner = spec.corner?;
        Some(Self {
            id,
            owner: entity.owner,
            corner,
            connected_to_ids: spec.connected_to.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// PowerSnapshot
// ---------------------------------------------------------------------------

/// Plants, poles and the undirected pole network captured from one view.
#[derive(Debug, Clone)]
pub struct PowerSnapshot {
    pub plants: Vec<PowerPlant>,
    pub poles: Vec<PowerPole>,
    pub network: PoleNetwork,
}

impl PowerSnapshot {
    /// Query the view and build every derived structure.
    ///
    /// Entities missing position data never match the capability query and
    /// are skipped.
    pub fn capture(view: &dyn EntityView) -> Self {
        let plants: Vec<PowerPlant> = view
            .query(&PLANT_CAPABILITIES)
            .into_iter()
            .filter_map(|(id, entity)| PowerPlant::from_entity(id, entity))
            .collect();
        let poles: Vec<PowerPole> = view
            .query(&POLE_CAPABILITIES)
            .into_iter()
            .filter_map(|(id, entity)| PowerPole::from_entity(id, entity))
            .collect();

        let unplaced_plants = view.query(&[Capability::Generation]).len() - plants.len();
        let unplaced_poles = view.query(&[Capability::Connections]).len() - poles.len();
        if unplaced_plants > 0 || unplaced_poles > 0 {
            log::debug!(
                "skipping {unplaced_plants} plants and {unplaced_poles} poles without position data"
            );
        }

        let network = PoleNetwork::build(&plants, &poles);
        Self {
            plants,
            poles,
            network,
        }
    }

    pub fn plant(&self, id: EntityId) -> Option<&PowerPlant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn pole(&self, id: EntityId) -> Option<&PowerPole> {
        self.poles.iter().find(|p| p.id == id)
    }
}
