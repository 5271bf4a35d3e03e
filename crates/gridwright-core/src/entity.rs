//! Buildable entities and the arena they live in.
//!
//! Entities are a tagged union of buildable variants ([`Buildable`]). The
//! power engine never reaches into the arena directly: it asks an
//! [`EntityView`] for every entity carrying a set of [`Capability`]s and
//! builds its own derived views from the answer.
//!
//! Position data is optional on both variants. Snapshots may be partially
//! synced, and an entity without a position simply lacks the matching
//! capability, so capability queries skip it.

use gridwright_spatial::{CornerCoordinate, HexCoordinate};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::fixed::Fixed64;
use crate::id::{EntityId, PlayerId};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Fuel burned by a thermal plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Coal,
    Gas,
    Oil,
    Uranium,
    Biomass,
}

/// Generation parameters of a power plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Price charged per kWh delivered.
    pub price_per_kwh: Fixed64,
    /// Maximum energy produced per hour.
    pub max_capacity_kwh: Fixed64,
    /// `None` for plants that burn nothing (wind, solar, hydro).
    pub fuel_type: Option<FuelType>,
    /// Fuel units burned per kWh produced. Zero for fuel-free plants.
    pub fuel_consumption_per_kwh: Fixed64,
}

/// On-site fuel tank of a power plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelStorage {
    pub max: Fixed64,
    /// Current fuel. Kept in `[0, max]` by the apply step.
    pub current: Fixed64,
}

/// A power plant standing on a hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSpec {
    pub generation: Generation,
    pub hex: Option<HexCoordinate>,
    pub fuel: Option<FuelStorage>,
}

/// A power pole standing on a corner.
///
/// `connected_to` is stored one way: pole A may list B while B does not list
/// A. Traversal treats every listed pair as an undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoleSpec {
    pub corner: Option<CornerCoordinate>,
    pub connected_to: Vec<EntityId>,
}

/// Buildable variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Buildable {
    PowerPlant(PlantSpec),
    PowerPole(PoleSpec),
}

/// Discriminant of [`Buildable`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildableKind {
    PowerPlant,
    PowerPole,
}

/// A capability an entity may carry. Queries filter on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Produces power (plants).
    Generation,
    /// Has a hex coordinate.
    HexPosition,
    /// Has a pole connection list.
    Connections,
    /// Has a corner coordinate.
    CornerPosition,
    /// Has a fuel tank.
    FuelStorage,
    /// Has an owning player.
    Ownership,
}

/// A buildable entity and its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub owner: Option<PlayerId>,
    pub buildable: Buildable,
}

impl Entity {
    pub fn plant(owner: Option<PlayerId>, spec: PlantSpec) -> Self {
        Self {
            owner,
            buildable: Buildable::PowerPlant(spec),
        }
    }

    pub fn pole(owner: Option<PlayerId>, spec: PoleSpec) -> Self {
        Self {
            owner,
            buildable: Buildable::PowerPole(spec),
        }
    }

    pub fn kind(&self) -> BuildableKind {
        match self.buildable {
            Buildable::PowerPlant(_) => BuildableKind::PowerPlant,
            Buildable::PowerPole(_) => BuildableKind::PowerPole,
        }
    }

    /// Whether the entity carries a capability.
    pub fn has(&self, capability: Capability) -> bool {
        match (&self.buildable, capability) {
            (_, Capability::Ownership) => self.owner.is_some(),
            (Buildable::PowerPlant(_), Capability::Generation) => true,
            (Buildable::PowerPlant(p), Capability::HexPosition) => p.hex.is_some(),
            (Buildable::PowerPlant(p), Capability::FuelStorage) => p.fuel.is_some(),
            (Buildable::PowerPole(_), Capability::Connections) => true,
            (Buildable::PowerPole(p), Capability::CornerPosition) => p.corner.is_some(),
            _ => false,
        }
    }

    /// Whether the entity carries every listed capability.
    pub fn has_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|&c| self.has(c))
    }

    pub fn as_plant(&self) -> Option<&PlantSpec> {
        match &self.buildable {
            Buildable::PowerPlant(p) => Some(p),
            Buildable::PowerPole(_) => None,
        }
    }

    pub fn as_plant_mut(&mut self) -> Option<&mut PlantSpec> {
        match &mut self.buildable {
            Buildable::PowerPlant(p) => Some(p),
            Buildable::PowerPole(_) => None,
        }
    }

    pub fn as_pole(&self) -> Option<&PoleSpec> {
        match &self.buildable {
            Buildable::PowerPole(p) => Some(p),
            Buildable::PowerPlant(_) => None,
        }
    }

    pub fn as_pole_mut(&mut self) -> Option<&mut PoleSpec> {
        match &mut self.buildable {
            Buildable::PowerPole(p) => Some(p),
            Buildable::PowerPlant(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from arena mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("entity {0:?} does not exist")]
    NotFound(EntityId),
    #[error("entity {0:?} is not a power pole")]
    NotAPole(EntityId),
    #[error("entity {0:?} is not a power plant")]
    NotAPlant(EntityId),
    #[error("power plant {0:?} has no fuel storage")]
    NoFuelStorage(EntityId),
}

// ---------------------------------------------------------------------------
// EntityView
// ---------------------------------------------------------------------------

/// Read-only, capability-filtered access to the entity snapshot.
///
/// Results must come back in a stable order: resolution tie-breaks depend on
/// it.
pub trait EntityView {
    /// Every entity carrying all of `capabilities`.
    fn query(&self, capabilities: &[Capability]) -> Vec<(EntityId, &Entity)>;

    /// A single entity by id.
    fn entity(&self, id: EntityId) -> Option<&Entity>;
}

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

/// Slotmap arena of buildable entities.
///
/// Handles are stable across removals, and iteration follows slot order,
/// which makes every query deterministic for a given insertion history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: SlotMap<EntityId, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Remove an entity. Pole connection lists that referenced it are
    /// scrubbed so no dangling edge survives.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        if removed.kind() == BuildableKind::PowerPole {
            for (_, entity) in self.entities.iter_mut() {
                if let Some(pole) = entity.as_pole_mut() {
                    pole.connected_to.retain(|&other| other != id);
                }
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Record a wire from pole `from` to pole `to`. Only `from` lists the
    /// connection. Connecting a pole to itself is a no-op.
    pub fn connect(&mut self, from: EntityId, to: EntityId) -> Result<(), EntityError> {
        let target = self.entities.get(to).ok_or(EntityError::NotFound(to))?;
        if target.kind() != BuildableKind::PowerPole {
            return Err(EntityError::NotAPole(to));
        }
        let source = self
            .entities
            .get_mut(from)
            .ok_or(EntityError::NotFound(from))?;
        let pole = source.as_pole_mut().ok_or(EntityError::NotAPole(from))?;
        if from != to && !pole.connected_to.contains(&to) {
            pole.connected_to.push(to);
        }
        Ok(())
    }

    /// Overwrite a plant's current fuel, clamped to `[0, max]`.
    pub fn set_fuel(&mut self, id: EntityId, level: Fixed64) -> Result<(), EntityError> {
        let entity = self.entities.get_mut(id).ok_or(EntityError::NotFound(id))?;
        let plant = entity.as_plant_mut().ok_or(EntityError::NotAPlant(id))?;
        let fuel = plant.fuel.as_mut().ok_or(EntityError::NoFuelStorage(id))?;
        fuel.current = level.max(Fixed64::ZERO).min(fuel.max);
        Ok(())
    }
}

impl EntityView for EntityStore {
    fn query(&self, capabilities: &[Capability]) -> Vec<(EntityId, &Entity)> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.has_all(capabilities))
            .collect()
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
