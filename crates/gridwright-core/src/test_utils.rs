//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use gridwright_spatial::{CornerCoordinate, HexCoordinate, HexGrid, MapCell};

use crate::entity::*;
use crate::fixed::Fixed64;
use crate::id::{EntityId, PlayerId};

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Coordinates
// ===========================================================================

pub fn hex(q: i32, r: i32) -> HexCoordinate {
    HexCoordinate::new(q, r)
}

pub fn north(q: i32, r: i32) -> CornerCoordinate {
    CornerCoordinate::north(HexCoordinate::new(q, r))
}

pub fn south(q: i32, r: i32) -> CornerCoordinate {
    CornerCoordinate::south(HexCoordinate::new(q, r))
}

// ===========================================================================
// Entity constructors
// ===========================================================================

/// A fuel-free plant (wind, solar, hydro).
pub fn simple_plant(
    owner: Option<PlayerId>,
    at: HexCoordinate,
    capacity: f64,
    price: f64,
) -> Entity {
    Entity::plant(
        owner,
        PlantSpec {
            generation: Generation {
                price_per_kwh: fixed(price),
                max_capacity_kwh: fixed(capacity),
                fuel_type: None,
                fuel_consumption_per_kwh: Fixed64::ZERO,
            },
            hex: Some(at),
            fuel: None,
        },
    )
}

/// A coal plant whose tank starts full at `fuel`.
pub fn coal_plant(
    owner: Option<PlayerId>,
    at: HexCoordinate,
    capacity: f64,
    price: f64,
    consumption_per_kwh: f64,
    fuel: f64,
) -> Entity {
    fueled_plant(owner, at, capacity, price, consumption_per_kwh, fuel, fuel)
}

/// A coal plant with an explicit tank size.
pub fn fueled_plant(
    owner: Option<PlayerId>,
    at: HexCoordinate,
    capacity: f64,
    price: f64,
    consumption_per_kwh: f64,
    current_fuel: f64,
    max_fuel: f64,
) -> Entity {
    Entity::plant(
        owner,
        PlantSpec {
            generation: Generation {
                price_per_kwh: fixed(price),
                max_capacity_kwh: fixed(capacity),
                fuel_type: Some(FuelType::Coal),
                fuel_consumption_per_kwh: fixed(consumption_per_kwh),
            },
            hex: Some(at),
            fuel: Some(FuelStorage {
                max: fixed(max_fuel),
                current: fixed(current_fuel),
            }),
        },
    )
}

/// An unconnected pole on a corner.
pub fn pole_at(owner: Option<PlayerId>, corner: CornerCoordinate) -> Entity {
    Entity::pole(
        owner,
        PoleSpec {
            corner: Some(corner),
            connected_to: Vec::new(),
        },
    )
}

/// Insert a chain of poles, each listing the next one only.
pub fn add_pole_chain(
    store: &mut EntityStore,
    owner: Option<PlayerId>,
    corners: &[CornerCoordinate],
) -> Vec<EntityId> {
    let ids: Vec<EntityId> = corners
        .iter()
        .map(|&c| store.insert(pole_at(owner, c)))
        .collect();
    for pair in ids.windows(2) {
        store
            .connect(pair[0], pair[1])
            .expect("chain members are poles");
    }
    ids
}

// ===========================================================================
// Maps
// ===========================================================================

/// A map containing only the listed cells, each with a population tier.
pub fn map_with_population(cells: &[(HexCoordinate, u8)]) -> HexGrid {
    cells
        .iter()
        .map(|&(h, tier)| (h, MapCell::default().with_population(tier)))
        .collect()
}

/// A filled parallelogram of empty cells in one region.
pub fn region_map(region: &str, width: i32, height: i32) -> HexGrid {
    let mut map = HexGrid::new();
    for q in -width..=width {
        for r in -height..=height {
            map.insert(HexCoordinate::new(q, r), MapCell::in_region(region));
        }
    }
    map
}
