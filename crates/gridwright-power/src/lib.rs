//! Power distribution for the Gridwright hex map.
//!
//! Plants sit on hexes, poles sit on hex corners and are wired to each
//! other, and populated cells buy electricity each cycle. A resolution
//! compiles the pole network into independent grids, detects blackouts, sells
//! power in merit order (cheapest reachable plant first) and burns fuel for
//! what was generated.
//!
//! # Design
//!
//! - Every operation starts from a fresh [`view::PowerSnapshot`] captured
//!   from an [`gridwright_core::entity::EntityView`]; nothing is cached.
//! - Resolution is a pure function of the snapshot, the map and the
//!   [`config::DispatchConfig`]. Identical inputs encode to identical bytes.
//! - [`apply::apply_dispatch`] is the only code that writes back into the
//!   world.
//! - Rule violations during placement are values ([`placement::PlacementOutcome`]),
//!   not errors.
//!
//! # Example
//!
//! ```
//! use gridwright_core::entity::{EntityStore, Entity, Generation, PlantSpec, PoleSpec};
//! use gridwright_core::fixed::f64_to_fixed64;
//! use gridwright_core::id::PlayerId;
//! use gridwright_power::PowerEngine;
//! use gridwright_spatial::{CornerCoordinate, HexCoordinate, HexGrid, MapCell};
//!
//! let mut store = EntityStore::new();
//! store.insert(Entity::plant(
//!     Some(PlayerId(1)),
//!     PlantSpec {
//!         generation: Generation {
//!             price_per_kwh: f64_to_fixed64(0.1),
//!             max_capacity_kwh: f64_to_fixed64(100.0),
//!             fuel_type: None,
//!             fuel_consumption_per_kwh: f64_to_fixed64(0.0),
//!         },
//!         hex: Some(HexCoordinate::new(0, -1)),
//!         fuel: None,
//!     },
//! ));
//! store.insert(Entity::pole(
//!     Some(PlayerId(1)),
//!     PoleSpec {
//!         corner: Some(CornerCoordinate::north(HexCoordinate::new(0, 0))),
//!         connected_to: Vec::new(),
//!     },
//! ));
//!
//! let mut map = HexGrid::new();
//! map.insert(HexCoordinate::new(0, 0), MapCell::default().with_population(1));
//!
//! let mut engine = PowerEngine::default();
//! engine.initialize(&store, &map);
//! let result = engine.resolve().unwrap();
//! assert_eq!(result.power_sold_per_player_kwh[&PlayerId(1)], f64_to_fixed64(10.0));
//! ```

pub mod apply;
pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod engine;
pub mod grid;
pub mod network;
pub mod placement;
pub mod view;

pub use apply::{ApplySummary, PlayerAccount, PlayerLedger, apply_dispatch};
pub use config::{ConfigError, DispatchConfig};
pub use dispatch::{ConsumerOutcome, DispatchResult, SerializeError, resolve};
pub use engine::{EngineError, PowerEngine};
pub use grid::{Grid, GridIndex, compile_grids};
pub use network::{ConnectedPlants, PlantPath, PoleNetwork};
pub use placement::{
    PlacementOutcome, PlacementRejection, PlacementRequest, validate_buildable_placement,
};
pub use view::{PowerPlant, PowerPole, PowerSnapshot};
