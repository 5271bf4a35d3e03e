//! Gridwright Core -- shared types for the hex-map power simulation.
//!
//! This crate provides deterministic fixed-point arithmetic, entity and
//! player identifiers, and the entity arena that every power resolution
//! reads its snapshot from.
//!
//! # Key Types
//!
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`id::EntityId`] -- Stable arena handle for a buildable entity.
//! - [`id::PlayerId`] -- Identifies an owning player.
//! - [`entity::Entity`] -- Tagged union of buildable variants (plant, pole).
//! - [`entity::EntityStore`] -- Slotmap arena of entities.
//! - [`entity::EntityView`] -- Read-only, capability-filtered query seam.

pub mod entity;
pub mod fixed;
pub mod id;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
