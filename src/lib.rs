//! Pigeon Colony - agent-based ecology simulation
//!
//! Pigeons forage, fight, hide in pigeonholes, breed, age and sicken while
//! predators hunt them. [`ecs::world::World::step`] advances one frame.

pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
