//! Simulation systems, one module per phase of a frame

pub mod combat;
pub mod movement;
pub mod predation;
pub mod season;
pub mod shelter;
pub mod stats;
pub mod tick;

pub use stats::{Series, StatsHistory, StatsSample};
pub use tick::{run_simulation_tick, DeathCause, SimulationEvent, StepParams};
