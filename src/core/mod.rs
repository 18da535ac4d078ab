pub mod config;
pub mod error;
pub mod types;

pub use config::{SeasonBounds, SimulationConfig};
pub use error::{ColonyError, Result};
