use thiserror::Error;

use crate::core::types::{EntityId, Gender, HoleId};

#[derive(Error, Debug)]
pub enum ColonyError {
    #[error("The colony is empty")]
    EmptyColony,

    #[error("Pigeon not found: {0:?}")]
    PigeonNotFound(EntityId),

    #[error("Pigeonhole not found: {0:?}")]
    HoleNotFound(HoleId),

    #[error("Pigeonhole {hole:?} already holds a {gender:?} pigeon")]
    SlotOccupied { hole: HoleId, gender: Gender },

    #[error("Pigeon {pigeon:?} is too far away to enter pigeonhole {hole:?}")]
    NotAtEntrance { pigeon: EntityId, hole: HoleId },

    #[error("Pigeon {pigeon:?} is not inside pigeonhole {hole:?}")]
    NotInHole { pigeon: EntityId, hole: HoleId },

    #[error("Pigeon {0:?} is not able to breed")]
    CannotBreed(EntityId),

    #[error("The two pigeons cannot breed with each other")]
    IncompatibleParents,

    #[error("Invalid season bounds: low {low} must be >= 0 and <= high {high}")]
    InvalidSeasonBounds { low: f64, high: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ColonyError>;
