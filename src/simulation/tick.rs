//! Tick system - orchestrates one frame of the colony
//!
//! The phases run in a fixed order:
//! predators -> fights -> movement -> shelters -> food -> predator calibration
//!
//! Removals inside a frame are tombstones; the pigeon table is compacted
//! once the shelters have cleared their departed occupants.

use crate::core::config::SeasonBounds;
use crate::core::error::ColonyError;
use crate::core::types::{EntityId, HoleId, PredatorId};
use crate::ecs::world::World;
use crate::simulation::{combat, movement, predation, season, shelter};

/// Frames between two debug reports of the colony size
const REPORT_INTERVAL: u64 = 30;

/// Parameters the driver hands to every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepParams {
    /// Bounds of the seasonal food curve
    pub season: SeasonBounds,
}

/// Why a pigeon died outside of a fight or a predator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Injury,
    Starvation,
}

/// Events generated during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A predator caught a homeless pigeon
    Eaten {
        pigeon: EntityId,
        predator: PredatorId,
    },
    /// A pigeon died in a fight; `by` is the opponent if it ate the loser
    KilledInCombat {
        pigeon: EntityId,
        by: Option<EntityId>,
    },
    Died {
        pigeon: EntityId,
        cause: DeathCause,
    },
    /// A pigeonhole finished breeding
    Born {
        child: EntityId,
        hole: HoleId,
    },
    /// Predator speeds were reset around the colony's average speed
    /// (`None` when the colony is empty and predators stop)
    PredatorsRecalibrated { speed_basis: Option<f64> },
}

/// Run a single frame
pub fn run_simulation_tick(world: &mut World, params: &StepParams) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let report = world.age % REPORT_INTERVAL == 0;

    if report {
        tracing::debug!(age = world.age, "Colony frame");
    }

    predation::hunt(world, &mut events);
    combat::resolve_fights(world, &mut events);
    movement::move_pigeons(world, &mut events);
    shelter::check_breeding(world, &mut events);
    world.compact();
    season::update_food(world, params.season);
    predation::calibrate(world, &mut events);

    if report {
        tracing::debug!(age = world.age, alive = world.size(), "Colony population");
    }

    world.age += 1;
    events
}

/// A shelter or breeding precondition failed inside a frame
///
/// The phases check every precondition before calling the fallible
/// operations, so this is a bug in the phase logic. Debug builds stop here;
/// release builds log it and carry on with the frame.
pub(crate) fn report_violation(context: &str, err: &ColonyError) {
    tracing::error!(error = %err, context, "Colony invariant violated");
    debug_assert!(false, "{context}: {err}");
}
