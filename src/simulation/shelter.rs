//! Shelter phase: pigeonholes clear departed occupants and breed

use crate::core::types::{EntityId, Gender, HoleId};
use crate::ecs::world::World;
use crate::entity::pigeon::Pigeon;
use crate::entity::pigeonhole::{BreedingStep, PairStatus};
use crate::simulation::tick::{report_violation, SimulationEvent};

/// Run one breeding check on every pigeonhole
pub fn check_breeding(world: &mut World, events: &mut Vec<SimulationEvent>) {
    for h in 0..world.holes.len() {
        let departed: Vec<EntityId> = world.holes[h]
            .occupants()
            .filter(|id| !world.is_living(*id))
            .collect();
        if !departed.is_empty() {
            world.holes[h].clear_departed(|id| departed.contains(&id));
        }

        let hole = &world.holes[h];
        let (Some(male), Some(female)) = (hole.occupant(Gender::Male), hole.occupant(Gender::Female))
        else {
            continue;
        };
        let (Some(m), Some(f)) = (world.index_of(male), world.index_of(female)) else {
            continue;
        };

        let (dad, mom) = (&world.pigeons[m], &world.pigeons[f]);
        let pair = PairStatus {
            both_can_breed: dad.can_breed() && mom.can_breed(),
            both_young: !dad.is_old() && !mom.is_old(),
        };

        match world.holes[h].advance_breeding(pair) {
            BreedingStep::Started => {
                for idx in [m, f] {
                    if let Err(err) = world.pigeons[idx].start_breeding() {
                        report_violation("starting to breed", &err);
                    }
                }
            }
            BreedingStep::Completed => {
                let child = Pigeon::offspring(&world.pigeons[m], &world.pigeons[f], &mut world.rng);
                match child {
                    Ok(child) => {
                        let id = world.add(child);
                        tracing::trace!(child = ?id, hole = h, "Pigeon born");
                        events.push(SimulationEvent::Born {
                            child: id,
                            hole: HoleId(h),
                        });
                    }
                    Err(err) => report_violation("hatching", &err),
                }
            }
            BreedingStep::Aborted => tracing::trace!(hole = h, "Breeding abandoned"),
            BreedingStep::Idle | BreedingStep::Continuing => {}
        }
    }
}
