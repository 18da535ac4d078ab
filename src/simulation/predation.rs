//! Predator phase: hunting, eating, and periodic speed calibration

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::core::types::{PredatorId, Vec2};
use crate::ecs::world::World;
use crate::entity::pigeon::PIGEON_SIZE;
use crate::entity::predator::Predator;
use crate::simulation::tick::SimulationEvent;

/// Frames between two predator speed resets
pub const CALIBRATION_INTERVAL: u64 = 1000;

/// Predators are reset to 105-115% of the colony's average base speed
const CALIBRATION_MIN_FACTOR: f64 = 1.05;
const CALIBRATION_SPREAD: f64 = 0.1;

/// Move every predator toward its prey, then let it eat what it touches
pub fn hunt(world: &mut World, events: &mut Vec<SimulationEvent>) {
    for p in 0..world.predators.len() {
        let from = world.predators[p].position();
        let prey = nearest_prey(world, from);

        let predator = &mut world.predators[p];
        match prey {
            Some(target) => predator.move_by(target.x - from.x, target.y - from.y),
            None => predator.wander(&mut world.rng),
        }

        eat_overlapping(world, p, events);
    }
}

/// Closest homeless pigeon inside the hunting area
fn nearest_prey(world: &World, from: Vec2) -> Option<Vec2> {
    world
        .pigeons()
        .filter(|pigeon| pigeon.is_homeless() && Predator::can_reach(pigeon.position()))
        .map(|pigeon| pigeon.position())
        .min_by_key(|pos| OrderedFloat(pos.distance(&from)))
}

fn eat_overlapping(world: &mut World, p: usize, events: &mut Vec<SimulationEvent>) {
    for idx in world.living_indices() {
        let pigeon = &world.pigeons[idx];
        if pigeon.is_homeless() && world.predators[p].overlaps(pigeon.position(), PIGEON_SIZE) {
            let id = pigeon.id();
            world.remove_at(idx);
            tracing::trace!(pigeon = ?id, predator = p, "Pigeon eaten");
            events.push(SimulationEvent::Eaten {
                pigeon: id,
                predator: PredatorId(p),
            });
        }
    }
}

/// Every `CALIBRATION_INTERVAL` frames, reset predator speeds around the
/// colony's average base speed; an empty colony stops them
pub fn calibrate(world: &mut World, events: &mut Vec<SimulationEvent>) {
    if world.age % CALIBRATION_INTERVAL != 0 {
        return;
    }

    let basis = world.average_speed().ok();
    for predator in world.predators.iter_mut() {
        let speed = match basis {
            Some(avg) => {
                avg * (CALIBRATION_MIN_FACTOR + world.rng.gen::<f64>() * CALIBRATION_SPREAD)
            }
            None => 0.0,
        };
        predator.set_speed(speed);
    }

    tracing::debug!(age = world.age, speed_basis = ?basis, "Predators recalibrated");
    events.push(SimulationEvent::PredatorsRecalibrated { speed_basis: basis });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{Gender, HoleId};
    use crate::entity::pigeon::Pigeon;

    fn empty_world() -> World {
        World::new(SimulationConfig {
            initial_pigeons: 0,
            predator_count: 0,
            seed: Some(3),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_predator_chases_nearest_homeless() {
        let mut world = empty_world();
        world.add_predator(Predator::new(Vec2::new(100.0, 100.0), 2.0));
        world.add(Pigeon::default().with_position(Vec2::new(200.0, 100.0)));
        world.add(Pigeon::default().with_position(Vec2::new(100.0, 150.0)));

        let mut events = Vec::new();
        hunt(&mut world, &mut events);

        let pos = world.predators()[0].position();
        assert!(pos.distance(&Vec2::new(100.0, 102.0)) < 1e-9);
        assert!(events.is_empty());
    }

    #[test]
    fn test_predator_ignores_unreachable_and_sheltered() {
        let mut world = empty_world();
        world.add_predator(Predator::new(Vec2::new(100.0, 100.0), 2.0));
        // Outside the hunting area
        world.add(Pigeon::default().with_position(Vec2::new(100.0, 580.0)));
        // Sheltered in the hole at (40, 80)
        let template = Pigeon::default().with_gender(Gender::Male);
        let entrance = world.entrance_of(HoleId(16), &template).unwrap();
        let hidden = world.add(template.with_position(entrance));
        world.shelter(hidden, HoleId(16)).unwrap();
        // Far away but fair game
        world.add(Pigeon::default().with_position(Vec2::new(500.0, 100.0)));

        let mut events = Vec::new();
        hunt(&mut world, &mut events);
        let pos = world.predators()[0].position();
        assert!(pos.distance(&Vec2::new(102.0, 100.0)) < 1e-9);
    }

    #[test]
    fn test_predator_eats_overlapping_pigeon() {
        let mut world = empty_world();
        world.add_predator(Predator::new(Vec2::new(100.0, 100.0), 2.0));
        let victim = world.add(Pigeon::default().with_position(Vec2::new(103.0, 101.0)));

        let mut events = Vec::new();
        hunt(&mut world, &mut events);

        assert_eq!(world.size(), 0);
        assert_eq!(
            events,
            vec![SimulationEvent::Eaten {
                pigeon: victim,
                predator: PredatorId(0)
            }]
        );
    }

    #[test]
    fn test_predator_wanders_without_prey() {
        let mut world = empty_world();
        world.add_predator(Predator::new(Vec2::new(300.0, 300.0), 1.5));
        let mut events = Vec::new();
        hunt(&mut world, &mut events);
        let moved = world.predators()[0].position() - Vec2::new(300.0, 300.0);
        assert!((moved.length() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_calibration_only_on_interval() {
        let mut world = empty_world();
        world.add_predator(Predator::new(Vec2::new(300.0, 300.0), 1.5));
        world.add(Pigeon::default().with_stats(20.0, 3.0, 2.0));

        world.age = 999;
        let mut events = Vec::new();
        calibrate(&mut world, &mut events);
        assert!(events.is_empty());
        assert_eq!(world.predators()[0].speed(), 1.5);

        world.age = 1000;
        calibrate(&mut world, &mut events);
        let speed = world.predators()[0].speed();
        assert!((2.1..=2.3).contains(&speed));
        assert_eq!(
            events,
            vec![SimulationEvent::PredatorsRecalibrated {
                speed_basis: Some(2.0)
            }]
        );
    }
}
