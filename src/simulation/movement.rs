//! Decision and movement phase
//!
//! Every living pigeon, in table order:
//! 1. Feels danger when a predator is within the safety radius and builds a
//!    flee vector away from the nearest one.
//! 2. Hungry and not busy breeding: leaves its hole and heads for the nearest
//!    safe food (or, when desperate, the nearest safe pigeon if closer).
//! 3. Otherwise: heads for a pigeonhole to breed in or hide in.
//! 4. Once outside, eats food it lands on and enters a hole whose entrance it
//!    lands on exactly.
//! 5. Ages one frame; a pigeon that dies here is removed.

use ordered_float::OrderedFloat;

use crate::core::config::FEEDING_LINE;
use crate::core::types::{Gender, Vec2};
use crate::ecs::world::World;
use crate::entity::pigeon::{Pigeon, PIGEON_SIZE, SAFETY_RADIUS};
use crate::entity::pigeonhole::Pigeonhole;
use crate::entity::predator::Predator;
use crate::simulation::tick::{report_violation, DeathCause, SimulationEvent};

/// Downward pull of a hungry pigeon with nothing to go to
const WAIT_DRIFT: f64 = 1e99;

pub fn move_pigeons(world: &mut World, events: &mut Vec<SimulationEvent>) {
    for i in 0..world.pigeons.len() {
        if !world.alive[i] {
            continue;
        }

        let pigeon = &world.pigeons[i];
        let danger = !pigeon.is_safe(&world.predators);
        let flee = if danger {
            flee_vector(pigeon.position(), &world.predators)
        } else {
            Vec2::default()
        };

        if pigeon.is_hungry() && !pigeon.is_breeding() {
            forage(world, i, flee);
        } else if pigeon.is_homeless() {
            seek_shelter(world, i, danger, flee);
        }

        if world.pigeons[i].is_homeless() {
            feed(world, i);
            enter_hole_here(world, i);
        }

        let pigeon = &mut world.pigeons[i];
        pigeon.check_health(&mut world.rng);
        if pigeon.is_dead() {
            let id = pigeon.id();
            let cause = if pigeon.fullness() <= 0.0 {
                DeathCause::Starvation
            } else {
                DeathCause::Injury
            };
            world.remove_at(i);
            tracing::trace!(pigeon = ?id, ?cause, "Pigeon died");
            events.push(SimulationEvent::Died { pigeon: id, cause });
        }
    }
}

/// Repulsion from the nearest predator, stronger the closer it is
///
/// Only meaningful within the safety radius, where the weight stays real.
pub fn flee_vector(pos: Vec2, predators: &[Predator]) -> Vec2 {
    let nearest = predators
        .iter()
        .min_by_key(|p| OrderedFloat(pos.distance(&p.position())));

    match nearest {
        Some(predator) => {
            let delta = pos - predator.position();
            let weight = (SAFETY_RADIUS * SAFETY_RADIUS - delta.dot(&delta)).max(0.0).sqrt();
            delta * weight
        }
        None => Vec2::default(),
    }
}

/// Hungry branch: leave shelter if sensible, then chase food or prey
fn forage(world: &mut World, i: usize, flee: Vec2) {
    let pigeon = &world.pigeons[i];
    let pos = pigeon.position();

    let leave = Pigeon::is_safe_at(&world.predators, pos) || pigeon.is_desperate();
    if leave {
        if let Some(home) = pigeon.home() {
            let hole = &mut world.holes[home.0];
            if let Err(err) = world.pigeons[i].exit_hole(hole) {
                report_violation("leaving shelter to feed", &err);
            }
        }
    }

    let pigeon = &world.pigeons[i];
    if !pigeon.is_homeless() {
        return;
    }

    let food = nearest_safe_food(world, pos);
    let prey = if pigeon.is_desperate() {
        nearest_safe_prey(world, i)
    } else {
        None
    };

    let target = match (food, prey) {
        (Some((food, food_dist)), Some((_, prey_dist))) if food_dist <= prey_dist => Some(food),
        (Some((food, _)), None) => Some(food),
        (_, Some((prey, _))) => {
            if !pigeon.is_desperate() {
                tracing::warn!(pigeon = ?pigeon.id(), "Chasing a pigeon without being desperate");
            }
            Some(prey)
        }
        (None, None) => None,
    };

    let pigeon = &mut world.pigeons[i];
    match target {
        Some(target) => {
            let heading = target - pos + flee;
            pigeon.move_by(heading.x, heading.y);
        }
        None => pigeon.move_by(0.0, WAIT_DRIFT),
    }
}

/// Closest food no predator is watching, with its distance
fn nearest_safe_food(world: &World, from: Vec2) -> Option<(Vec2, f64)> {
    world
        .foods
        .iter()
        .map(|food| food.position())
        .filter(|pos| Pigeon::is_safe_at(&world.predators, *pos))
        .map(|pos| (pos, pos.distance(&from)))
        .min_by_key(|(_, dist)| OrderedFloat(*dist))
}

/// Closest other homeless pigeon no predator is watching, with its distance
fn nearest_safe_prey(world: &World, hunter: usize) -> Option<(Vec2, f64)> {
    let from = world.pigeons[hunter].position();
    world
        .pigeons
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != hunter && world.alive[*j] && other.is_homeless())
        .map(|(_, other)| other.position())
        .filter(|pos| Pigeon::is_safe_at(&world.predators, *pos))
        .map(|pos| (pos, pos.distance(&from)))
        .min_by_key(|(_, dist)| OrderedFloat(*dist))
}

/// Sated (or breeding) branch: head for a pigeonhole
///
/// A hole with a ready partner is preferred; in danger any free hole will do,
/// as long as reaching it does not mean flying toward the predator. With no
/// danger and no partner waiting, the nearest free hole is used.
fn seek_shelter(world: &mut World, i: usize, danger: bool, flee: Vec2) {
    let pigeon = &world.pigeons[i];
    let pos = pigeon.position();
    let gender = pigeon.gender();

    let partner_ready = |hole: &Pigeonhole| {
        hole.can_breed(gender, |partner| {
            world.pigeon(partner).is_some_and(Pigeon::can_breed)
        })
    };
    let away_from_danger =
        |hole: &Pigeonhole| !danger || (hole.entrance(gender) - pos).dot(&flee) > 0.0;

    let mut target = nearest_hole(&world.holes, pos, gender, |hole| {
        (partner_ready(hole) || (danger && !hole.is_filled(gender))) && away_from_danger(hole)
    });
    if target.is_none() && !danger {
        target = nearest_hole(&world.holes, pos, gender, |hole| !hole.is_filled(gender));
    }

    let heading = match target {
        Some(entrance) => entrance - pos,
        None => flee,
    };
    world.pigeons[i].move_by(heading.x, heading.y);
}

/// Entrance of the nearest hole accepted by `accept`
fn nearest_hole(
    holes: &[Pigeonhole],
    from: Vec2,
    gender: Gender,
    accept: impl Fn(&Pigeonhole) -> bool,
) -> Option<Vec2> {
    holes
        .iter()
        .filter(|hole| accept(hole))
        .map(|hole| hole.entrance(gender))
        .min_by_key(|entrance| OrderedFloat(entrance.distance(&from)))
}

/// A hungry pigeon inside the food strip eats the oldest food it touches
fn feed(world: &mut World, i: usize) {
    let pigeon = &world.pigeons[i];
    if !pigeon.is_hungry() || pigeon.position().y < FEEDING_LINE {
        return;
    }

    let pos = pigeon.position();
    if let Some(idx) = world.foods.iter().position(|food| food.touches(pos, PIGEON_SIZE)) {
        world.foods.remove(idx);
        world.pigeons[i].eat();
    }
}

/// Enter the hole whose entrance the pigeon stands on, if its slot is free
fn enter_hole_here(world: &mut World, i: usize) {
    let Some(h) = world.hole_at_entrance(&world.pigeons[i]) else {
        return;
    };
    let hole = &mut world.holes[h];
    if hole.is_filled(world.pigeons[i].gender()) {
        return;
    }
    if let Err(err) = world.pigeons[i].enter_hole(hole) {
        report_violation("entering shelter", &err);
    }
}
