//! Seasonal food economy

use std::f64::consts::PI;

use rand::Rng;

use crate::core::config::{SeasonBounds, SEASON_LENGTH};
use crate::core::types::Tick;
use crate::ecs::world::World;
use crate::entity::food::Food;

/// Share of the current food that rots away every frame (oldest first)
pub const FOOD_DECAY_RATE: f64 = 0.005;

/// Food items to spawn at `age`: a sinusoid between `low` and `high` with a
/// period of one season, starting halfway up and rising
pub fn target_food(bounds: SeasonBounds, age: Tick) -> f64 {
    let mid = (bounds.low + bounds.high) / 2.0;
    let amplitude = (bounds.high - bounds.low) / 2.0;
    mid + amplitude * (2.0 * PI * age as f64 / SEASON_LENGTH as f64).sin()
}

/// Whole part of `amount`, plus one with probability equal to the fraction
fn stochastic_count(amount: f64, rng: &mut impl Rng) -> usize {
    let whole = amount.max(0.0).floor();
    let extra = rng.gen::<f64>() < amount - whole;
    whole as usize + usize::from(extra)
}

/// Spawn this frame's food, then let the oldest food rot
pub fn update_food(world: &mut World, bounds: SeasonBounds) {
    let spawned = stochastic_count(target_food(bounds, world.age), &mut world.rng);
    for _ in 0..spawned {
        let food = Food::random(&mut world.rng);
        world.foods.push_back(food);
    }

    let rotten = stochastic_count(FOOD_DECAY_RATE * world.foods.len() as f64, &mut world.rng);
    for _ in 0..rotten {
        world.foods.pop_front();
    }
}
