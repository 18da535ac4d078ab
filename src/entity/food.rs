//! Food items scattered over the food strip

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{FOOD_STRIP_DEPTH, FOOD_STRIP_TOP, FOOD_STRIP_WIDTH};
use crate::core::types::Vec2;

/// Side of the square a food item occupies
pub const FOOD_SIZE: f64 = 10.0;

/// A piece of food at a fixed integer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    x: i32,
    y: i32,
}

impl Food {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// A food item at a uniformly random spot of the food strip
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.gen_range(0..FOOD_STRIP_WIDTH),
            y: FOOD_STRIP_TOP + rng.gen_range(0..FOOD_STRIP_DEPTH),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x as f64, self.y as f64)
    }

    /// Whether a 5x5 pigeon at `pos` overlaps this item
    pub fn touches(&self, pos: Vec2, pigeon_size: f64) -> bool {
        let food = self.position();
        pos.x < food.x + FOOD_SIZE
            && pos.x + pigeon_size > food.x
            && pos.y < food.y + FOOD_SIZE
            && pos.y + pigeon_size > food.y
    }
}
