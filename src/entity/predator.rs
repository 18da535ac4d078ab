//! Predators that chase and eat homeless pigeons

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Side of the square a predator occupies
pub const PREDATOR_SIZE: f64 = 10.0;

/// Predators stay inside x in [20, 610] and y in [20, 550]; the food strip
/// starts at y=560, so they never enter it.
pub const PREDATOR_MIN: f64 = 20.0;
pub const PREDATOR_MAX_X: f64 = 610.0;
pub const PREDATOR_MAX_Y: f64 = 550.0;

/// Pigeons are only hunted while strictly inside x in (15, 620), y in (15, 560)
pub const HUNT_MARGIN: f64 = 15.0;
pub const HUNT_MAX_X: f64 = 620.0;
pub const HUNT_MAX_Y: f64 = 560.0;

/// Magnitude of the random point a predator wanders toward when idle
pub const WANDER_REACH: f64 = 1e99;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predator {
    position: Vec2,
    speed: f64,
}

impl Predator {
    pub fn new(position: Vec2, speed: f64) -> Self {
        Self { position, speed }
    }

    /// A predator at a random spot of the top edge, speed in [1.0, 1.5)
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            position: Vec2::new(rng.gen::<f64>() * 630.0, 0.0),
            speed: rng.gen::<f64>() * 0.5 + 1.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Whether a pigeon at `pos` is inside the area this predator hunts in
    pub fn can_reach(pos: Vec2) -> bool {
        pos.x > HUNT_MARGIN && pos.y > HUNT_MARGIN && pos.x < HUNT_MAX_X && pos.y < HUNT_MAX_Y
    }

    /// Whether this predator's hit box overlaps a pigeon square at `pos`
    pub fn overlaps(&self, pos: Vec2, pigeon_size: f64) -> bool {
        self.position.x < pos.x + pigeon_size
            && self.position.x + PREDATOR_SIZE > pos.x
            && self.position.y < pos.y + pigeon_size
            && self.position.y + PREDATOR_SIZE > pos.y
    }

    /// Move by (dx, dy), clamped to the roaming area and capped at `speed`
    pub fn move_by(&mut self, mut dx: f64, mut dy: f64) {
        let Vec2 { x, y } = self.position;

        if x + dx < PREDATOR_MIN {
            dx = PREDATOR_MIN - x;
        }
        if x + dx > PREDATOR_MAX_X {
            dx = PREDATOR_MAX_X - x;
        }
        if y + dy < PREDATOR_MIN {
            dy = PREDATOR_MIN - y;
        }
        if y + dy > PREDATOR_MAX_Y {
            dy = PREDATOR_MAX_Y - y;
        }

        let dist = (dx * dx + dy * dy).sqrt();
        if dist > self.speed {
            dx *= self.speed / dist;
            dy *= self.speed / dist;
        }

        self.position.x += dx;
        self.position.y += dy;
    }

    /// Head toward a far-away random point
    pub fn wander(&mut self, rng: &mut impl Rng) {
        let dx = rng.gen::<f64>() * 2.0 * WANDER_REACH - WANDER_REACH;
        let dy = rng.gen::<f64>() * 2.0 * WANDER_REACH - WANDER_REACH;
        self.move_by(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_predator_on_top_edge() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let predator = Predator::random(&mut rng);
        assert_eq!(predator.position().y, 0.0);
        assert!(predator.speed() >= 1.0 && predator.speed() < 1.5);
    }

    #[test]
    fn test_move_capped_at_speed() {
        let mut predator = Predator::new(Vec2::new(100.0, 100.0), 2.0);
        predator.move_by(30.0, 40.0);
        let moved = predator.position() - Vec2::new(100.0, 100.0);
        assert!((moved.length() - 2.0).abs() < 1e-9);
        assert!((moved.x - 1.2).abs() < 1e-9);
        assert!((moved.y - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_move_stays_out_of_food_strip() {
        let mut predator = Predator::new(Vec2::new(300.0, 549.0), 5.0);
        predator.move_by(0.0, 100.0);
        assert_eq!(predator.position().y, PREDATOR_MAX_Y);
    }

    #[test]
    fn test_wander_clamped_to_roaming_area() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut predator = Predator::new(Vec2::new(300.0, 0.0), 1.5);
        for _ in 0..5000 {
            predator.wander(&mut rng);
            let pos = predator.position();
            assert!(pos.x >= PREDATOR_MIN - 1e-9 && pos.x <= PREDATOR_MAX_X + 1e-9);
            assert!(pos.y <= PREDATOR_MAX_Y + 1e-9);
        }
        assert!(predator.position().y >= PREDATOR_MIN - 1e-9);
    }

    #[test]
    fn test_hunting_area() {
        assert!(Predator::can_reach(Vec2::new(100.0, 100.0)));
        assert!(!Predator::can_reach(Vec2::new(15.0, 100.0)));
        assert!(!Predator::can_reach(Vec2::new(100.0, 560.0)));
    }

    #[test]
    fn test_overlaps_hit_box() {
        let predator = Predator::new(Vec2::new(100.0, 100.0), 1.0);
        assert!(predator.overlaps(Vec2::new(105.0, 105.0), 5.0));
        assert!(predator.overlaps(Vec2::new(96.0, 96.0), 5.0));
        assert!(!predator.overlaps(Vec2::new(110.0, 100.0), 5.0));
        assert!(!predator.overlaps(Vec2::new(95.0, 100.0), 5.0));
    }
}
