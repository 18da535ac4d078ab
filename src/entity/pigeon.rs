//! Pigeons, the main creatures of the colony
//!
//! A pigeon forages, fights when starving, hides and breeds in pigeonholes,
//! ages, and sickens. Base stats are fixed at birth and only feed statistics
//! and offspring; the current stats grow through combat and decay with age.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{SPAWN_HEIGHT, WORLD_EXTENT};
use crate::core::error::{ColonyError, Result};
use crate::core::types::{EntityId, Gender, HoleId, Vec2};
use crate::entity::pigeonhole::Pigeonhole;
use crate::entity::predator::Predator;

/// Side of the square a pigeon occupies
pub const PIGEON_SIZE: f64 = 5.0;

/// A predator closer than this makes a pigeon feel unsafe
pub const SAFETY_RADIUS: f64 = 60.0;

// === AGE ===

/// Youngest age (frames) at which a pigeon can breed
pub const BREEDING_AGE: u32 = 1800;
/// Breeding must start before this age so it finishes before `OLD_AGE`
pub const BREEDING_CUTOFF: u32 = 8850;
/// From this age on a pigeon weakens every frame
pub const OLD_AGE: u32 = 9000;

// === BREEDING ===

/// Cooldown set when breeding starts
pub const BREEDING_COOLDOWN: u32 = 900;
/// Cooldown values at or above this mean the pigeon is busy breeding
pub const BUSY_BREEDING_COOLDOWN: u32 = 750;

// === HUNGER ===

pub const HUNGRY_FULLNESS: f64 = 0.5;
pub const DESPERATE_FULLNESS: f64 = 0.2;
/// Fullness lost every frame (about one meal per 1000 frames)
pub const FULLNESS_DECAY: f64 = 0.001;
pub const MEAL_FULLNESS: f64 = 0.5;
/// Fullness after eating a defeated pigeon
pub const OVERFULL: f64 = 1.5;

// === HEALTH & DISEASE ===

/// Fraction of max health regenerated per frame while healthy
const HEALTH_REGEN: f64 = 1.0 / 1200.0;
/// Fraction of max health restored by a meal
const MEAL_HEAL: f64 = 1.0 / 5.0;
const DISEASE_RECOVERY_CHANCE: f64 = 1.0 / 2000.0;
const DISEASE_TRANSMISSION_CHANCE: f64 = 0.1;
const BIRTH_DISEASE_CHANCE: f64 = 0.01;
const SICK_SPEED_FACTOR: f64 = 0.25;
const SICK_POWER_FACTOR: f64 = 0.5;

// Old age decay per frame
const OLD_POWER_DECAY: f64 = 1.0 / 1800.0;
const OLD_HEALTH_DECAY: f64 = 1.0 / 450.0;
const OLD_SPEED_DECAY: f64 = 0.0001;
const OLD_DISEASE_RATE: f64 = 0.0001 / 450.0;

// Combat growth
const KILL_POWER_GAIN: f64 = 1.2;
const KILL_SPEED_GAIN: f64 = 1.05;

pub const MIN_MUTATION: f64 = 0.02;
pub const MAX_MUTATION: f64 = 0.2;

/// Which sides of a fight ate their opponent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker_ate: bool,
    pub defender_ate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pigeon {
    id: EntityId,
    health: f64,
    max_health: f64,
    base_max_health: f64,
    age: u32,
    power: f64,
    base_power: f64,
    position: Vec2,
    max_speed: f64,
    base_speed: f64,
    sick: bool,
    mutation: f64,
    fullness: f64,
    gender: Gender,
    cooldown: u32,
    home: Option<HoleId>,
}

impl Default for Pigeon {
    /// A healthy, moderately full newborn with mid-range stats at the origin
    fn default() -> Self {
        Self::from_base_stats(20.0, 3.0, 1.5, 0.11, 0.75, Gender::Male, Vec2::default(), false)
    }
}

impl Pigeon {
    #[allow(clippy::too_many_arguments)]
    fn from_base_stats(
        max_health: f64,
        power: f64,
        speed: f64,
        mutation: f64,
        fullness: f64,
        gender: Gender,
        position: Vec2,
        sick: bool,
    ) -> Self {
        Self {
            id: EntityId::new(),
            health: max_health,
            max_health,
            base_max_health: max_health,
            age: 0,
            power,
            base_power: power,
            position,
            max_speed: speed,
            base_speed: speed,
            sick,
            mutation,
            fullness,
            gender,
            cooldown: 0,
            home: None,
        }
    }

    /// A completely random pigeon somewhere above the food strip
    pub fn random(rng: &mut impl Rng) -> Self {
        let position = Vec2::new(rng.gen::<f64>() * WORLD_EXTENT, rng.gen::<f64>() * SPAWN_HEIGHT);
        let gender = random_gender(rng);
        let max_health = rng.gen::<f64>() * 10.0 + 15.0;
        let power = rng.gen::<f64>() * 2.0 + 2.0;
        let speed = rng.gen::<f64>() * 0.6 + 1.2;
        let mutation = rng.gen::<f64>() * 0.18 + MIN_MUTATION;
        let sick = rng.gen::<f64>() < BIRTH_DISEASE_CHANCE;
        let fullness = rng.gen::<f64>() * 0.5 + 0.5;

        Self::from_base_stats(max_health, power, speed, mutation, fullness, gender, position, sick)
    }

    /// A baby of two breeding pigeons
    ///
    /// Base stats are the parents' averages, each perturbed by a factor drawn
    /// from [1 - m, 1 + m) where m is the baby's (itself mutated) mutation
    /// level. The baby is born between its parents.
    pub fn offspring(a: &Pigeon, b: &Pigeon, rng: &mut impl Rng) -> Result<Self> {
        let fertile = |p: &Pigeon| p.age >= BREEDING_AGE && p.age < OLD_AGE;
        if a.gender == b.gender || !fertile(a) || !fertile(b) {
            return Err(ColonyError::IncompatibleParents);
        }

        let sick = a.sick || b.sick || rng.gen::<f64>() < BIRTH_DISEASE_CHANCE;
        let position = a.position.midpoint(&b.position);

        let mut mutation = (a.mutation + b.mutation) / 2.0;
        mutation *= mutation_factor(mutation, rng);
        let mutation = mutation.clamp(MIN_MUTATION, MAX_MUTATION);

        let max_health = (a.base_max_health + b.base_max_health) / 2.0 * mutation_factor(mutation, rng);
        let power = (a.base_power + b.base_power) / 2.0 * mutation_factor(mutation, rng);
        let speed = (a.base_speed + b.base_speed) / 2.0 * mutation_factor(mutation, rng);

        let fullness = rng.gen::<f64>() * 0.5 + 0.5;
        let gender = random_gender(rng);

        Ok(Self::from_base_stats(max_health, power, speed, mutation, fullness, gender, position, sick))
    }

    // === SCENARIO BUILDERS ===

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_fullness(mut self, fullness: f64) -> Self {
        self.fullness = fullness;
        self
    }

    pub fn with_sickness(mut self, sick: bool) -> Self {
        self.sick = sick;
        self
    }

    /// Reset current and base stats to the given values, at full health
    pub fn with_stats(mut self, max_health: f64, power: f64, speed: f64) -> Self {
        self.health = max_health;
        self.max_health = max_health;
        self.base_max_health = max_health;
        self.power = power;
        self.base_power = power;
        self.max_speed = speed;
        self.base_speed = speed;
        self
    }

    pub fn with_health(mut self, health: f64) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    pub fn with_mutation(mut self, mutation: f64) -> Self {
        self.mutation = mutation.clamp(MIN_MUTATION, MAX_MUTATION);
        self
    }

    // === ACCESSORS ===

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Health as a fraction of max health (0 when max health has decayed away)
    pub fn health_ratio(&self) -> f64 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn base_max_health(&self) -> f64 {
        self.base_max_health
    }

    /// Combat power, halved while sick
    pub fn power(&self) -> f64 {
        if self.sick {
            self.power * SICK_POWER_FACTOR
        } else {
            self.power
        }
    }

    pub fn base_power(&self) -> f64 {
        self.base_power
    }

    /// Flying speed, quartered while sick
    pub fn speed(&self) -> f64 {
        if self.sick {
            self.max_speed * SICK_SPEED_FACTOR
        } else {
            self.max_speed
        }
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    pub fn mutation(&self) -> f64 {
        self.mutation
    }

    pub fn fullness(&self) -> f64 {
        self.fullness
    }

    pub fn is_sick(&self) -> bool {
        self.sick
    }

    pub fn home(&self) -> Option<HoleId> {
        self.home
    }

    // === STATE PREDICATES ===

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0 || self.fullness <= 0.0
    }

    pub fn can_breed(&self) -> bool {
        self.age >= BREEDING_AGE && self.age < BREEDING_CUTOFF && self.cooldown == 0
    }

    pub fn is_hungry(&self) -> bool {
        self.fullness < HUNGRY_FULLNESS
    }

    /// Desperate pigeons attack and hunt other pigeons
    pub fn is_desperate(&self) -> bool {
        self.fullness < DESPERATE_FULLNESS
    }

    pub fn is_homeless(&self) -> bool {
        self.home.is_none()
    }

    /// Busy for the first 150 frames of the breeding cooldown
    pub fn is_breeding(&self) -> bool {
        self.cooldown >= BUSY_BREEDING_COOLDOWN
    }

    pub fn is_old(&self) -> bool {
        self.age >= OLD_AGE
    }

    /// Safe when sheltered or when no predator is within the safety radius
    pub fn is_safe(&self, predators: &[Predator]) -> bool {
        self.home.is_some() || Self::is_safe_at(predators, self.position)
    }

    /// Whether a pigeon standing at `pos` would be out of every predator's reach
    pub fn is_safe_at(predators: &[Predator], pos: Vec2) -> bool {
        predators
            .iter()
            .all(|p| pos.distance(&p.position()) > SAFETY_RADIUS)
    }

    // === ACTIONS ===

    /// Fly by (dx, dy), staying inside the world and under the current speed
    ///
    /// Sheltered pigeons do not move at all.
    pub fn move_by(&mut self, mut dx: f64, mut dy: f64) {
        if self.home.is_some() {
            return;
        }

        let Vec2 { x, y } = self.position;
        if x + dx < 0.0 {
            dx = -x;
        }
        if x + dx > WORLD_EXTENT {
            dx = WORLD_EXTENT - x;
        }
        if y + dy < 0.0 {
            dy = -y;
        }
        if y + dy > WORLD_EXTENT {
            dy = WORLD_EXTENT - y;
        }

        let speed = self.speed();
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > speed {
            dx *= speed / dist;
            dy *= speed / dist;
        }

        self.position.x += dx;
        self.position.y += dy;
    }

    /// Per-frame bookkeeping: cooldown, age, regeneration, hunger, old age
    pub fn check_health(&mut self, rng: &mut impl Rng) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.age += 1;

        if !self.sick {
            self.health = (self.health + self.max_health * HEALTH_REGEN).min(self.max_health);
        }
        if self.sick && rng.gen::<f64>() < DISEASE_RECOVERY_CHANCE {
            self.sick = false;
        }
        self.fullness -= FULLNESS_DECAY;

        if self.age >= OLD_AGE {
            self.power = (self.power - OLD_POWER_DECAY).max(0.0);
            self.max_health = (self.max_health - OLD_HEALTH_DECAY).max(0.0);
            self.health = self.health.min(self.max_health);
            self.max_speed = (self.max_speed - OLD_SPEED_DECAY).max(0.0);

            let risk = (self.age - OLD_AGE) as f64 * OLD_DISEASE_RATE;
            self.sick = self.sick || rng.gen::<f64>() < risk;
        }
    }

    /// Eat a piece of food
    pub fn eat(&mut self) {
        self.fullness += MEAL_FULLNESS;
        self.health = (self.health + self.max_health * MEAL_HEAL).min(self.max_health);
    }

    /// Fight another pigeon; both sides take the other's power as damage
    ///
    /// A side that drops to zero health is eaten by the other only if the
    /// survivor's health-to-enemy-power ratio is at least the loser's. The
    /// attacker's claim is evaluated first.
    pub fn attack(&mut self, other: &mut Pigeon, rng: &mut impl Rng) -> AttackOutcome {
        self.health -= other.power();
        self.sick |= other.sick && rng.gen::<f64>() < DISEASE_TRANSMISSION_CHANCE;
        other.health -= self.power();
        other.sick |= self.sick && rng.gen::<f64>() < DISEASE_TRANSMISSION_CHANCE;

        let mut outcome = AttackOutcome::default();
        if other.health <= 0.0 && self.health / other.power() >= other.health / self.power() {
            self.devour(other);
            outcome.attacker_ate = true;
        }
        if self.health <= 0.0 && other.health / self.power() >= self.health / other.power() {
            other.devour(self);
            outcome.defender_ate = true;
        }
        outcome
    }

    /// Grow stronger from a kill, and eat the victim unless it is sick and
    /// this pigeon can afford to be picky
    fn devour(&mut self, victim: &Pigeon) {
        self.power *= KILL_POWER_GAIN;
        self.max_speed *= KILL_SPEED_GAIN;

        if self.is_desperate() || self.is_dead() || !victim.sick {
            self.fullness = OVERFULL;
            self.health = (self.health + self.max_health / 2.0).min(self.max_health);
            self.sick |= victim.sick;
        }
    }

    /// Enter a pigeonhole; does nothing if already sheltered
    pub fn enter_hole(&mut self, hole: &mut Pigeonhole) -> Result<()> {
        if self.home.is_some() {
            return Ok(());
        }
        hole.fill(self)?;
        self.home = Some(hole.id());
        Ok(())
    }

    /// Leave the current pigeonhole; does nothing if homeless
    ///
    /// `hole` must be the pigeonhole this pigeon lives in.
    pub fn exit_hole(&mut self, hole: &mut Pigeonhole) -> Result<()> {
        if self.home.is_none() {
            return Ok(());
        }
        hole.release(self)?;
        self.home = None;
        Ok(())
    }

    pub fn start_breeding(&mut self) -> Result<()> {
        if !self.can_breed() {
            return Err(ColonyError::CannotBreed(self.id));
        }
        self.cooldown = BREEDING_COOLDOWN;
        Ok(())
    }
}

fn random_gender(rng: &mut impl Rng) -> Gender {
    if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// Multiplier drawn uniformly from [1 - m, 1 + m)
fn mutation_factor(m: f64, rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>() * 2.0 * m + 1.0 - m
}
