//! World - owns every agent collection of the colony
//!
//! Pigeons are stored in a dense table. Removal during a frame only marks a
//! tombstone in `alive`, so index-based scans never skip or revisit a
//! neighbour; `compact` drops the tombstones and rebuilds the id registry.

use std::collections::VecDeque;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{
    SeasonBounds, SimulationConfig, HOLE_GRID_HEIGHT, HOLE_GRID_WIDTH, HOLE_SPACING,
};
use crate::core::error::{ColonyError, Result};
use crate::core::types::{EntityId, HoleId, PredatorId, Tick, Vec2};
use crate::entity::food::Food;
use crate::entity::pigeon::Pigeon;
use crate::entity::pigeonhole::Pigeonhole;
use crate::entity::predator::Predator;
use crate::simulation::season;
use crate::simulation::tick::{run_simulation_tick, SimulationEvent, StepParams};

/// The colony: pigeons, pigeonholes, predators and food
pub struct World {
    /// Frames simulated so far
    pub(crate) age: Tick,
    pub(crate) pigeons: Vec<Pigeon>,
    /// Tombstones for `pigeons`; false once a pigeon has been removed
    pub(crate) alive: Vec<bool>,
    registry: AHashMap<EntityId, usize>,
    pub(crate) holes: Vec<Pigeonhole>,
    pub(crate) predators: Vec<Predator>,
    /// Oldest first
    pub(crate) foods: VecDeque<Food>,
    season: SeasonBounds,
    /// Random number generator (deterministic when seeded)
    pub rng: ChaCha8Rng,
}

impl World {
    /// Build a fresh colony: the full pigeonhole grid, random predators at
    /// the top edge, random adult pigeons, and no food
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut world = Self {
            age: 0,
            pigeons: Vec::with_capacity(config.initial_pigeons),
            alive: Vec::with_capacity(config.initial_pigeons),
            registry: AHashMap::new(),
            holes: Self::hole_grid(),
            predators: Vec::with_capacity(config.predator_count),
            foods: VecDeque::new(),
            season: config.season,
            rng,
        };

        for _ in 0..config.initial_pigeons {
            let pigeon = Pigeon::random(&mut world.rng);
            world.add(pigeon);
        }
        for _ in 0..config.predator_count {
            let predator = Predator::random(&mut world.rng);
            world.add_predator(predator);
        }

        tracing::debug!(
            pigeons = config.initial_pigeons,
            predators = config.predator_count,
            holes = world.holes.len(),
            "Colony created"
        );

        Ok(world)
    }

    /// Column-major grid of pigeonholes: all rows of x=0, then x=40, ...
    fn hole_grid() -> Vec<Pigeonhole> {
        let mut holes = Vec::new();
        for x in (0..HOLE_GRID_WIDTH).step_by(HOLE_SPACING as usize) {
            for y in (0..HOLE_GRID_HEIGHT).step_by(HOLE_SPACING as usize) {
                holes.push(Pigeonhole::new(HoleId(holes.len()), x, y));
            }
        }
        holes
    }

    // === ENTRY POINTS ===

    /// Advance one frame using the stored season bounds
    pub fn step(&mut self) -> Vec<SimulationEvent> {
        let params = StepParams {
            season: self.season,
        };
        run_simulation_tick(self, &params)
    }

    /// Add a pigeon to the colony
    ///
    /// The pigeon must be new to the world and homeless; use `shelter` to
    /// put it into a pigeonhole afterwards.
    pub fn add(&mut self, pigeon: Pigeon) -> EntityId {
        let id = pigeon.id();
        debug_assert!(!self.registry.contains_key(&id), "pigeon {id:?} added twice");
        debug_assert!(pigeon.is_homeless(), "pigeon {id:?} added with a home");
        self.registry.insert(id, self.pigeons.len());
        self.pigeons.push(pigeon);
        self.alive.push(true);
        id
    }

    pub fn add_predator(&mut self, predator: Predator) -> PredatorId {
        self.predators.push(predator);
        PredatorId(self.predators.len() - 1)
    }

    /// Drop a food item at the newest end of the queue
    pub fn add_food(&mut self, food: Food) {
        self.foods.push_back(food);
    }

    /// Put a living pigeon into a pigeonhole
    ///
    /// The pigeon must stand on the entrance for its gender and the slot
    /// must be free.
    pub fn shelter(&mut self, id: EntityId, hole: HoleId) -> Result<()> {
        let idx = self.index_of(id).ok_or(ColonyError::PigeonNotFound(id))?;
        let hole = self
            .holes
            .get_mut(hole.0)
            .ok_or(ColonyError::HoleNotFound(hole))?;
        self.pigeons[idx].enter_hole(hole)
    }

    pub fn season_bounds(&self) -> SeasonBounds {
        self.season
    }

    pub fn set_season_bounds(&mut self, bounds: SeasonBounds) -> Result<()> {
        bounds.validate()?;
        self.season = bounds;
        Ok(())
    }

    /// Food items the season currently calls for per frame
    pub fn current_food_rate(&self) -> f64 {
        season::target_food(self.season, self.age)
    }

    // === ACCESSORS ===

    pub fn age(&self) -> Tick {
        self.age
    }

    /// Living pigeons
    pub fn pigeons(&self) -> impl Iterator<Item = &Pigeon> + '_ {
        self.pigeons
            .iter()
            .zip(self.alive.iter())
            .filter(|(_, alive)| **alive)
            .map(|(pigeon, _)| pigeon)
    }

    pub fn pigeon(&self, id: EntityId) -> Option<&Pigeon> {
        self.index_of(id).map(|idx| &self.pigeons[idx])
    }

    pub fn holes(&self) -> &[Pigeonhole] {
        &self.holes
    }

    pub fn hole(&self, id: HoleId) -> Option<&Pigeonhole> {
        self.holes.get(id.0)
    }

    pub fn predators(&self) -> &[Predator] {
        &self.predators
    }

    pub fn foods(&self) -> &VecDeque<Food> {
        &self.foods
    }

    /// Number of living pigeons
    pub fn size(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    pub fn is_living(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    // === AGGREGATE QUERIES ===

    fn average(&self, stat: impl Fn(&Pigeon) -> f64) -> Result<f64> {
        let (sum, count) = self
            .pigeons()
            .fold((0.0, 0usize), |(sum, count), p| (sum + stat(p), count + 1));
        if count == 0 {
            return Err(ColonyError::EmptyColony);
        }
        Ok(sum / count as f64)
    }

    fn percent(&self, pred: impl Fn(&Pigeon) -> bool) -> Result<f64> {
        self.average(|p| if pred(p) { 100.0 } else { 0.0 })
    }

    /// Average birth speed
    pub fn average_speed(&self) -> Result<f64> {
        self.average(Pigeon::base_speed)
    }

    /// Average birth power
    pub fn average_power(&self) -> Result<f64> {
        self.average(Pigeon::base_power)
    }

    /// Average birth max health
    pub fn average_max_health(&self) -> Result<f64> {
        self.average(Pigeon::base_max_health)
    }

    pub fn average_mutation(&self) -> Result<f64> {
        self.average(Pigeon::mutation)
    }

    pub fn average_fullness(&self) -> Result<f64> {
        self.average(Pigeon::fullness)
    }

    /// Percentage of sick pigeons
    pub fn percent_sick(&self) -> Result<f64> {
        self.percent(Pigeon::is_sick)
    }

    /// Percentage of pigeons of old age
    pub fn percent_old(&self) -> Result<f64> {
        self.percent(Pigeon::is_old)
    }

    // === TABLE BOOKKEEPING (used by the simulation phases) ===

    pub(crate) fn index_of(&self, id: EntityId) -> Option<usize> {
        self.registry
            .get(&id)
            .copied()
            .filter(|&idx| self.alive[idx])
    }

    /// Indices of living pigeons, in table order
    pub(crate) fn living_indices(&self) -> Vec<usize> {
        (0..self.pigeons.len()).filter(|&i| self.alive[i]).collect()
    }

    /// Mark a pigeon as removed; it stays in the table until `compact`
    pub(crate) fn remove_at(&mut self, idx: usize) {
        self.alive[idx] = false;
    }

    /// Index of the pigeonhole whose entrance for `pigeon` lies exactly on
    /// its floored position
    pub(crate) fn hole_at_entrance(&self, pigeon: &Pigeon) -> Option<usize> {
        let spot = pigeon.position().floor();
        let gender = pigeon.gender();
        self.holes
            .iter()
            .position(|hole| hole.entrance(gender) == spot)
    }

    /// Drop tombstoned pigeons and rebuild the id registry
    pub(crate) fn compact(&mut self) {
        if self.alive.iter().all(|alive| *alive) {
            return;
        }

        let alive = std::mem::take(&mut self.alive);
        let mut flags = alive.into_iter();
        self.pigeons.retain(|_| flags.next().unwrap_or(false));
        self.alive = vec![true; self.pigeons.len()];

        self.registry.clear();
        for (idx, pigeon) in self.pigeons.iter().enumerate() {
            self.registry.insert(pigeon.id(), idx);
        }
    }

    /// Where `pigeon` has to stand to enter `hole`
    pub fn entrance_of(&self, hole: HoleId, pigeon: &Pigeon) -> Option<Vec2> {
        self.hole(hole).map(|h| h.entrance(pigeon.gender()))
    }
}

/// Two distinct pigeons of a table, mutably
pub(crate) fn pair_mut(pigeons: &mut [Pigeon], a: usize, b: usize) -> (&mut Pigeon, &mut Pigeon) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = pigeons.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = pigeons.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
