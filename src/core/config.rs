//! Simulation configuration with documented constants
//!
//! World geometry is fixed; the knobs a driver may turn (population size,
//! predator count, seasonal food bounds, RNG seed) live in
//! [`SimulationConfig`] and [`SeasonBounds`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};

// === WORLD GEOMETRY ===

/// Largest x/y coordinate a pigeon may occupy (pigeons are 5x5 squares)
pub const WORLD_EXTENT: f64 = 635.0;

/// Pigeons spawned at random are placed above this y coordinate
pub const SPAWN_HEIGHT: f64 = 555.0;

/// Pigeons at or below this y coordinate are inside the food strip
pub const FEEDING_LINE: f64 = 555.0;

/// Food items are placed at y in [FOOD_STRIP_TOP, FOOD_STRIP_TOP + FOOD_STRIP_DEPTH)
pub const FOOD_STRIP_TOP: i32 = 560;
pub const FOOD_STRIP_DEPTH: i32 = 70;

/// Food items are placed at x in [0, FOOD_STRIP_WIDTH)
pub const FOOD_STRIP_WIDTH: i32 = 630;

/// Pigeonhole grid: columns at x = 0, 40, .., 600 and rows at y = 0, 40, .., 520
pub const HOLE_SPACING: i32 = 40;
pub const HOLE_GRID_WIDTH: i32 = 640;
pub const HOLE_GRID_HEIGHT: i32 = 560;

/// Frames in one full seasonal food cycle
pub const SEASON_LENGTH: u64 = 7200;

/// Upper bound accepted for `initial_pigeons`
pub const MAX_INITIAL_PIGEONS: usize = 10_000;

// === SLIDER TRACK (driver-side representation of the season bounds) ===

const SLIDER_TOP: i32 = 20;
const SLIDER_BOTTOM: i32 = 620;
const SLIDER_GAP: i32 = 5;
const SLIDER_SCALE: f64 = 200.0;

/// Bounds of the seasonal food-generation curve, in food items per frame
///
/// `low` is the rate at the bottom of the lean season and `high` the rate at
/// the peak of the rich season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonBounds {
    pub low: f64,
    pub high: f64,
}

impl Default for SeasonBounds {
    fn default() -> Self {
        Self { low: 0.5, high: 2.5 }
    }
}

impl SeasonBounds {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let bounds = Self { low, high };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Convert the two slider handle positions of the control panel into bounds
    ///
    /// The track runs from y=20 (3.0 food/frame) to y=620 (0.0 food/frame).
    /// The handles keep a 5 pixel gap, with the minimum handle below the
    /// maximum one. The defaults (520, 120) give 0.5 and 2.5.
    pub fn from_slider_positions(min_loc: i32, max_loc: i32) -> Self {
        let max_loc = max_loc.clamp(SLIDER_TOP, SLIDER_BOTTOM - SLIDER_GAP);
        let min_loc = min_loc.clamp(max_loc + SLIDER_GAP, SLIDER_BOTTOM);
        Self {
            low: (SLIDER_BOTTOM - min_loc) as f64 / SLIDER_SCALE,
            high: (SLIDER_BOTTOM - max_loc) as f64 / SLIDER_SCALE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = self.low >= 0.0 && self.low <= self.high && self.high.is_finite();
        if !ordered {
            return Err(ColonyError::InvalidSeasonBounds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Configuration for building a world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random adult pigeons created with the world
    pub initial_pigeons: usize,

    /// Predators created at the top edge with the world
    pub predator_count: usize,

    /// Seasonal food bounds used by `World::step`
    pub season: SeasonBounds,

    /// Seed for the world RNG; entropy when absent
    ///
    /// Runs with the same seed on the same build follow the same trajectory.
    /// No guarantee holds across platforms or versions.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_pigeons: 449,
            predator_count: 2,
            season: SeasonBounds::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.season.validate()?;

        if self.initial_pigeons > MAX_INITIAL_PIGEONS {
            return Err(ColonyError::InvalidConfig(format!(
                "initial_pigeons ({}) should be <= {}",
                self.initial_pigeons, MAX_INITIAL_PIGEONS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_pigeons, 449);
        assert_eq!(config.predator_count, 2);
    }

    #[test]
    fn test_default_sliders_match_default_bounds() {
        let bounds = SeasonBounds::from_slider_positions(520, 120);
        assert_eq!(bounds, SeasonBounds::default());
    }

    #[test]
    fn test_sliders_keep_gap() {
        // Minimum handle dragged above the maximum one is pushed back below it
        let bounds = SeasonBounds::from_slider_positions(100, 120);
        assert_eq!(bounds.low, (620.0 - 125.0) / 200.0);
        assert_eq!(bounds.high, 2.5);
        assert!(bounds.low < bounds.high);

        // Handles are clamped to the track
        let bounds = SeasonBounds::from_slider_positions(900, -50);
        assert_eq!(bounds.low, 0.0);
        assert_eq!(bounds.high, 3.0);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(matches!(
            SeasonBounds::new(2.0, 1.0),
            Err(ColonyError::InvalidSeasonBounds { .. })
        ));
        assert!(SeasonBounds::new(-0.1, 1.0).is_err());
        assert!(SeasonBounds::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SimulationConfig::from_toml_str(
            r#"
            initial_pigeons = 10
            seed = 7

            [season]
            low = 0.0
            high = 1.0
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.initial_pigeons, 10);
        assert_eq!(config.predator_count, 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.season.high, 1.0);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        let err = SimulationConfig::from_toml_str("initial_pigeons = 20000").unwrap_err();
        assert!(matches!(err, ColonyError::InvalidConfig(_)));

        let err = SimulationConfig::from_toml_str("initial_pigeons = \"many\"").unwrap_err();
        assert!(matches!(err, ColonyError::ConfigParse(_)));
    }
}
