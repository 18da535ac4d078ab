//! Population statistics, sampled once per frame for graphs and reports

use serde::Serialize;

use crate::core::types::Tick;
use crate::ecs::world::World;

/// The colony-wide statistics tracked over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Population,
    PercentSick,
    PercentOld,
    AverageSpeed,
    AveragePower,
    AverageMaxHealth,
    AverageMutation,
    AverageFullness,
}

impl Series {
    pub const ALL: [Series; 8] = [
        Series::Population,
        Series::PercentSick,
        Series::PercentOld,
        Series::AverageSpeed,
        Series::AveragePower,
        Series::AverageMaxHealth,
        Series::AverageMutation,
        Series::AverageFullness,
    ];
}

/// One frame's statistics; averages are `None` while the colony is empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSample {
    pub age: Tick,
    pub population: usize,
    pub percent_sick: Option<f64>,
    pub percent_old: Option<f64>,
    pub average_speed: Option<f64>,
    pub average_power: Option<f64>,
    pub average_max_health: Option<f64>,
    pub average_mutation: Option<f64>,
    pub average_fullness: Option<f64>,
}

impl StatsSample {
    pub fn capture(world: &World) -> Self {
        Self {
            age: world.age(),
            population: world.size(),
            percent_sick: world.percent_sick().ok(),
            percent_old: world.percent_old().ok(),
            average_speed: world.average_speed().ok(),
            average_power: world.average_power().ok(),
            average_max_health: world.average_max_health().ok(),
            average_mutation: world.average_mutation().ok(),
            average_fullness: world.average_fullness().ok(),
        }
    }

    pub fn get(&self, series: Series) -> Option<f64> {
        match series {
            Series::Population => Some(self.population as f64),
            Series::PercentSick => self.percent_sick,
            Series::PercentOld => self.percent_old,
            Series::AverageSpeed => self.average_speed,
            Series::AveragePower => self.average_power,
            Series::AverageMaxHealth => self.average_max_health,
            Series::AverageMutation => self.average_mutation,
            Series::AverageFullness => self.average_fullness,
        }
    }
}

/// Append-only record of samples
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsHistory {
    samples: Vec<StatsSample>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, world: &World) -> &StatsSample {
        self.samples.push(StatsSample::capture(world));
        &self.samples[self.samples.len() - 1]
    }

    pub fn latest(&self) -> Option<&StatsSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[StatsSample] {
        &self.samples
    }

    /// One statistic over time; gaps where the colony was empty
    pub fn series(&self, series: Series) -> impl Iterator<Item = (Tick, Option<f64>)> + '_ {
        self.samples.iter().map(move |s| (s.age, s.get(series)))
    }

    /// Largest defined value of a statistic so far
    pub fn peak(&self, series: Series) -> Option<f64> {
        self.series(series)
            .filter_map(|(_, value)| value)
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
    }
}
