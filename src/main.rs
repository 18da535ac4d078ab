//! Pigeon Colony - Headless Runner
//!
//! Runs the colony for a number of frames without any pacing and reports
//! population statistics along the way, as text or JSON lines.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pigeon_colony::core::config::{SeasonBounds, SimulationConfig};
use pigeon_colony::core::error::Result;
use pigeon_colony::ecs::world::World;
use pigeon_colony::simulation::{Series, SimulationEvent, StatsHistory, StatsSample};

/// Headless pigeon colony simulation
#[derive(Parser, Debug)]
#[command(name = "pigeon-colony")]
#[command(about = "Run the pigeon colony simulation and report population statistics")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 10_000)]
    frames: u64,

    /// Random seed for reproducible runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Food per frame at the bottom of the lean season
    #[arg(long)]
    low: Option<f64>,

    /// Food per frame at the peak of the rich season
    #[arg(long)]
    high: Option<f64>,

    /// Frames between two reports
    #[arg(long, default_value_t = 500)]
    report_every: u64,

    /// Emit each report as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

/// Totals over the whole run
#[derive(Debug, Default)]
struct RunTally {
    eaten: usize,
    killed_in_combat: usize,
    died: usize,
    born: usize,
}

impl RunTally {
    fn count(&mut self, events: &[SimulationEvent]) {
        for event in events {
            match event {
                SimulationEvent::Eaten { .. } => self.eaten += 1,
                SimulationEvent::KilledInCombat { .. } => self.killed_in_combat += 1,
                SimulationEvent::Died { .. } => self.died += 1,
                SimulationEvent::Born { .. } => self.born += 1,
                SimulationEvent::PredatorsRecalibrated { .. } => {}
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pigeon_colony=info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    tracing::info!(
        pigeons = config.initial_pigeons,
        predators = config.predator_count,
        low = config.season.low,
        high = config.season.high,
        seed = ?config.seed,
        "Pigeon colony starting"
    );

    let mut world = World::new(config)?;
    let mut history = StatsHistory::new();
    let mut tally = RunTally::default();
    let report_every = args.report_every.max(1);

    // History holds reported frames only
    for _ in 0..args.frames {
        let events = world.step();
        tally.count(&events);

        if world.age() % report_every == 0 {
            report(history.record(&world), args.json)?;
        }
        if world.size() == 0 {
            tracing::info!(age = world.age(), "Colony died out");
            break;
        }
    }

    if history.latest().map(|last| last.age) != Some(world.age()) {
        report(history.record(&world), args.json)?;
    }

    tracing::info!(
        frames = world.age(),
        population = world.size(),
        peak_population = ?history.peak(Series::Population),
        born = tally.born,
        eaten = tally.eaten,
        killed_in_combat = tally.killed_in_combat,
        died = tally.died,
        "Run finished"
    );

    Ok(())
}

fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.low.is_some() || args.high.is_some() {
        config.season = SeasonBounds::new(
            args.low.unwrap_or(config.season.low),
            args.high.unwrap_or(config.season.high),
        )?;
    }

    config.validate()?;
    Ok(config)
}

fn report(sample: &StatsSample, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(sample)?);
        return Ok(());
    }

    let show = |value: Option<f64>| match value {
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    };
    println!(
        "age {:>6}  alive {:>4}  sick {:>7}%  old {:>7}%  speed {}  power {}  hp {}  mut {}  full {}",
        sample.age,
        sample.population,
        show(sample.percent_sick),
        show(sample.percent_old),
        show(sample.average_speed),
        show(sample.average_power),
        show(sample.average_max_health),
        show(sample.average_mutation),
        show(sample.average_fullness),
    );
    Ok(())
}
