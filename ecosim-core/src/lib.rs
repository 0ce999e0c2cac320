use ecosim_types::{
    MetricsSnapshot, RunOutcome, TickReport, WorldConfig, WorldSnapshot,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use thiserror::Error;

mod behavior;
mod grid;
mod spawn;
mod turn;
mod world;

pub use world::WorldGrid;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
    #[error("simulation already terminated ({0:?})")]
    Halted(RunOutcome),
}

/// Owns the world and the single rng stream, and drives discrete ticks until
/// the run terminates by tick exhaustion or species collapse.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: WorldConfig,
    tick: u64,
    seed: u64,
    rng: ChaCha8Rng,
    world: WorldGrid,
    metrics: MetricsSnapshot,
    outcome: Option<RunOutcome>,
}

impl Simulation {
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, SimError> {
        validate_config(&config)?;

        let mut sim = Self {
            world: WorldGrid::new(config.grid_size),
            config,
            tick: 0,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            metrics: MetricsSnapshot::default(),
            outcome: None,
        };
        sim.spawn_initial_population();
        sim.world.debug_assert_consistent();
        Ok(sim)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    pub fn completed_ticks(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    /// Read-only view of the current world state, independent of the live
    /// structures. Agents are sorted by id.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            rng_seed: self.seed,
            config: self.config.clone(),
            counts: self.world.counts(),
            agents: self.world.agents().copied().collect(),
            tags: self.world.tag_grid(),
            outcome: self.outcome,
        }
    }

    /// Rebuilds the initial state, reseeding the rng. `None` replays the
    /// current seed.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or(self.seed);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.tick = 0;
        self.world = WorldGrid::new(self.config.grid_size);
        self.metrics = MetricsSnapshot::default();
        self.outcome = None;
        self.spawn_initial_population();
        self.world.debug_assert_consistent();
    }

    /// Runs up to `count` ticks, stopping early if the clock terminates.
    pub fn step_n(&mut self, count: u32) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(count as usize);
        for _ in 0..count {
            match self.tick() {
                Ok(report) => reports.push(report),
                Err(_) => break,
            }
        }
        reports
    }

    /// Runs until termination; `max_ticks` bounds the loop.
    pub fn run_to_end(&mut self) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while self.outcome.is_none() {
            match self.tick() {
                Ok(report) => reports.push(report),
                Err(_) => break,
            }
        }
        reports
    }

    /// One JSON line per snapshot: the initial state, then one per tick until
    /// `max_ticks` or termination.
    pub fn trace_jsonl(&mut self, max_ticks: u32) -> Vec<String> {
        let mut lines = vec![serde_json::to_string(&self.snapshot())
            .expect("serialize initial snapshot for trace export")];
        for _ in 0..max_ticks {
            if self.tick().is_err() {
                break;
            }
            lines.push(
                serde_json::to_string(&self.snapshot())
                    .expect("serialize tick snapshot for trace export"),
            );
            if self.outcome.is_some() {
                break;
            }
        }
        lines
    }
}

fn validate_config(config: &WorldConfig) -> Result<(), SimError> {
    if config.grid_size == 0 {
        return Err(SimError::InvalidConfig(
            "grid_size must be greater than zero".to_owned(),
        ));
    }
    if config.max_ticks == 0 {
        return Err(SimError::InvalidConfig(
            "max_ticks must be >= 1".to_owned(),
        ));
    }
    if config.starve_time == 0 {
        return Err(SimError::InvalidConfig(
            "starve_time must be >= 1".to_owned(),
        ));
    }
    if config.hunting_radius == 0 {
        return Err(SimError::InvalidConfig(
            "hunting_radius must be >= 1".to_owned(),
        ));
    }
    for (name, probability) in [
        ("prey_reproduce_prob", config.prey_reproduce_prob),
        ("predator_reproduce_prob", config.predator_reproduce_prob),
    ] {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SimError::InvalidConfig(format!(
                "{name} must be within [0, 1]"
            )));
        }
    }
    let population = u64::from(config.num_prey) + u64::from(config.num_predators);
    if population > config.capacity() {
        return Err(SimError::InvalidConfig(format!(
            "initial population {population} exceeds grid capacity {}",
            config.capacity()
        )));
    }
    Ok(())
}

pub fn compare_snapshots(a: &WorldSnapshot, b: &WorldSnapshot) -> Ordering {
    let snapshot_a = serde_json::to_string(a).expect("serialize snapshot A");
    let snapshot_b = serde_json::to_string(b).expect("serialize snapshot B");
    snapshot_a.cmp(&snapshot_b)
}
