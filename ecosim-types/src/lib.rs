use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    Prey,
    Predator,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Prey, Species::Predator];
}

/// Dense per-cell tag, the O(1) render view of the world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CellTag {
    #[default]
    Empty,
    Prey,
    Predator,
}

impl CellTag {
    pub fn species(self) -> Option<Species> {
        match self {
            CellTag::Empty => None,
            CellTag::Prey => Some(Species::Prey),
            CellTag::Predator => Some(Species::Predator),
        }
    }
}

impl From<Species> for CellTag {
    fn from(species: Species) -> Self {
        match species {
            Species::Prey => CellTag::Prey,
            Species::Predator => CellTag::Predator,
        }
    }
}

/// Species-specific mutable state carried by each agent. Offspring inherit
/// the parent's parameters verbatim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "species")]
pub enum BehaviorState {
    Prey {
        reproduce_prob: f64,
    },
    Predator {
        reproduce_prob: f64,
        /// Ticks left before starvation; reset to `starve_time` on a meal.
        hunger: u32,
        starve_time: u32,
        hunting_radius: u32,
        ate_this_tick: bool,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub id: AgentId,
    pub x: i32,
    pub y: i32,
    pub behavior: BehaviorState,
}

impl AgentState {
    pub fn prey(id: AgentId, x: i32, y: i32, reproduce_prob: f64) -> Self {
        Self {
            id,
            x,
            y,
            behavior: BehaviorState::Prey { reproduce_prob },
        }
    }

    pub fn predator(
        id: AgentId,
        x: i32,
        y: i32,
        reproduce_prob: f64,
        starve_time: u32,
        hunting_radius: u32,
    ) -> Self {
        Self {
            id,
            x,
            y,
            behavior: BehaviorState::Predator {
                reproduce_prob,
                hunger: starve_time,
                starve_time,
                hunting_radius,
                ate_this_tick: false,
            },
        }
    }

    pub fn species(&self) -> Species {
        match self.behavior {
            BehaviorState::Prey { .. } => Species::Prey,
            BehaviorState::Predator { .. } => Species::Predator,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default = "default_num_prey")]
    pub num_prey: u32,
    #[serde(default = "default_num_predators")]
    pub num_predators: u32,
    #[serde(default = "default_prey_reproduce_prob")]
    pub prey_reproduce_prob: f64,
    #[serde(default = "default_predator_reproduce_prob")]
    pub predator_reproduce_prob: f64,
    #[serde(default = "default_starve_time")]
    pub starve_time: u32,
    #[serde(default = "default_hunting_radius")]
    pub hunting_radius: u32,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

impl WorldConfig {
    pub fn capacity(&self) -> u64 {
        self.grid_size as u64 * self.grid_size as u64
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        default_world_config()
    }
}

fn default_grid_size() -> u32 {
    50
}

fn default_num_prey() -> u32 {
    400
}

fn default_num_predators() -> u32 {
    50
}

fn default_prey_reproduce_prob() -> f64 {
    0.1
}

fn default_predator_reproduce_prob() -> f64 {
    0.05
}

fn default_starve_time() -> u32 {
    20
}

fn default_hunting_radius() -> u32 {
    8
}

fn default_max_ticks() -> u32 {
    200
}

pub fn world_config_from_toml_str(raw: &str) -> Result<WorldConfig, toml::de::Error> {
    toml::from_str(raw)
}

pub fn default_world_config() -> WorldConfig {
    world_config_from_toml_str(include_str!("../default.toml"))
        .expect("default world config TOML must deserialize")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PopulationCounts {
    pub prey: u32,
    pub predators: u32,
}

impl PopulationCounts {
    pub fn of(&self, species: Species) -> u32 {
        match species {
            Species::Prey => self.prey,
            Species::Predator => self.predators,
        }
    }

    pub fn total(&self) -> u32 {
        self.prey + self.predators
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub meals_last_tick: u64,
    pub starvations_last_tick: u64,
    pub prey_births_last_tick: u64,
    pub predator_births_last_tick: u64,
    pub total_meals: u64,
    pub total_starvations: u64,
    pub total_births: u64,
}

/// Why a run stopped, surfaced once when the clock transitions to terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunOutcome {
    MaxTicksReached,
    Collapse { species: Species },
}

/// Per-tick record handed to the external collector after every agent acted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub counts: PopulationCounts,
    pub metrics: MetricsSnapshot,
    pub outcome: Option<RunOutcome>,
}

/// Row-major dense copy of the cell tags, independent of the live world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagGrid {
    pub size: u32,
    pub cells: Vec<CellTag>,
}

impl TagGrid {
    pub fn at(&self, x: i32, y: i32) -> CellTag {
        debug_assert!(x >= 0 && y >= 0 && (x as u32) < self.size && (y as u32) < self.size);
        self.cells[y as usize * self.size as usize + x as usize]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub rng_seed: u64,
    pub config: WorldConfig,
    pub counts: PopulationCounts,
    pub agents: Vec<AgentState>,
    pub tags: TagGrid,
    pub outcome: Option<RunOutcome>,
}
