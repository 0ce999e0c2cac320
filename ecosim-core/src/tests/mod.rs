pub(super) use super::*;
pub(super) use ecosim_types::{
    AgentId, AgentState, BehaviorState, CellTag, PopulationCounts, RunOutcome, Species,
    WorldConfig,
};

mod config_and_seed;
mod support;
