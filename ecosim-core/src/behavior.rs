use crate::world::WorldGrid;
use ecosim_types::{AgentId, AgentState, BehaviorState, CellTag, Species};
use rand::seq::IndexedRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Side effects of one agent's step, aggregated by the clock into per-tick
/// metrics.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StepEffects {
    pub(crate) meal: bool,
    pub(crate) starved: bool,
    pub(crate) spawned: Option<Species>,
}

/// Runs one agent's state machine for the current tick, applying all side
/// effects directly to the grid. Agents removed earlier in the same tick
/// resolve to a no-op.
pub(crate) fn step_agent(world: &mut WorldGrid, id: AgentId, rng: &mut ChaCha8Rng) -> StepEffects {
    let Some(agent) = world.get(id).copied() else {
        return StepEffects::default();
    };
    match agent.behavior {
        BehaviorState::Prey { reproduce_prob } => step_prey(world, id, reproduce_prob, rng),
        BehaviorState::Predator {
            reproduce_prob,
            starve_time,
            hunting_radius,
            ..
        } => step_predator(world, id, reproduce_prob, starve_time, hunting_radius, rng),
    }
}

fn step_prey(
    world: &mut WorldGrid,
    id: AgentId,
    reproduce_prob: f64,
    rng: &mut ChaCha8Rng,
) -> StepEffects {
    let pos = live_position(world, id);
    if let Some(&dest) = world.adjacent_cells(pos, Some(CellTag::Empty)).choose(rng) {
        world.move_agent(id, dest);
    }

    let mut effects = StepEffects::default();
    if rng.random_bool(reproduce_prob) {
        // Re-query from the current, possibly just-moved position.
        let pos = live_position(world, id);
        if let Some(&cell) = world.adjacent_cells(pos, Some(CellTag::Empty)).choose(rng) {
            let child = AgentState::prey(world.alloc_agent_id(), cell.0, cell.1, reproduce_prob);
            world.add(child);
            effects.spawned = Some(Species::Prey);
        }
    }
    effects
}

fn step_predator(
    world: &mut WorldGrid,
    id: AgentId,
    reproduce_prob: f64,
    starve_time: u32,
    hunting_radius: u32,
    rng: &mut ChaCha8Rng,
) -> StepEffects {
    set_ate_flag(world, id, false);
    let pos = live_position(world, id);

    let mut effects = StepEffects::default();
    let prey_cells = world.cells_in_radius(pos, hunting_radius as i32, Some(CellTag::Prey));
    if let Some(&target) = prey_cells.choose(rng) {
        // The prey's cell must be vacated before the hunter moves in; no
        // other agent acts between these two calls.
        world.remove_at(target);
        world.move_agent(id, target);
        reset_hunger(world, id, starve_time);
        set_ate_flag(world, id, true);
        effects.meal = true;

        if rng.random_bool(reproduce_prob) {
            // The parent just vacated `pos`; strictly sequential stepping
            // keeps it empty until the child lands there.
            let child = AgentState::predator(
                world.alloc_agent_id(),
                pos.0,
                pos.1,
                reproduce_prob,
                starve_time,
                hunting_radius,
            );
            world.add(child);
            effects.spawned = Some(Species::Predator);
        }
    } else {
        if let Some(&dest) = world.adjacent_cells(pos, Some(CellTag::Empty)).choose(rng) {
            world.move_agent(id, dest);
        }
        if decrement_hunger(world, id) == 0 {
            world.remove(id);
            effects.starved = true;
        }
    }
    effects
}

fn live_position(world: &WorldGrid, id: AgentId) -> (i32, i32) {
    world
        .get(id)
        .expect("stepped agent must be live")
        .position()
}

fn set_ate_flag(world: &mut WorldGrid, id: AgentId, value: bool) {
    if let Some(agent) = world.get_mut(id) {
        if let BehaviorState::Predator { ate_this_tick, .. } = &mut agent.behavior {
            *ate_this_tick = value;
        }
    }
}

fn reset_hunger(world: &mut WorldGrid, id: AgentId, starve_time: u32) {
    if let Some(agent) = world.get_mut(id) {
        if let BehaviorState::Predator { hunger, .. } = &mut agent.behavior {
            *hunger = starve_time;
        }
    }
}

/// Decrements the predator's starvation countdown, clamped at zero, and
/// returns the new value.
fn decrement_hunger(world: &mut WorldGrid, id: AgentId) -> u32 {
    let agent = world.get_mut(id).expect("stepped agent must be live");
    let BehaviorState::Predator { hunger, .. } = &mut agent.behavior else {
        unreachable!("hunger is only decremented on predators");
    };
    *hunger = hunger.saturating_sub(1);
    *hunger
}
