use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub(super) fn test_config(grid_size: u32, num_prey: u32, num_predators: u32) -> WorldConfig {
    WorldConfig {
        grid_size,
        num_prey,
        num_predators,
        prey_reproduce_prob: 0.0,
        predator_reproduce_prob: 0.0,
        starve_time: 20,
        hunting_radius: 2,
        max_ticks: 100,
    }
}

pub(super) fn test_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub(super) fn make_prey(id: u64, x: i32, y: i32, reproduce_prob: f64) -> AgentState {
    AgentState::prey(AgentId(id), x, y, reproduce_prob)
}

pub(super) fn make_predator(
    id: u64,
    x: i32,
    y: i32,
    reproduce_prob: f64,
    starve_time: u32,
    hunting_radius: u32,
) -> AgentState {
    AgentState::predator(AgentId(id), x, y, reproduce_prob, starve_time, hunting_radius)
}

pub(super) fn predator_with_hunger(
    id: u64,
    x: i32,
    y: i32,
    hunger: u32,
    starve_time: u32,
    hunting_radius: u32,
) -> AgentState {
    let mut agent = make_predator(id, x, y, 0.0, starve_time, hunting_radius);
    let BehaviorState::Predator { hunger: slot, .. } = &mut agent.behavior else {
        unreachable!("make_predator builds a predator");
    };
    *slot = hunger;
    agent
}

/// Replaces the seeded population with an explicit scenario, keeping the id
/// allocator ahead of every injected id.
pub(super) fn configure_sim(sim: &mut Simulation, agents: Vec<AgentState>) {
    for id in sim.world.agent_ids() {
        sim.world.remove(id);
    }
    let mut next_id = 0;
    for agent in agents {
        next_id = next_id.max(agent.id.0 + 1);
        sim.world.add(agent);
    }
    sim.world.set_next_agent_id(next_id);
}

/// Full scan of the tag array against the registry and the reverse index.
pub(super) fn assert_world_consistent(world: &WorldGrid) {
    let tags = world.tag_grid();
    let mut occupied = 0usize;
    for y in 0..world.size() {
        for x in 0..world.size() {
            match world.occupant_at((x, y)) {
                Some(id) => {
                    let agent = world
                        .get(id)
                        .expect("occupant id must resolve in the registry");
                    assert_eq!(
                        agent.position(),
                        (x, y),
                        "registry coordinate must match the reverse index",
                    );
                    assert_eq!(
                        tags.at(x, y),
                        CellTag::from(agent.species()),
                        "tag must match the occupant's species",
                    );
                    occupied += 1;
                }
                None => assert_eq!(
                    tags.at(x, y),
                    CellTag::Empty,
                    "unoccupied cells must carry the empty tag",
                ),
            }
        }
    }
    assert_eq!(
        occupied,
        world.len(),
        "occupied cell count must equal the live agent count",
    );
}
