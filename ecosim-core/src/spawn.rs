use crate::Simulation;
use ecosim_types::{AgentState, CellTag, Species};
use rand::Rng;

impl Simulation {
    pub(crate) fn spawn_initial_population(&mut self) {
        self.place_random(Species::Prey, self.config.num_prey);
        self.place_random(Species::Predator, self.config.num_predators);
    }

    /// Rejection-sampling placement: sample uniform coordinates and keep the
    /// empty ones until `count` agents are down. Config validation caps the
    /// total population at the grid capacity, so the loop terminates.
    fn place_random(&mut self, species: Species, count: u32) {
        let size = self.config.grid_size as i32;
        let mut placed = 0;
        while placed < count {
            let x = self.rng.random_range(0..size);
            let y = self.rng.random_range(0..size);
            if self.world.tag_at((x, y)) != CellTag::Empty {
                continue;
            }
            let id = self.world.alloc_agent_id();
            let agent = match species {
                Species::Prey => {
                    AgentState::prey(id, x, y, self.config.prey_reproduce_prob)
                }
                Species::Predator => AgentState::predator(
                    id,
                    x,
                    y,
                    self.config.predator_reproduce_prob,
                    self.config.starve_time,
                    self.config.hunting_radius,
                ),
            };
            self.world.add(agent);
            placed += 1;
        }
    }
}
