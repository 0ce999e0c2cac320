use crate::{behavior, SimError, Simulation};
use ecosim_types::{PopulationCounts, RunOutcome, Species, TickReport};
use rand::seq::SliceRandom;

impl Simulation {
    /// Advances the world by one tick: every live agent acts exactly once,
    /// in uniformly random order. Agents removed by an earlier action within
    /// the same tick are skipped. Returns the per-tick report handed to the
    /// external collector, or an error if the clock already terminated.
    pub fn tick(&mut self) -> Result<TickReport, SimError> {
        if let Some(outcome) = self.outcome {
            return Err(SimError::Halted(outcome));
        }

        let mut order = self.world.agent_ids();
        order.shuffle(&mut self.rng);

        let mut meals = 0u64;
        let mut starvations = 0u64;
        let mut prey_births = 0u64;
        let mut predator_births = 0u64;
        for id in order {
            if !self.world.contains(id) {
                // Eaten or starved earlier this tick.
                continue;
            }
            let effects = behavior::step_agent(&mut self.world, id, &mut self.rng);
            if effects.meal {
                meals += 1;
            }
            if effects.starved {
                starvations += 1;
            }
            match effects.spawned {
                Some(Species::Prey) => prey_births += 1,
                Some(Species::Predator) => predator_births += 1,
                None => {}
            }
        }

        self.tick += 1;
        self.metrics.meals_last_tick = meals;
        self.metrics.starvations_last_tick = starvations;
        self.metrics.prey_births_last_tick = prey_births;
        self.metrics.predator_births_last_tick = predator_births;
        self.metrics.total_meals += meals;
        self.metrics.total_starvations += starvations;
        self.metrics.total_births += prey_births + predator_births;

        self.world.debug_assert_consistent();

        let counts = self.world.counts();
        self.outcome = self.evaluate_outcome(&counts);

        Ok(TickReport {
            tick: self.tick,
            counts,
            metrics: self.metrics.clone(),
            outcome: self.outcome,
        })
    }

    /// Collapse is judged only for species that were seeded at all; a species
    /// absent from the start cannot end the run.
    fn evaluate_outcome(&self, counts: &PopulationCounts) -> Option<RunOutcome> {
        if self.config.num_prey > 0 && counts.prey == 0 {
            return Some(RunOutcome::Collapse {
                species: Species::Prey,
            });
        }
        if self.config.num_predators > 0 && counts.predators == 0 {
            return Some(RunOutcome::Collapse {
                species: Species::Predator,
            });
        }
        if self.tick >= u64::from(self.config.max_ticks) {
            return Some(RunOutcome::MaxTicksReached);
        }
        None
    }
}
