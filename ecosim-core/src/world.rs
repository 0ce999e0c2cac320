use crate::grid;
use ecosim_types::{AgentId, AgentState, CellTag, PopulationCounts, Species, TagGrid};
use std::collections::BTreeMap;

/// Spatial state of the simulation: a dense tag array, the agent registry,
/// and the reverse position index. The three structures must always agree;
/// every mutation goes through this API so the invariant is enforced in one
/// place.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    size: i32,
    tags: Vec<CellTag>,
    occupancy: Vec<Option<AgentId>>,
    agents: BTreeMap<AgentId, AgentState>,
    next_agent_id: u64,
}

impl WorldGrid {
    pub fn new(size: u32) -> Self {
        let capacity = size as usize * size as usize;
        Self {
            size: size as i32,
            tags: vec![CellTag::Empty; capacity],
            occupancy: vec![None; capacity],
            agents: BTreeMap::new(),
            next_agent_id: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn alloc_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    /// Registers an agent on an empty cell. Calling this with an occupied
    /// target or a reused id is a contract violation and panics.
    pub fn add(&mut self, agent: AgentState) {
        let idx = self.cell_index(agent.position());
        assert!(
            self.occupancy[idx].is_none(),
            "add target cell {:?} is already occupied",
            agent.position(),
        );
        assert!(
            !self.agents.contains_key(&agent.id),
            "agent id {:?} is already registered",
            agent.id,
        );
        self.tags[idx] = CellTag::from(agent.species());
        self.occupancy[idx] = Some(agent.id);
        self.agents.insert(agent.id, agent);
    }

    /// Removes an agent from the registry, tag array, and position index as
    /// one logical operation. Idempotent: absent ids are a no-op.
    pub fn remove(&mut self, id: AgentId) -> Option<AgentState> {
        let agent = self.agents.remove(&id)?;
        let idx = self.cell_index(agent.position());
        debug_assert_eq!(self.occupancy[idx], Some(id));
        self.tags[idx] = CellTag::Empty;
        self.occupancy[idx] = None;
        Some(agent)
    }

    /// Resolves the occupant of `pos` via the reverse index and removes it;
    /// no-op if the cell is empty.
    pub fn remove_at(&mut self, pos: (i32, i32)) -> Option<AgentState> {
        let id = self.occupant_at(pos)?;
        self.remove(id)
    }

    /// Relocates a live agent onto an empty cell. The destination must have
    /// been vacated first (either observed empty or cleared by the same
    /// eat-then-occupy sequence); anything else is a contract violation.
    pub fn move_agent(&mut self, id: AgentId, to: (i32, i32)) {
        let (old_idx, tag) = {
            let agent = self
                .agents
                .get(&id)
                .expect("move of an agent that is not registered");
            (self.cell_index(agent.position()), CellTag::from(agent.species()))
        };
        let new_idx = self.cell_index(to);
        assert!(
            self.occupancy[new_idx].is_none(),
            "move target cell {to:?} is already occupied",
        );
        self.tags[old_idx] = CellTag::Empty;
        self.occupancy[old_idx] = None;
        self.tags[new_idx] = tag;
        self.occupancy[new_idx] = Some(id);
        let agent = self
            .agents
            .get_mut(&id)
            .expect("agent present above must still be present");
        agent.x = to.0;
        agent.y = to.1;
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(&id)
    }

    #[cfg(test)]
    pub(crate) fn set_next_agent_id(&mut self, next: u64) {
        self.next_agent_id = next;
    }

    pub fn occupant_at(&self, pos: (i32, i32)) -> Option<AgentId> {
        self.occupancy[self.cell_index(pos)]
    }

    pub fn tag_at(&self, pos: (i32, i32)) -> CellTag {
        self.tags[self.cell_index(pos)]
    }

    /// Point-in-time copy of the live agent ids, safe to iterate while the
    /// registry is mutated underneath.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Live agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn counts(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for agent in self.agents.values() {
            match agent.species() {
                Species::Prey => counts.prey += 1,
                Species::Predator => counts.predators += 1,
            }
        }
        counts
    }

    /// Orthogonal neighbors of `pos`, optionally restricted to cells whose
    /// tag matches `filter`.
    pub fn adjacent_cells(&self, pos: (i32, i32), filter: Option<CellTag>) -> Vec<(i32, i32)> {
        grid::adjacent_positions(pos, self.size)
            .into_iter()
            .filter(|&candidate| filter.is_none_or(|tag| self.tag_at(candidate) == tag))
            .collect()
    }

    /// Cells within toroidal Manhattan distance `radius` of `pos`, origin
    /// excluded, optionally restricted by tag. Never contains duplicates,
    /// whatever the radius.
    pub fn cells_in_radius(
        &self,
        pos: (i32, i32),
        radius: i32,
        filter: Option<CellTag>,
    ) -> Vec<(i32, i32)> {
        grid::positions_in_radius(pos, radius, self.size)
            .into_iter()
            .filter(|&candidate| filter.is_none_or(|tag| self.tag_at(candidate) == tag))
            .collect()
    }

    pub fn tag_grid(&self) -> TagGrid {
        TagGrid {
            size: self.size as u32,
            cells: self.tags.clone(),
        }
    }

    pub(crate) fn debug_assert_consistent(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(
                self.agents.len(),
                self.occupancy.iter().flatten().count(),
                "occupancy count must match the registry",
            );
            debug_assert_eq!(
                self.agents.len(),
                self.tags.iter().filter(|tag| **tag != CellTag::Empty).count(),
                "tag array count must match the registry",
            );
            for agent in self.agents.values() {
                let idx = self.cell_index(agent.position());
                debug_assert_eq!(
                    self.occupancy[idx],
                    Some(agent.id),
                    "occupancy must point at the agent on that cell",
                );
                debug_assert_eq!(
                    self.tags[idx],
                    CellTag::from(agent.species()),
                    "tag array must agree with the registry",
                );
            }
        }
    }

    fn cell_index(&self, (x, y): (i32, i32)) -> usize {
        debug_assert!(x >= 0 && y >= 0 && x < self.size && y < self.size);
        y as usize * self.size as usize + x as usize
    }
}
