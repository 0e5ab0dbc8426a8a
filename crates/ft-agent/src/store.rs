//! The `RobotStore` — every robot, indexed by `AgentId`.

use ft_core::{AgentId, VertexId};

use crate::Robot;

/// All robots in spawn order.
///
/// `AgentId`s are handed out sequentially and never reused, so the id is
/// the slot index.  A removed robot leaves a `None` slot behind; iteration
/// skips it and keeps ascending-id (= spawn) order.
#[derive(Debug, Default, Clone)]
pub struct RobotStore {
    slots: Vec<Option<Robot>>,
    live:  usize,
}

impl RobotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next `spawn` will hand out.
    #[inline]
    pub fn next_id(&self) -> AgentId {
        AgentId::from_index(self.slots.len())
    }

    /// Create an unassigned robot on `at`.  The caller must already hold
    /// `at` in the reservation table under `next_id()`.
    pub fn spawn(&mut self, at: VertexId) -> AgentId {
        let id = self.next_id();
        self.slots.push(Some(Robot::new(id, at)));
        self.live += 1;
        id
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Robot> {
        let robot = self.slots.get_mut(id.index())?.take()?;
        self.live -= 1;
        Some(robot)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Robot> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Robot> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live robots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live robots, ascending by id.
    pub fn iter(&self) -> impl Iterator<Item = &Robot> + '_ {
        self.slots.iter().flatten()
    }

    /// Ids of the live robots, ascending.  Collected so the caller can
    /// mutate the store while walking the list.
    pub fn ids(&self) -> Vec<AgentId> {
        self.iter().map(|r| r.id).collect()
    }
}
