//! The `ReservationTable`.

use std::collections::VecDeque;

use tracing::{debug, trace};

use ft_core::{AgentId, VertexId};

use crate::{Acquire, Release};

#[cfg(feature = "fx-hash")]
type AgentIndex = rustc_hash::FxHashMap<AgentId, VertexId>;
#[cfg(not(feature = "fx-hash"))]
type AgentIndex = std::collections::HashMap<AgentId, VertexId>;

#[derive(Debug, Default, Clone)]
struct Slot {
    holder:   Option<AgentId>,
    promised: Option<AgentId>,
    queue:    VecDeque<AgentId>,
}

impl Slot {
    #[inline]
    fn is_available(&self) -> bool {
        self.holder.is_none() && self.promised.is_none() && self.queue.is_empty()
    }
}

/// Exclusive vertex reservations plus a FIFO wait queue per vertex.
///
/// Indexed by `VertexId`; the vertex set is fixed at construction.  Besides
/// the per-vertex slots the table keeps two reverse indices so that an agent
/// can be purged from the queue it waits in (and from any promise it holds)
/// without a scan.
pub struct ReservationTable {
    slots:    Vec<Slot>,
    /// Agent → the vertex whose queue it waits in.  At most one per agent.
    queued:   AgentIndex,
    /// Agent → the vertex promised to it by the last release.
    promises: AgentIndex,
}

impl ReservationTable {
    /// A table with every vertex free.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            slots:    vec![Slot::default(); vertex_count],
            queued:   AgentIndex::default(),
            promises: AgentIndex::default(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.slots.len()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Who currently holds `v`.
    #[inline]
    pub fn holder(&self, v: VertexId) -> Option<AgentId> {
        self.slots[v.index()].holder
    }

    /// The waiter a free `v` is reserved for, if any.
    #[inline]
    pub fn promised_to(&self, v: VertexId) -> Option<AgentId> {
        self.slots[v.index()].promised
    }

    /// The vertex promised to `agent`, if any.
    #[inline]
    pub fn promise_of(&self, agent: AgentId) -> Option<VertexId> {
        self.promises.get(&agent).copied()
    }

    /// Agents queued on `v`, head first.
    pub fn waiters(&self, v: VertexId) -> impl Iterator<Item = AgentId> + '_ {
        self.slots[v.index()].queue.iter().copied()
    }

    /// Free, not promised, nobody queued.
    #[inline]
    pub fn is_available(&self, v: VertexId) -> bool {
        self.slots[v.index()].is_available()
    }

    /// The vertex whose queue `agent` waits in.
    pub fn queued_on(&self, agent: AgentId) -> Option<VertexId> {
        self.queued.get(&agent).copied()
    }

    /// Every held vertex and its holder, ascending by vertex.
    pub fn held(&self) -> impl Iterator<Item = (VertexId, AgentId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.holder.map(|a| (VertexId::from_index(i), a)))
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Take `v` only if it is fully available.  Never queues.
    ///
    /// Used for placement (spawn, forced relocation), where waiting makes no
    /// sense: the caller reports `VertexOccupied` on `false`.
    pub fn claim(&mut self, v: VertexId, agent: AgentId) -> bool {
        let slot = &mut self.slots[v.index()];
        if !slot.is_available() {
            return false;
        }
        slot.holder = Some(agent);
        trace!(vertex = v.0, agent = agent.0, "claimed");
        true
    }

    /// Grant `v` to `agent` if it is free (and not promised to someone else)
    /// or already held by `agent`.  Otherwise queue `agent` on `v` and deny.
    ///
    /// Queuing on `v` drops any earlier queue position the agent had
    /// elsewhere; an agent waits in at most one queue.
    pub fn try_acquire(&mut self, v: VertexId, agent: AgentId) -> Acquire {
        let slot = &self.slots[v.index()];
        if slot.holder == Some(agent) {
            return Acquire::Granted;
        }

        let holder = slot.holder;
        let grantable = holder.is_none()
            && match slot.promised {
                Some(p) => p == agent,
                None    => slot.queue.front().is_none_or(|&head| head == agent),
            };

        if grantable {
            self.grant(v, agent);
            trace!(vertex = v.0, agent = agent.0, "granted");
            return Acquire::Granted;
        }

        self.enqueue(v, agent);
        trace!(vertex = v.0, agent = agent.0, holder = ?holder.map(|h| h.0), "denied");
        Acquire::Denied { holder }
    }

    /// Clear `agent`'s hold on `v`.  The queue head, if any, becomes the
    /// vertex's promised next holder and is returned; it is **not** granted.
    pub fn release(&mut self, v: VertexId, agent: AgentId) -> Release {
        let slot = &mut self.slots[v.index()];
        if slot.holder != Some(agent) {
            return Release::NotHolder;
        }
        slot.holder = None;

        let next_eligible = slot.queue.pop_front();
        if let Some(next) = next_eligible {
            slot.promised = Some(next);
            self.queued.remove(&next);
            self.promises.insert(next, v);
            debug!(vertex = v.0, from = agent.0, to = next.0, "released with hand-off");
        } else {
            trace!(vertex = v.0, agent = agent.0, "released");
        }
        Release::Released { next_eligible }
    }

    /// Remove `agent` from every queue and promise it is part of.
    ///
    /// If `agent` held a promise, the vertex passes to the next waiter,
    /// which is returned as `(vertex, next_eligible)` so the caller can
    /// deliver the grant.
    pub fn withdraw(&mut self, agent: AgentId) -> Option<(VertexId, AgentId)> {
        if let Some(v) = self.queued.remove(&agent) {
            self.slots[v.index()].queue.retain(|&a| a != agent);
        }

        let v = self.promises.remove(&agent)?;
        let slot = &mut self.slots[v.index()];
        slot.promised = None;
        let next = slot.queue.pop_front()?;
        slot.promised = Some(next);
        self.queued.remove(&next);
        self.promises.insert(next, v);
        debug!(vertex = v.0, from = agent.0, to = next.0, "promise passed on");
        Some((v, next))
    }

    /// Move every agent of a wait cycle into the vertex it is waiting for,
    /// as one atomic step.
    ///
    /// `moves` holds `(agent, from, to)` triples.  The rotation is applied
    /// only if every `from` is held by its agent, the `to` set equals the
    /// `from` set (every target is vacated by another member of the cycle),
    /// and nobody outside the cycle queued on a `to` ahead of its mover.  A
    /// rotation never jumps a queue.  Returns whether it was applied.
    pub fn rotate(&mut self, moves: &[(AgentId, VertexId, VertexId)]) -> bool {
        let holds = moves.iter().all(|&(a, from, _)| self.holder(from) == Some(a));
        let heads = moves
            .iter()
            .all(|&(a, _, to)| self.slots[to.index()].queue.front().is_none_or(|&h| h == a));
        let mut froms: Vec<VertexId> = moves.iter().map(|m| m.1).collect();
        let mut tos:   Vec<VertexId> = moves.iter().map(|m| m.2).collect();
        froms.sort_unstable();
        tos.sort_unstable();
        let closed = froms == tos && froms.windows(2).all(|w| w[0] != w[1]);
        if moves.is_empty() || !holds || !closed || !heads {
            return false;
        }

        for &(agent, _, to) in moves {
            if self.queued.get(&agent) == Some(&to) {
                self.queued.remove(&agent);
                self.slots[to.index()].queue.retain(|&a| a != agent);
            }
        }
        for &(agent, _, to) in moves {
            self.slots[to.index()].holder = Some(agent);
        }
        debug!(agents = moves.len(), "rotated wait cycle");
        true
    }

    /// Describe every broken table invariant.  Empty when consistent.
    ///
    /// Checked: an agent holds at most one vertex, waits in at most one
    /// queue, never waits on a vertex it holds, and a promise only exists
    /// on a free vertex.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut holders: Vec<AgentId> = self.held().map(|(_, a)| a).collect();
        holders.sort_unstable();
        for w in holders.windows(2) {
            if w[0] == w[1] {
                out.push(format!("{} holds more than one vertex", w[0]));
            }
        }

        let mut waiting: Vec<AgentId> = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let v = VertexId::from_index(i);
            if slot.promised.is_some() && slot.holder.is_some() {
                out.push(format!("{v} is both held and promised"));
            }
            if let Some(h) = slot.holder {
                if slot.queue.contains(&h) {
                    out.push(format!("{h} waits on {v}, which it holds"));
                }
            }
            waiting.extend(slot.queue.iter().copied());
        }
        waiting.sort_unstable();
        for w in waiting.windows(2) {
            if w[0] == w[1] {
                out.push(format!("{} waits in more than one queue", w[0]));
            }
        }
        out
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn grant(&mut self, v: VertexId, agent: AgentId) {
        let slot = &mut self.slots[v.index()];
        slot.holder = Some(agent);
        slot.promised = None;
        slot.queue.retain(|&a| a != agent);
        if self.promises.get(&agent) == Some(&v) {
            self.promises.remove(&agent);
        }
        if self.queued.get(&agent) == Some(&v) {
            self.queued.remove(&agent);
        }
    }

    fn enqueue(&mut self, v: VertexId, agent: AgentId) {
        match self.queued.get(&agent).copied() {
            Some(current) if current == v => return,
            Some(other) => {
                self.slots[other.index()].queue.retain(|&a| a != agent);
            }
            None => {}
        }
        self.slots[v.index()].queue.push_back(agent);
        self.queued.insert(agent, v);
    }
}
