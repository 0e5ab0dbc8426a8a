//! Outcomes of reservation operations.
//!
//! These are plain results, not errors: a denial is the normal way an agent
//! learns it has to wait.

use ft_core::AgentId;

/// Result of [`ReservationTable::try_acquire`][crate::ReservationTable::try_acquire].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The agent now holds the vertex (or already did).
    Granted,
    /// The agent is queued on the vertex.  `holder` is whoever stands on it;
    /// `None` means the vertex is free but promised to an earlier waiter.
    Denied { holder: Option<AgentId> },
}

impl Acquire {
    #[inline]
    pub fn is_granted(self) -> bool {
        matches!(self, Acquire::Granted)
    }
}

/// Result of [`ReservationTable::release`][crate::ReservationTable::release].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The vertex is free.  `next_eligible` is the queue head it is now
    /// promised to; the caller must deliver that grant.
    Released { next_eligible: Option<AgentId> },
    /// The agent did not hold the vertex.  Nothing changed.  Seeing this
    /// means the caller's bookkeeping is broken.
    NotHolder,
}
