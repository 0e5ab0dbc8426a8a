//! Unit tests for ft-reserve.

use ft_core::{AgentId, VertexId};

use crate::{Acquire, Release, ReservationTable};

const A: AgentId = AgentId(0);
const B: AgentId = AgentId(1);
const C: AgentId = AgentId(2);

const V0: VertexId = VertexId(0);
const V1: VertexId = VertexId(1);
const V2: VertexId = VertexId(2);

fn table() -> ReservationTable {
    ReservationTable::new(4)
}

// ── Acquire ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod acquire {
    use super::*;

    #[test]
    fn free_vertex_is_granted() {
        let mut t = table();
        assert_eq!(t.try_acquire(V0, A), Acquire::Granted);
        assert_eq!(t.holder(V0), Some(A));
        assert!(!t.is_available(V0));
    }

    #[test]
    fn self_hold_is_idempotent() {
        let mut t = table();
        t.try_acquire(V0, A);
        assert_eq!(t.try_acquire(V0, A), Acquire::Granted);
        assert_eq!(t.waiters(V0).count(), 0);
    }

    #[test]
    fn held_vertex_denies_and_queues_once() {
        let mut t = table();
        t.try_acquire(V0, A);
        assert_eq!(t.try_acquire(V0, B), Acquire::Denied { holder: Some(A) });
        assert_eq!(t.try_acquire(V0, B), Acquire::Denied { holder: Some(A) });
        assert_eq!(t.waiters(V0).collect::<Vec<_>>(), vec![B]);
        assert_eq!(t.queued_on(B), Some(V0));
    }

    #[test]
    fn queuing_elsewhere_moves_the_agent() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, C);
        t.try_acquire(V0, B);
        t.try_acquire(V1, B);
        assert_eq!(t.waiters(V0).count(), 0);
        assert_eq!(t.waiters(V1).collect::<Vec<_>>(), vec![B]);
        assert_eq!(t.queued_on(B), Some(V1));
        assert!(t.violations().is_empty());
    }
}

// ── Release ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod release {
    use super::*;

    #[test]
    fn release_without_waiters_frees_vertex() {
        let mut t = table();
        t.try_acquire(V0, A);
        assert_eq!(t.release(V0, A), Release::Released { next_eligible: None });
        assert!(t.is_available(V0));
    }

    #[test]
    fn release_by_non_holder_changes_nothing() {
        let mut t = table();
        t.try_acquire(V0, A);
        assert_eq!(t.release(V0, B), Release::NotHolder);
        assert_eq!(t.release(V1, A), Release::NotHolder);
        assert_eq!(t.holder(V0), Some(A));
    }

    #[test]
    fn release_promises_but_does_not_grant() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);
        assert_eq!(t.release(V0, A), Release::Released { next_eligible: Some(B) });
        assert_eq!(t.holder(V0), None);
        assert_eq!(t.promised_to(V0), Some(B));
        assert_eq!(t.queued_on(B), None);
        assert_eq!(t.promise_of(B), Some(V0));
        assert!(!t.is_available(V0));
    }

    #[test]
    fn promised_vertex_refuses_others() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);
        t.release(V0, A);
        assert_eq!(t.try_acquire(V0, C), Acquire::Denied { holder: None });
        assert!(!t.claim(V0, C));
        assert_eq!(t.try_acquire(V0, B), Acquire::Granted);
        assert_eq!(t.promised_to(V0), None);
        assert_eq!(t.waiters(V0).collect::<Vec<_>>(), vec![C]);
    }
}

// ── FIFO fairness ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod fifo {
    use super::*;

    #[test]
    fn first_requester_is_first_granted() {
        let mut t = table();
        t.try_acquire(V0, C);
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);

        assert_eq!(t.release(V0, C), Release::Released { next_eligible: Some(A) });
        // B asks first after the release, but A was queued first.
        assert!(!t.try_acquire(V0, B).is_granted());
        assert!(t.try_acquire(V0, A).is_granted());

        assert_eq!(t.release(V0, A), Release::Released { next_eligible: Some(B) });
        assert!(t.try_acquire(V0, B).is_granted());
    }
}

// ── Claim / withdraw ──────────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use super::*;

    #[test]
    fn claim_only_free_vertices() {
        let mut t = table();
        assert!(t.claim(V0, A));
        assert!(!t.claim(V0, B));
        assert_eq!(t.waiters(V0).count(), 0, "claim never queues");
    }

    #[test]
    fn withdraw_purges_queue_position() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);
        t.try_acquire(V0, C);
        assert_eq!(t.withdraw(B), None);
        assert_eq!(t.waiters(V0).collect::<Vec<_>>(), vec![C]);
        assert_eq!(t.queued_on(B), None);
    }

    #[test]
    fn withdraw_passes_promise_to_next_waiter() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);
        t.try_acquire(V0, C);
        t.release(V0, A);
        assert_eq!(t.withdraw(B), Some((V0, C)));
        assert_eq!(t.promised_to(V0), Some(C));
        assert!(t.try_acquire(V0, C).is_granted());
    }

    #[test]
    fn withdraw_last_promise_frees_vertex() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V0, B);
        t.release(V0, A);
        assert_eq!(t.withdraw(B), None);
        assert!(t.is_available(V0));
    }
}

// ── Rotation ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rotation {
    use super::*;

    #[test]
    fn two_cycle_swaps_holders() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, B);
        t.try_acquire(V1, A);
        t.try_acquire(V0, B);
        assert!(t.rotate(&[(A, V0, V1), (B, V1, V0)]));
        assert_eq!(t.holder(V0), Some(B));
        assert_eq!(t.holder(V1), Some(A));
        assert_eq!(t.queued_on(A), None);
        assert_eq!(t.queued_on(B), None);
        assert!(t.violations().is_empty());
    }

    #[test]
    fn open_chain_is_refused() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, B);
        // V2 is vacated by nobody.
        assert!(!t.rotate(&[(A, V0, V1), (B, V1, V2)]));
        assert_eq!(t.holder(V0), Some(A));
        assert_eq!(t.holder(V1), Some(B));
    }

    #[test]
    fn rotation_keeps_outside_waiters_queued() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, B);
        t.try_acquire(V1, A);
        t.try_acquire(V1, C);
        t.try_acquire(V0, B);
        assert!(t.rotate(&[(A, V0, V1), (B, V1, V0)]));
        assert_eq!(t.waiters(V1).collect::<Vec<_>>(), vec![C]);
        assert_eq!(t.try_acquire(V1, C), Acquire::Denied { holder: Some(A) });
    }

    #[test]
    fn rotation_never_jumps_a_queue() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, B);
        // C asked for V1 before A did.
        t.try_acquire(V1, C);
        t.try_acquire(V1, A);
        t.try_acquire(V0, B);
        assert!(!t.rotate(&[(A, V0, V1), (B, V1, V0)]));
        assert_eq!(t.holder(V0), Some(A));
        assert_eq!(t.holder(V1), Some(B));
        assert_eq!(t.waiters(V1).collect::<Vec<_>>(), vec![C, A]);
        assert_eq!(t.queued_on(B), Some(V0));

        // Once C gives up its place, A is the head and the swap goes through.
        t.withdraw(C);
        assert!(t.rotate(&[(A, V0, V1), (B, V1, V0)]));
        assert_eq!(t.holder(V1), Some(A));
        assert!(t.violations().is_empty());
    }
}

// ── Invariant audit ───────────────────────────────────────────────────────────

#[cfg(test)]
mod audit {
    use super::*;

    #[test]
    fn held_lists_in_vertex_order() {
        let mut t = table();
        t.try_acquire(V2, A);
        t.try_acquire(V0, B);
        assert_eq!(t.held().collect::<Vec<_>>(), vec![(V0, B), (V2, A)]);
    }

    #[test]
    fn double_hold_is_reported() {
        let mut t = table();
        t.try_acquire(V0, A);
        t.try_acquire(V1, A);
        assert_eq!(t.violations().len(), 1);
        t.release(V0, A);
        assert!(t.violations().is_empty());
    }
}
