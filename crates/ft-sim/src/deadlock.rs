//! Wait-for cycle detection.
//!
//! A waiting robot waits for exactly one other robot: the holder of the
//! vertex it was denied.  The wait-for relation is therefore a functional
//! graph (out-degree ≤ 1), and each weakly connected component contains at
//! most one cycle.  A single colouring walk per start vertex finds them all
//! in O(n).

use std::collections::BTreeMap;

use ft_core::AgentId;

/// Every cycle of the wait-for relation `edges` (`waiter → holder`).
///
/// Each cycle starts at its lowest id and follows the wait direction; the
/// cycles are sorted by that first member.  Agents that wait on a cycle
/// without being part of it are not reported.
pub fn find_cycles(edges: &[(AgentId, AgentId)]) -> Vec<Vec<AgentId>> {
    let next: BTreeMap<AgentId, AgentId> = edges.iter().copied().collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Mark { OnPath, Done }
    let mut marks: BTreeMap<AgentId, Mark> = BTreeMap::new();
    let mut cycles = Vec::new();

    for &start in next.keys() {
        if marks.contains_key(&start) {
            continue;
        }
        let mut path = Vec::new();
        let mut cur = start;
        loop {
            match marks.get(&cur) {
                Some(Mark::OnPath) => {
                    // `cur` closes a cycle; path[pos..] is it.
                    if let Some(pos) = path.iter().position(|&a| a == cur) {
                        cycles.push(normalize(&path[pos..]));
                    }
                    break;
                }
                Some(Mark::Done) => break,
                None => {}
            }
            marks.insert(cur, Mark::OnPath);
            path.push(cur);
            match next.get(&cur) {
                Some(&n) => cur = n,
                None     => break,
            }
        }
        for a in path {
            marks.insert(a, Mark::Done);
        }
    }

    cycles.sort_unstable_by_key(|c| c[0]);
    cycles
}

/// Rotate `cycle` so that its lowest id comes first.
fn normalize(cycle: &[AgentId]) -> Vec<AgentId> {
    let min = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, a)| a)
        .map_or(0, |(i, _)| i);
    cycle[min..].iter().chain(&cycle[..min]).copied().collect()
}
