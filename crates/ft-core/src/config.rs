//! Engine configuration.

use crate::{CoreError, CoreResult};

/// Top-level negotiation-engine configuration.
///
/// Typically built in code or deserialized from JSON by the host application
/// (enable the `serde` feature) and handed to `ft_sim::EngineBuilder`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Re-invoke the planner for a robot that has been denied this many
    /// consecutive ticks.  `None` disables wait-triggered re-planning: a
    /// waiting robot keeps retrying the same next vertex.
    pub replan_after_wait_ticks: Option<u64>,

    /// Break cycles of mutual waiting by rotating the robots in the cycle
    /// one vertex forward.  Without it a head-on meeting on a single lane
    /// never resolves.  A cycle is left alone while someone outside it is
    /// queued ahead of a member on the vertex that member needs.
    ///
    /// Rotating a two-robot cycle swaps the pair across the lane between
    /// them in a single tick, i.e. the robots pass each other head-on.
    /// Hosts whose lanes cannot physically hold two robots side by side
    /// should turn this off and break such meetings themselves.
    pub resolve_deadlocks: bool,

    /// Upper bound for `Engine::run`.
    pub total_ticks: u64,

    /// Master seed for host-side randomness (e.g. the demo task generator).
    /// The engine itself draws no random numbers.
    pub seed: u64,
}

impl EngineConfig {
    /// Reject settings the scheduler cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        if self.replan_after_wait_ticks == Some(0) {
            return Err(CoreError::Config(
                "replan_after_wait_ticks must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            replan_after_wait_ticks: None,
            resolve_deadlocks:       true,
            total_ticks:             1_000,
            seed:                    0,
        }
    }
}
