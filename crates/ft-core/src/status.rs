//! Robot status enum shared by the agent, scheduler, and output crates.

/// The lifecycle state of a single robot.
///
/// ```text
/// Unassigned ──assign──▶ TaskAssigned ──step──▶ Moving ◀──grant── Waiting
///     ▲                                           │  └──denied──▶ ──┘
///     └──── (failed assign) ─── TaskComplete ◀────┘ (destination reached)
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    /// No destination.  The robot idles on its vertex.
    #[default]
    Unassigned,
    /// A route was planned but the first step has not been taken yet.
    TaskAssigned,
    /// The last step succeeded.
    Moving,
    /// The next vertex was denied; the robot keeps its current vertex.
    Waiting,
    /// The robot stands on its destination.
    TaskComplete,
}

impl AgentStatus {
    /// `true` while the robot still has route to cover.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            AgentStatus::TaskAssigned | AgentStatus::Moving | AgentStatus::Waiting
        )
    }

    /// Human-readable label, used for CSV column values and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Unassigned   => "unassigned",
            AgentStatus::TaskAssigned => "task_assigned",
            AgentStatus::Moving       => "moving",
            AgentStatus::Waiting      => "waiting",
            AgentStatus::TaskComplete => "task_complete",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
