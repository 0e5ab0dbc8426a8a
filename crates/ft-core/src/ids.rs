//! Typed identifiers.
//!
//! Every id is a `u32` newtype.  Vertices and lanes index the nav graph's
//! dense arrays; agents index the robot store.  The wrappers keep the three
//! from being mixed up while costing nothing at run time.
//!
//! Ordering is part of the contract: the planner breaks ties on the lowest
//! `VertexId`, and the scheduler visits robots in ascending `AgentId`, which
//! is spawn order.

use std::fmt;

macro_rules! dense_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no such id", e.g. an unset predecessor slot.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning dense array.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Inverse of [`index`](Self::index).  The dense arrays these
            /// ids index never outgrow `u32`.
            #[inline(always)]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize, "{} index {i} out of range", stringify!($name));
                $name(i as u32)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

dense_id! {
    /// Robot identifier.  Assigned sequentially at spawn and never reused.
    AgentId
}

dense_id! {
    /// A navigation-graph vertex.
    VertexId
}

dense_id! {
    /// A directed lane: one slot of the nav graph's CSR lane arrays.
    LaneId
}
