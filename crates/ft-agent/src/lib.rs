//! `ft-agent` — the per-robot state machine.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`robot`] | `Robot` — identity, position, route, status; `Step`        |
//! | [`store`] | `RobotStore` — robots in spawn order, removable slots      |
//!
//! # Decide, then apply
//!
//! A robot never touches the reservation table.  Each tick the scheduler
//! asks it what it wants to do ([`Robot::decide`], a pure function of the
//! robot's own fields) and then reports the outcome back through one of the
//! mutators:
//!
//! ```text
//!  decide() ──▶ Step::Advance { from, to } ──try_acquire──▶ Granted ──▶ advance_to(to)
//!                                                        └─▶ Denied  ──▶ block_on(to)
//!           ──▶ Step::Replan                  ──planner──▶ assign(route) / clear()
//!           ──▶ Step::Finish                  ──────────▶ finish()
//!           ──▶ Step::Idle
//! ```
//!
//! Keeping the decision pure means the robot can be inspected and tested
//! without a scheduler, and every table mutation goes through one owner.

pub mod robot;
pub mod store;


pub use robot::{Robot, Step};
pub use store::RobotStore;
