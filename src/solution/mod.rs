//! Solutions and their evaluation.
//!
//! A [`Solution`] maps workers onto stations (a permutation) and tasks onto
//! stations (a total function). It caches per-station loads so that the
//! local search can price a candidate move by recomputing only the two
//! stations it touches:
//!
//! - [`Solution::cycle_time`]: cached maximum station load
//! - [`Solution::recompute_cycle_time`]: full recomputation, O(n)
//! - [`Solution::cycle_time_after_move`], [`Solution::cycle_time_after_swap`],
//!   [`Solution::cycle_time_after_worker_swap`]: non-mutating deltas
//! - [`Solution::apply_move`], [`Solution::apply_swap`],
//!   [`Solution::apply_worker_swap`]: mutations keeping the caches current
//! - [`Solution::violations`] / [`Solution::is_feasible`]: invariant check

mod eval;
mod feasibility;
mod types;

pub use feasibility::Violation;
pub use types::{Solution, StationAssignment};
