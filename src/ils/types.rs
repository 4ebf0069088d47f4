//! Run results.

use std::time::Duration;

use crate::instance::Time;
use crate::solution::Solution;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The (possibly extended) deadline passed.
    TimeBudget,
    /// `max_iterations` iterations were executed.
    IterationLimit,
    /// The best-known cycle time reached the early-stopping target.
    OptimalReached,
    /// Another restart was due but the restart cap was reached.
    RestartLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// One iteration of the search loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Kicks requested.
    pub strength: usize,
    /// Kicks actually applied.
    pub kicks: usize,
    /// Cycle time of the candidate after local search.
    pub candidate_cycle_time: Time,
    /// Whether the candidate became the working solution.
    pub accepted: bool,
    /// Whether the best-known cycle time strictly improved.
    pub improved: bool,
    /// Whether the iteration ended with a restart.
    pub restarted: bool,
    /// Working-solution cycle time at the end of the iteration.
    pub current_cycle_time: Time,
    /// Best-known cycle time at the end of the iteration.
    pub best_cycle_time: Time,
    /// Temperature used for the acceptance test.
    pub temperature: f64,
}

/// Result of an iterated local search run.
#[derive(Debug, Clone)]
pub struct IlsResult {
    /// Best feasible solution found.
    pub best: Solution,
    /// Cycle time of `best`.
    pub best_cycle_time: Time,
    /// Cycle time straight out of the construction heuristic.
    pub constructed_cycle_time: Time,
    /// Cycle time of the first local optimum (construction followed by VND).
    pub initial_cycle_time: Time,
    /// Iterations executed.
    pub iterations: usize,
    /// Restarts performed.
    pub restarts: usize,
    /// Candidates accepted as the working solution.
    pub accepted: usize,
    /// Candidates strictly better than the working solution they came from.
    pub improving: usize,
    /// Strict improvements of the best-known solution.
    pub new_bests: usize,
    /// Iteration at which the best-known was last strictly improved
    /// (None if the first local optimum was never beaten).
    pub best_iteration: Option<usize>,
    /// Temperature when the run ended.
    pub final_temperature: f64,
    /// Kick count when the run ended.
    pub final_strength: usize,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// Seed actually used.
    pub seed: u64,
    /// Best-known cycle time after each iteration.
    pub cost_history: Vec<Time>,
    /// Per-iteration records (empty unless tracing was enabled).
    pub trace: Vec<IterationRecord>,
}

impl IlsResult {
    /// Relative gap to a reference cycle time, in percent.
    pub fn gap_to(&self, reference: f64) -> f64 {
        if reference > 0.0 {
            (self.best_cycle_time as f64 - reference) / reference * 100.0
        } else {
            0.0
        }
    }

    /// Reduction of the cycle time relative to the first local optimum, in
    /// percent.
    pub fn improvement_percent(&self) -> f64 {
        if self.initial_cycle_time == 0 {
            return 0.0;
        }
        (self.initial_cycle_time - self.best_cycle_time) as f64 / self.initial_cycle_time as f64
            * 100.0
    }
}
