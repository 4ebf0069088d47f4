//! Best-improvement descent over the configured neighborhoods.
//!
//! # Algorithm
//!
//! 1. Set i = 0.
//! 2. While i < number of neighborhoods:
//!    a. Scan every legal move of neighborhood i and keep the one with the
//!       smallest resulting cycle time (first in canonical order on ties).
//!    b. If it strictly improves the cycle time, apply it and set i = 0;
//!       otherwise set i = i + 1.
//! 3. The solution is now a local optimum for every neighborhood.
//!
//! # Reference
//!
//! Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//! Principles and applications", *European Journal of Operational
//! Research* 130(3), 449-467.

use tracing::trace;

use super::config::VndConfig;
use super::neighborhood::{legal_steps, Neighborhood, Step};
use crate::instance::{Instance, Time};
use crate::solution::Solution;

/// Counters from one descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VndOutcome {
    /// Applied [`Neighborhood::TaskMove`] steps.
    pub task_moves: usize,
    /// Applied [`Neighborhood::TaskSwap`] steps.
    pub task_swaps: usize,
    /// Applied [`Neighborhood::WorkerSwap`] steps.
    pub worker_swaps: usize,
    /// Full neighborhood scans performed, including the final fruitless ones.
    pub scans: usize,
}

impl VndOutcome {
    /// Total number of improving steps applied.
    pub fn total_moves(&self) -> usize {
        self.task_moves + self.task_swaps + self.worker_swaps
    }

    /// Steps applied in one neighborhood.
    pub fn moves_in(&self, neighborhood: Neighborhood) -> usize {
        match neighborhood {
            Neighborhood::TaskMove => self.task_moves,
            Neighborhood::TaskSwap => self.task_swaps,
            Neighborhood::WorkerSwap => self.worker_swaps,
        }
    }

    fn record(&mut self, neighborhood: Neighborhood) {
        match neighborhood {
            Neighborhood::TaskMove => self.task_moves += 1,
            Neighborhood::TaskSwap => self.task_swaps += 1,
            Neighborhood::WorkerSwap => self.worker_swaps += 1,
        }
    }
}

enum Phase {
    Scan(usize),
    Done,
}

/// Variable Neighborhood Descent bound to one instance.
#[derive(Debug, Clone, Copy)]
pub struct Vnd<'a> {
    instance: &'a Instance,
    config: &'a VndConfig,
}

impl<'a> Vnd<'a> {
    pub fn new(instance: &'a Instance, config: &'a VndConfig) -> Self {
        Self { instance, config }
    }

    /// Descends from `solution` until no configured neighborhood contains
    /// a strictly improving move. Feasibility is preserved throughout.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_alwabp::instance::Instance;
    /// use u_alwabp::solution::Solution;
    /// use u_alwabp::vnd::{Vnd, VndConfig};
    ///
    /// let instance = Instance::new(
    ///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
    ///     vec![],
    /// ).unwrap();
    /// let mut sol = Solution::from_assignment(&instance, vec![0, 1], vec![0, 0, 0]).unwrap();
    /// let config = VndConfig::default();
    /// let outcome = Vnd::new(&instance, &config).descend(&mut sol);
    /// assert_eq!(sol.cycle_time(), 6);
    /// assert!(outcome.total_moves() >= 1);
    /// ```
    pub fn descend(&self, solution: &mut Solution) -> VndOutcome {
        let neighborhoods = &self.config.neighborhoods;
        let mut outcome = VndOutcome::default();
        let mut phase = Phase::Scan(0);

        loop {
            phase = match phase {
                Phase::Scan(i) if i >= neighborhoods.len() => Phase::Done,
                Phase::Scan(i) => {
                    outcome.scans += 1;
                    match self.best_step(solution, neighborhoods[i]) {
                        Some((step, cycle_time)) => {
                            trace!(
                                ?step,
                                from = solution.cycle_time(),
                                to = cycle_time,
                                "vnd step"
                            );
                            step.apply(self.instance, solution);
                            outcome.record(neighborhoods[i]);
                            Phase::Scan(0)
                        }
                        None => Phase::Scan(i + 1),
                    }
                }
                Phase::Done => break,
            };
        }

        outcome
    }

    /// The strictly improving move with the smallest resulting cycle time,
    /// first in canonical order on ties.
    fn best_step(&self, solution: &Solution, kind: Neighborhood) -> Option<(Step, Time)> {
        let current = solution.cycle_time();
        let mut best: Option<(Step, Time)> = None;
        for step in legal_steps(self.instance, solution, kind) {
            let Some(after) = step.cycle_time_after(self.instance, solution) else {
                continue;
            };
            if after < current && best.is_none_or(|(_, b)| after < b) {
                best = Some((step, after));
            }
        }
        best
    }
}
