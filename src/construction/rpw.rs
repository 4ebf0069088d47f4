//! Ranked Positional Weight construction.
//!
//! # Algorithm
//!
//! 1. Weight every task: representative duration plus the representative
//!    durations of all its transitive successors.
//! 2. For each candidate worker permutation:
//!    a. Release tasks in list-scheduling order: among tasks whose
//!       predecessors are placed, the heaviest (lowest id on ties) goes next.
//!    b. Place the task at a station no earlier than its latest predecessor,
//!       staffed by a capable worker, minimising the resulting load
//!       (lowest station on ties).
//!    c. If no station qualifies, try to exchange the workers of a
//!       qualifying-position station and any other station so that both
//!       stay performable and the task fits; otherwise drop the candidate.
//! 3. Keep the candidate with the smallest cycle time (first on ties).
//!
//! A restart instead takes the first feasible random permutation whose
//! staffing differs from the solution being replaced.
//!
//! # Reference
//!
//! Helgeson, W. B. & Birnie, D. P. (1961). "Assembly line balancing using
//! the ranked positional weight technique", *Journal of Industrial
//! Engineering* 12(6), 394-398.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::config::{ConstructionConfig, RepresentativeTime};
use crate::error::{AlwabpError, Result};
use crate::instance::{Instance, Time};
use crate::solution::Solution;

/// Builds feasible starting solutions for one instance.
///
/// Weights and the priority order are computed once in [`new`](Self::new);
/// every [`build`](Self::build) / [`rebuild`](Self::rebuild) call only
/// draws worker permutations from the caller's random stream.
#[derive(Debug, Clone)]
pub struct RpwConstructor<'a> {
    instance: &'a Instance,
    config: ConstructionConfig,
    weights: Vec<f64>,
    /// `rank[task]` = position in the priority order (0 = highest).
    rank: Vec<usize>,
    /// Tasks in priority order.
    order: Vec<usize>,
}

impl<'a> RpwConstructor<'a> {
    /// Computes positional weights and the priority order.
    pub fn new(instance: &'a Instance, config: ConstructionConfig) -> Self {
        let n = instance.num_tasks();
        let representative: Vec<f64> = (0..n)
            .map(|t| match config.representative_time {
                RepresentativeTime::Min => instance.min_time(t) as f64,
                RepresentativeTime::Mean => instance.mean_time(t),
            })
            .collect();

        let weights: Vec<f64> = (0..n)
            .map(|t| {
                representative[t]
                    + instance
                        .transitive_successors(t)
                        .iter()
                        .map(|&s| representative[s])
                        .sum::<f64>()
            })
            .collect();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

        let mut rank = vec![0; n];
        for (pos, &t) in order.iter().enumerate() {
            rank[t] = pos;
        }

        Self {
            instance,
            config,
            weights,
            rank,
            order,
        }
    }

    /// Positional weight per task.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Tasks sorted by descending weight, ties by id.
    pub fn priority_order(&self) -> &[usize] {
        &self.order
    }

    /// Workers sorted by the number of tasks they can perform (descending,
    /// ties by id), used as the deterministic first candidate.
    pub fn breadth_permutation(&self) -> Vec<usize> {
        let mut workers: Vec<usize> = (0..self.instance.num_workers()).collect();
        workers.sort_by_key(|&w| (Reverse(self.instance.worker_breadth(w)), w));
        workers
    }

    /// First construction of a run: the breadth permutation plus
    /// `candidate_permutations` random ones.
    ///
    /// # Errors
    /// - [`AlwabpError::InfeasibleInstance`] if no candidate admits a
    ///   feasible assignment.
    /// - [`AlwabpError::TimeBudgetExceededDuringConstruction`] if `deadline`
    ///   passes before any feasible candidate is found.
    pub fn build<R: Rng>(&self, rng: &mut R, deadline: Option<Instant>) -> Result<Solution> {
        self.best_of_candidates(rng, deadline, true)
    }

    /// Construction for a restart: a single fresh draw.
    ///
    /// Random permutations are drawn until one yields a feasible assignment
    /// whose staffing differs from `replaced` (the worker-of-station list of
    /// the solution being abandoned). At most `candidate_permutations`
    /// assignments are attempted; if none qualifies, falls back to
    /// [`build`](Self::build).
    ///
    /// # Errors
    /// As for [`build`](Self::build).
    pub fn rebuild<R: Rng>(
        &self,
        rng: &mut R,
        deadline: Option<Instant>,
        replaced: &[usize],
    ) -> Result<Solution> {
        let started = Instant::now();
        let k = self.instance.num_workers();
        let distinct = k > 1;
        let mut workers: Vec<usize> = (0..k).collect();
        let mut attempts = 0usize;

        while attempts < self.config.candidate_permutations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(AlwabpError::TimeBudgetExceededDuringConstruction {
                    elapsed: started.elapsed(),
                });
            }

            workers.shuffle(rng);
            if distinct && workers == replaced {
                continue;
            }
            attempts += 1;

            if let Some(candidate) = self.assign_tasks(&workers) {
                if distinct && candidate.worker_of_station() == replaced {
                    continue;
                }
                debug!(
                    attempts,
                    cycle_time = candidate.cycle_time(),
                    "rpw restart draw finished"
                );
                return Ok(candidate);
            }
        }

        self.best_of_candidates(rng, deadline, true)
    }

    fn best_of_candidates<R: Rng>(
        &self,
        rng: &mut R,
        deadline: Option<Instant>,
        include_breadth: bool,
    ) -> Result<Solution> {
        let started = Instant::now();
        let k = self.instance.num_workers();
        let mut best: Option<Solution> = None;
        let mut tried = 0usize;

        let random_count = self.config.candidate_permutations;
        let total = random_count + usize::from(include_breadth);

        for i in 0..total {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                if best.is_some() {
                    break;
                }
                return Err(AlwabpError::TimeBudgetExceededDuringConstruction {
                    elapsed: started.elapsed(),
                });
            }

            let permutation = if include_breadth && i == 0 {
                self.breadth_permutation()
            } else {
                let mut workers: Vec<usize> = (0..k).collect();
                workers.shuffle(rng);
                workers
            };
            tried += 1;

            if let Some(candidate) = self.assign_tasks(&permutation) {
                let better = best
                    .as_ref()
                    .is_none_or(|b| candidate.cycle_time() < b.cycle_time());
                if better {
                    best = Some(candidate);
                }
            }
        }

        match best {
            Some(solution) => {
                debug!(
                    candidates = tried,
                    cycle_time = solution.cycle_time(),
                    "rpw construction finished"
                );
                Ok(solution)
            }
            None => Err(AlwabpError::InfeasibleInstance(format!(
                "no capability-respecting assignment found for {tried} worker permutations"
            ))),
        }
    }

    /// Greedy task placement for a fixed worker permutation.
    ///
    /// The permutation may be altered by the repair step; the returned
    /// solution carries the final staffing. `None` if some task cannot be
    /// placed.
    pub fn assign_tasks(&self, worker_of_station: &[usize]) -> Option<Solution> {
        let instance = self.instance;
        let n = instance.num_tasks();
        let k = instance.num_workers();

        let mut workers = worker_of_station.to_vec();
        let mut station_of_task = vec![usize::MAX; n];
        let mut tasks_at: Vec<Vec<usize>> = vec![Vec::new(); k];
        let mut loads: Vec<Time> = vec![0; k];

        let mut pending: Vec<usize> = (0..n).map(|t| instance.predecessors(t).len()).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&t| pending[t] == 0)
            .map(|t| Reverse(self.rank[t]))
            .collect();

        while let Some(Reverse(r)) = ready.pop() {
            let task = self.order[r];
            let lower = instance
                .predecessors(task)
                .iter()
                .map(|&p| station_of_task[p])
                .max()
                .unwrap_or(0);

            let station = (lower..k)
                .filter_map(|s| instance.time(task, workers[s]).map(|t| (loads[s] + t, s)))
                .min()
                .map(|(_, s)| s)
                .or_else(|| self.repair(task, lower, &mut workers, &tasks_at, &mut loads))?;

            let duration = instance.time(task, workers[station])?;
            station_of_task[task] = station;
            tasks_at[station].push(task);
            loads[station] += duration;

            for &succ in instance.successors(task) {
                pending[succ] -= 1;
                if pending[succ] == 0 {
                    ready.push(Reverse(self.rank[succ]));
                }
            }
        }

        Some(Solution::from_parts(instance, workers, station_of_task))
    }

    /// Exchanges two stations' workers so that `task` fits at some station
    /// `>= lower`. Returns that station.
    fn repair(
        &self,
        task: usize,
        lower: usize,
        workers: &mut [usize],
        tasks_at: &[Vec<usize>],
        loads: &mut [Time],
    ) -> Option<usize> {
        let instance = self.instance;
        let k = workers.len();
        let performable = |tasks: &[usize], worker: usize| {
            tasks.iter().all(|&t| instance.can_perform(t, worker))
        };

        for s in lower..k {
            for other in (0..k).filter(|&o| o != s) {
                let (ws, wo) = (workers[s], workers[other]);
                if instance.can_perform(task, wo)
                    && performable(&tasks_at[s], wo)
                    && performable(&tasks_at[other], ws)
                {
                    workers.swap(s, other);
                    for station in [s, other] {
                        loads[station] = tasks_at[station]
                            .iter()
                            .filter_map(|&t| instance.time(t, workers[station]))
                            .sum();
                    }
                    return Some(s);
                }
            }
        }
        None
    }
}
