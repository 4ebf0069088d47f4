//! Independent feasibility check.
//!
//! Re-derives everything from the raw assignment rather than trusting the
//! cached loads or station lists, so it doubles as a consistency check for
//! the incremental bookkeeping.

use super::types::Solution;
use crate::instance::{Instance, Time};

/// A broken solution invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The number of staffed stations differs from the worker count.
    StationCount {
        /// Expected station count.
        expected: usize,
        /// Actual station count.
        found: usize,
    },
    /// A worker is missing, duplicated or out of range.
    NotPermutation {
        /// The offending worker id.
        worker: usize,
    },
    /// The task count differs from the instance.
    TaskCount {
        /// Expected task count.
        expected: usize,
        /// Actual task count.
        found: usize,
    },
    /// A task is assigned to a station that does not exist.
    UnknownStation {
        /// The task.
        task: usize,
        /// Its station.
        station: usize,
    },
    /// A task is missing from, or duplicated in, the station task lists.
    StationListMismatch {
        /// The task.
        task: usize,
    },
    /// A precedence edge is reversed.
    Precedence {
        /// Task that must come first.
        before: usize,
        /// Task that must come later.
        after: usize,
    },
    /// A task is assigned to a worker who cannot perform it.
    Incapable {
        /// The task.
        task: usize,
        /// The worker.
        worker: usize,
    },
    /// A cached station load disagrees with the recomputed one.
    StaleLoad {
        /// The station.
        station: usize,
        /// Cached value.
        cached: Time,
        /// Recomputed value.
        actual: Time,
    },
}

impl Solution {
    /// Lists every broken invariant. Empty for a feasible solution.
    pub fn violations(&self, instance: &Instance) -> Vec<Violation> {
        let k = instance.num_workers();
        let n = instance.num_tasks();
        let mut found = Vec::new();

        // 1. bijection
        if self.worker_of_station.len() != k {
            found.push(Violation::StationCount {
                expected: k,
                found: self.worker_of_station.len(),
            });
            return found;
        }
        let mut staffed = vec![0usize; k];
        for &w in &self.worker_of_station {
            if w >= k {
                found.push(Violation::NotPermutation { worker: w });
            } else {
                staffed[w] += 1;
            }
        }
        for (worker, &count) in staffed.iter().enumerate() {
            if count != 1 {
                found.push(Violation::NotPermutation { worker });
            }
        }

        // 2. total assignment
        if self.station_of_task.len() != n {
            found.push(Violation::TaskCount {
                expected: n,
                found: self.station_of_task.len(),
            });
            return found;
        }
        let mut listed = vec![0usize; n];
        for (s, tasks) in self.tasks_of_station.iter().enumerate() {
            for &t in tasks {
                if t < n && self.station_of_task[t] == s {
                    listed[t] += 1;
                } else if t < n {
                    found.push(Violation::StationListMismatch { task: t });
                }
            }
        }
        for (task, &s) in self.station_of_task.iter().enumerate() {
            if s >= k {
                found.push(Violation::UnknownStation { task, station: s });
            } else if listed[task] != 1 {
                found.push(Violation::StationListMismatch { task });
            }
        }
        if !found.is_empty() {
            return found;
        }

        // 3. precedence
        for &(before, after) in instance.precedences() {
            if self.station_of_task[before] > self.station_of_task[after] {
                found.push(Violation::Precedence { before, after });
            }
        }

        // 4. capability, plus cache consistency
        let mut actual = vec![0 as Time; k];
        for (task, &s) in self.station_of_task.iter().enumerate() {
            let worker = self.worker_of_station[s];
            match instance.time(task, worker) {
                Some(t) => actual[s] += t,
                None => found.push(Violation::Incapable { task, worker }),
            }
        }
        for (station, (&cached, &actual)) in self.loads.iter().zip(&actual).enumerate() {
            if cached != actual {
                found.push(Violation::StaleLoad {
                    station,
                    cached,
                    actual,
                });
            }
        }

        found
    }

    /// Whether all four solution invariants hold (bijective staffing,
    /// total task assignment, precedence, capability).
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.violations(instance).is_empty()
    }
}
