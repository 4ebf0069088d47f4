//! Assignment state with cached station loads.

use crate::error::{AlwabpError, Result};
use crate::instance::{Instance, Time};

/// The three heaviest stations, heaviest first (ties by lower index).
///
/// Excluding at most two stations from a max-load query therefore never
/// needs more than these three entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Peaks([Option<(Time, usize)>; 3]);

impl Peaks {
    fn from_loads(loads: &[Time]) -> Self {
        let mut peaks: [Option<(Time, usize)>; 3] = [None; 3];
        for (station, &load) in loads.iter().enumerate() {
            // the displaced entry keeps sinking; whatever falls off is dropped
            let mut carry = (load, station);
            for slot in peaks.iter_mut() {
                match slot {
                    None => {
                        *slot = Some(carry);
                        break;
                    }
                    Some(current) if carry.0 > current.0 => std::mem::swap(current, &mut carry),
                    Some(_) => {}
                }
            }
        }
        Peaks(peaks)
    }

    /// Largest load among stations other than `a` and `b`, 0 if none.
    pub(crate) fn max_excluding(&self, a: usize, b: usize) -> Time {
        self.0
            .iter()
            .flatten()
            .find(|&&(_, s)| s != a && s != b)
            .map_or(0, |&(load, _)| load)
    }

    fn top(&self) -> Option<(Time, usize)> {
        self.0[0]
    }
}

/// One station's contents, as exposed to callers that persist solutions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationAssignment {
    /// Station index (line position).
    pub station: usize,
    /// Worker staffing the station.
    pub worker: usize,
    /// `(task, duration)` pairs, ascending by task id.
    pub tasks: Vec<(usize, Time)>,
    /// Sum of the durations.
    pub load: Time,
}

/// A complete worker-to-station and task-to-station assignment.
///
/// The solution does not borrow its [`Instance`]; every operation that needs
/// processing times takes the instance as an argument. Per-station loads
/// and the heaviest stations are cached and kept current by the `apply_*`
/// mutations, so [`cycle_time`](Self::cycle_time) is O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub(crate) worker_of_station: Vec<usize>,
    pub(crate) station_of_task: Vec<usize>,
    pub(crate) tasks_of_station: Vec<Vec<usize>>,
    pub(crate) loads: Vec<Time>,
    pub(crate) peaks: Peaks,
}

impl Solution {
    /// Builds a solution from an explicit assignment.
    ///
    /// Checks that `worker_of_station` is a permutation of the workers,
    /// that every task has an in-range station and that every task is
    /// performable by its station's worker. Precedence is not enforced
    /// here; use [`is_feasible`](Self::is_feasible) for the full check.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_alwabp::instance::Instance;
    /// use u_alwabp::solution::Solution;
    ///
    /// let instance = Instance::new(
    ///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
    ///     vec![],
    /// ).unwrap();
    /// let sol = Solution::from_assignment(&instance, vec![0, 1], vec![0, 1, 0]).unwrap();
    /// assert_eq!(sol.cycle_time(), 6);
    /// assert!(sol.is_feasible(&instance));
    /// ```
    pub fn from_assignment(
        instance: &Instance,
        worker_of_station: Vec<usize>,
        station_of_task: Vec<usize>,
    ) -> Result<Self> {
        let k = instance.num_workers();
        let n = instance.num_tasks();

        if worker_of_station.len() != k {
            return Err(AlwabpError::InvalidSolution(format!(
                "{} stations staffed, instance has {k}",
                worker_of_station.len()
            )));
        }
        let mut seen = vec![false; k];
        for &w in &worker_of_station {
            if w >= k || std::mem::replace(&mut seen[w], true) {
                return Err(AlwabpError::InvalidSolution(format!(
                    "worker assignment {worker_of_station:?} is not a permutation"
                )));
            }
        }

        if station_of_task.len() != n {
            return Err(AlwabpError::InvalidSolution(format!(
                "{} tasks assigned, instance has {n}",
                station_of_task.len()
            )));
        }
        for (task, &s) in station_of_task.iter().enumerate() {
            if s >= k {
                return Err(AlwabpError::InvalidSolution(format!(
                    "task {task} assigned to unknown station {s}"
                )));
            }
            if !instance.can_perform(task, worker_of_station[s]) {
                return Err(AlwabpError::InvalidSolution(format!(
                    "worker {} cannot perform task {task}",
                    worker_of_station[s]
                )));
            }
        }

        Ok(Self::from_parts(instance, worker_of_station, station_of_task))
    }

    /// Builds the derived state. Callers guarantee capability.
    pub(crate) fn from_parts(
        instance: &Instance,
        worker_of_station: Vec<usize>,
        station_of_task: Vec<usize>,
    ) -> Self {
        let k = worker_of_station.len();
        let mut tasks_of_station = vec![Vec::new(); k];
        for (task, &s) in station_of_task.iter().enumerate() {
            tasks_of_station[s].push(task);
        }
        let mut sol = Self {
            worker_of_station,
            station_of_task,
            tasks_of_station,
            loads: vec![0; k],
            peaks: Peaks::default(),
        };
        for s in 0..k {
            sol.loads[s] = sol.compute_load(instance, s, sol.worker_of_station[s]);
        }
        sol.peaks = Peaks::from_loads(&sol.loads);
        sol
    }

    /// Number of stations.
    pub fn num_stations(&self) -> usize {
        self.worker_of_station.len()
    }

    /// Worker per station.
    pub fn worker_of_station(&self) -> &[usize] {
        &self.worker_of_station
    }

    /// Worker staffing `station`.
    pub fn worker_at(&self, station: usize) -> usize {
        self.worker_of_station[station]
    }

    /// Station per task.
    pub fn station_of_task(&self) -> &[usize] {
        &self.station_of_task
    }

    /// Station of `task`.
    pub fn station_of(&self, task: usize) -> usize {
        self.station_of_task[task]
    }

    /// Tasks at `station`, in insertion order.
    pub fn tasks_of_station(&self, station: usize) -> &[usize] {
        &self.tasks_of_station[station]
    }

    /// Cached load of `station`.
    pub fn station_load(&self, station: usize) -> Time {
        self.loads[station]
    }

    /// Cached loads of all stations.
    pub fn loads(&self) -> &[Time] {
        &self.loads
    }

    /// Cached cycle time (maximum station load).
    pub fn cycle_time(&self) -> Time {
        self.peaks.top().map_or(0, |(load, _)| load)
    }

    /// The heaviest station (lowest index among ties).
    pub fn bottleneck_station(&self) -> usize {
        self.peaks.top().map_or(0, |(_, s)| s)
    }

    /// Recomputes the cycle time from the assignment alone, ignoring every
    /// cache. Incapable pairs count as `Time::MAX`.
    pub fn recompute_cycle_time(&self, instance: &Instance) -> Time {
        (0..self.num_stations())
            .map(|s| {
                self.station_of_task
                    .iter()
                    .enumerate()
                    .filter(|&(_, &st)| st == s)
                    .map(|(task, _)| {
                        instance
                            .time(task, self.worker_of_station[s])
                            .unwrap_or(Time::MAX)
                    })
                    .fold(0, Time::saturating_add)
            })
            .max()
            .unwrap_or(0)
    }

    /// Per-station contents with task durations, tasks sorted by id.
    pub fn station_assignments(&self, instance: &Instance) -> Vec<StationAssignment> {
        (0..self.num_stations())
            .map(|s| {
                let worker = self.worker_of_station[s];
                let mut tasks: Vec<(usize, Time)> = self.tasks_of_station[s]
                    .iter()
                    .map(|&t| (t, instance.time(t, worker).unwrap_or(0)))
                    .collect();
                tasks.sort_unstable();
                StationAssignment {
                    station: s,
                    worker,
                    tasks,
                    load: self.loads[s],
                }
            })
            .collect()
    }

    /// Moves `task` to `target`. The move must be legal
    /// (see [`can_move`](Self::can_move)).
    pub fn apply_move(&mut self, instance: &Instance, task: usize, target: usize) {
        debug_assert!(self.can_move(instance, task, target), "illegal move");
        let from = self.station_of_task[task];
        let t_from = self.task_time(instance, task, from);
        let t_to = self.task_time(instance, task, target);

        let list = &mut self.tasks_of_station[from];
        if let Some(pos) = list.iter().position(|&t| t == task) {
            list.remove(pos);
        }
        self.tasks_of_station[target].push(task);
        self.station_of_task[task] = target;
        self.loads[from] -= t_from;
        self.loads[target] += t_to;
        self.peaks = Peaks::from_loads(&self.loads);
    }

    /// Exchanges the stations of tasks `a` and `b`. The swap must be legal
    /// (see [`can_swap`](Self::can_swap)).
    pub fn apply_swap(&mut self, instance: &Instance, a: usize, b: usize) {
        debug_assert!(self.can_swap(instance, a, b), "illegal swap");
        let sa = self.station_of_task[a];
        let sb = self.station_of_task[b];

        let new_a_load = self.loads[sa] - self.task_time(instance, a, sa) + self.task_time(instance, b, sa);
        let new_b_load = self.loads[sb] - self.task_time(instance, b, sb) + self.task_time(instance, a, sb);

        for slot in self.tasks_of_station[sa].iter_mut() {
            if *slot == a {
                *slot = b;
            }
        }
        for slot in self.tasks_of_station[sb].iter_mut() {
            if *slot == b {
                *slot = a;
            }
        }
        self.station_of_task[a] = sb;
        self.station_of_task[b] = sa;
        self.loads[sa] = new_a_load;
        self.loads[sb] = new_b_load;
        self.peaks = Peaks::from_loads(&self.loads);
    }

    /// Exchanges the workers of stations `s1` and `s2`. The swap must be
    /// legal (see [`can_swap_workers`](Self::can_swap_workers)).
    pub fn apply_worker_swap(&mut self, instance: &Instance, s1: usize, s2: usize) {
        debug_assert!(self.can_swap_workers(instance, s1, s2), "illegal worker swap");
        self.worker_of_station.swap(s1, s2);
        self.loads[s1] = self.compute_load(instance, s1, self.worker_of_station[s1]);
        self.loads[s2] = self.compute_load(instance, s2, self.worker_of_station[s2]);
        self.peaks = Peaks::from_loads(&self.loads);
    }

    /// Time of `task` under the worker of `station`; 0 if incapable.
    #[inline]
    pub(crate) fn task_time(&self, instance: &Instance, task: usize, station: usize) -> Time {
        instance
            .time(task, self.worker_of_station[station])
            .unwrap_or(0)
    }

    /// Load of `station`'s tasks if staffed by `worker`.
    fn compute_load(&self, instance: &Instance, station: usize, worker: usize) -> Time {
        self.tasks_of_station[station]
            .iter()
            .filter_map(|&t| instance.time(t, worker))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_two() -> Instance {
        Instance::new(
            vec![
                vec![Some(4), Some(6)],
                vec![Some(5), Some(3)],
                vec![Some(2), Some(8)],
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_peaks_order() {
        let peaks = Peaks::from_loads(&[3, 9, 9, 1, 7]);
        assert_eq!(peaks.0, [Some((9, 1)), Some((9, 2)), Some((7, 4))]);
        assert_eq!(peaks.max_excluding(1, 2), 7);
        assert_eq!(peaks.max_excluding(1, 4), 9);
        assert_eq!(peaks.max_excluding(0, 3), 9);
    }

    #[test]
    fn test_peaks_few_stations() {
        let peaks = Peaks::from_loads(&[5]);
        assert_eq!(peaks.0, [Some((5, 0)), None, None]);
        assert_eq!(peaks.max_excluding(0, 0), 0);

        let peaks = Peaks::from_loads(&[2, 8]);
        assert_eq!(peaks.max_excluding(1, 1), 2);
    }

    #[test]
    fn test_from_assignment_loads() {
        let inst = three_by_two();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 1, 0]).unwrap();
        assert_eq!(sol.loads(), &[6, 3]);
        assert_eq!(sol.cycle_time(), 6);
        assert_eq!(sol.bottleneck_station(), 0);
        assert_eq!(sol.tasks_of_station(0), &[0, 2]);
        assert_eq!(sol.recompute_cycle_time(&inst), 6);
    }

    #[test]
    fn test_from_assignment_rejects_bad_permutation() {
        let inst = three_by_two();
        assert!(matches!(
            Solution::from_assignment(&inst, vec![0, 0], vec![0, 0, 0]),
            Err(AlwabpError::InvalidSolution(_))
        ));
        assert!(matches!(
            Solution::from_assignment(&inst, vec![0], vec![0, 0, 0]),
            Err(AlwabpError::InvalidSolution(_))
        ));
    }

    #[test]
    fn test_from_assignment_rejects_bad_tasks() {
        let inst = three_by_two();
        assert!(Solution::from_assignment(&inst, vec![0, 1], vec![0, 2, 0]).is_err());
        assert!(Solution::from_assignment(&inst, vec![0, 1], vec![0, 1]).is_err());

        let partial = Instance::new(vec![vec![Some(1), None]], vec![]).unwrap();
        assert!(Solution::from_assignment(&partial, vec![1, 0], vec![0]).is_err());
        assert!(Solution::from_assignment(&partial, vec![0, 1], vec![0]).is_ok());
    }

    #[test]
    fn test_apply_move_updates_cache() {
        let inst = three_by_two();
        let mut sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0]).unwrap();
        assert_eq!(sol.cycle_time(), 11);

        sol.apply_move(&inst, 1, 1);
        assert_eq!(sol.loads(), &[6, 3]);
        assert_eq!(sol.station_of(1), 1);
        assert_eq!(sol.tasks_of_station(0), &[0, 2]);
        assert_eq!(sol.tasks_of_station(1), &[1]);
        assert_eq!(sol.cycle_time(), sol.recompute_cycle_time(&inst));
    }

    #[test]
    fn test_apply_swap_updates_cache() {
        let inst = three_by_two();
        let mut sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 1, 1]).unwrap();
        assert_eq!(sol.loads(), &[4, 11]);

        sol.apply_swap(&inst, 0, 2);
        assert_eq!(sol.station_of(0), 1);
        assert_eq!(sol.station_of(2), 0);
        assert_eq!(sol.loads(), &[2, 9]);
        assert_eq!(sol.tasks_of_station(0), &[2]);
        assert_eq!(sol.tasks_of_station(1), &[1, 0]);
        assert_eq!(sol.cycle_time(), sol.recompute_cycle_time(&inst));
    }

    #[test]
    fn test_apply_worker_swap_updates_cache() {
        let inst = three_by_two();
        let mut sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 1, 0]).unwrap();
        sol.apply_worker_swap(&inst, 0, 1);
        assert_eq!(sol.worker_of_station(), &[1, 0]);
        assert_eq!(sol.loads(), &[14, 5]);
        assert_eq!(sol.cycle_time(), 14);
        assert_eq!(sol.cycle_time(), sol.recompute_cycle_time(&inst));
    }

    #[test]
    fn test_station_assignments_sorted() {
        let inst = three_by_two();
        let mut sol = Solution::from_assignment(&inst, vec![1, 0], vec![1, 1, 0]).unwrap();
        sol.apply_move(&inst, 2, 1);
        let stations = sol.station_assignments(&inst);
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].worker, 1);
        assert!(stations[0].tasks.is_empty());
        assert_eq!(stations[1].worker, 0);
        assert_eq!(stations[1].tasks, vec![(0, 4), (1, 5), (2, 2)]);
        assert_eq!(stations[1].load, 11);
    }
}
