//! Move legality and incremental cycle-time evaluation.
//!
//! Each `cycle_time_after_*` query touches only the (at most two) affected
//! stations and takes the maximum against the cached heaviest loads of
//! the others. None of them mutate the solution.

use super::types::Solution;
use crate::instance::{Instance, Time};

impl Solution {
    /// Whether moving `task` to `target` keeps the solution feasible.
    ///
    /// Requires `target` to differ from the current station, the target
    /// worker to be capable, every predecessor to sit at a station
    /// `<= target` and every successor at a station `>= target`.
    pub fn can_move(&self, instance: &Instance, task: usize, target: usize) -> bool {
        target < self.num_stations()
            && target != self.station_of_task[task]
            && instance.can_perform(task, self.worker_of_station[target])
            && instance
                .predecessors(task)
                .iter()
                .all(|&p| self.station_of_task[p] <= target)
            && instance
                .successors(task)
                .iter()
                .all(|&s| self.station_of_task[s] >= target)
    }

    /// Whether exchanging the stations of tasks `a` and `b` keeps the
    /// solution feasible.
    ///
    /// Precedence is evaluated on the post-swap positions, so an edge
    /// between `a` and `b` themselves is handled correctly.
    pub fn can_swap(&self, instance: &Instance, a: usize, b: usize) -> bool {
        let sa = self.station_of_task[a];
        let sb = self.station_of_task[b];
        if a == b || sa == sb {
            return false;
        }
        if !instance.can_perform(a, self.worker_of_station[sb])
            || !instance.can_perform(b, self.worker_of_station[sa])
        {
            return false;
        }

        let station_after = |t: usize| -> usize {
            if t == a {
                sb
            } else if t == b {
                sa
            } else {
                self.station_of_task[t]
            }
        };
        [(a, sb), (b, sa)].iter().all(|&(task, at)| {
            instance
                .predecessors(task)
                .iter()
                .all(|&p| station_after(p) <= at)
                && instance
                    .successors(task)
                    .iter()
                    .all(|&s| station_after(s) >= at)
        })
    }

    /// Whether exchanging the workers of `s1` and `s2` keeps every task in
    /// both stations performable.
    pub fn can_swap_workers(&self, instance: &Instance, s1: usize, s2: usize) -> bool {
        if s1 == s2 || s1 >= self.num_stations() || s2 >= self.num_stations() {
            return false;
        }
        let w1 = self.worker_of_station[s1];
        let w2 = self.worker_of_station[s2];
        self.tasks_of_station[s1]
            .iter()
            .all(|&t| instance.can_perform(t, w2))
            && self.tasks_of_station[s2]
                .iter()
                .all(|&t| instance.can_perform(t, w1))
    }

    /// Cycle time after moving `task` to `target`, without mutating.
    ///
    /// Returns `None` if the target worker cannot perform the task.
    /// Precedence is not checked here.
    pub fn cycle_time_after_move(&self, instance: &Instance, task: usize, target: usize) -> Option<Time> {
        let from = self.station_of_task[task];
        if from == target {
            return Some(self.cycle_time());
        }
        let t_from = instance.time(task, self.worker_of_station[from])?;
        let t_to = instance.time(task, self.worker_of_station[target])?;

        let new_from = self.loads[from] - t_from;
        let new_to = self.loads[target] + t_to;
        Some(
            new_from
                .max(new_to)
                .max(self.peaks.max_excluding(from, target)),
        )
    }

    /// Cycle time after exchanging the stations of `a` and `b`, without
    /// mutating. `None` on a capability violation.
    pub fn cycle_time_after_swap(&self, instance: &Instance, a: usize, b: usize) -> Option<Time> {
        let sa = self.station_of_task[a];
        let sb = self.station_of_task[b];
        if sa == sb {
            return Some(self.cycle_time());
        }
        let wa = self.worker_of_station[sa];
        let wb = self.worker_of_station[sb];

        let new_a = self.loads[sa] - instance.time(a, wa)? + instance.time(b, wa)?;
        let new_b = self.loads[sb] - instance.time(b, wb)? + instance.time(a, wb)?;
        Some(new_a.max(new_b).max(self.peaks.max_excluding(sa, sb)))
    }

    /// Cycle time after exchanging the workers of `s1` and `s2`, without
    /// mutating. `None` on a capability violation.
    pub fn cycle_time_after_worker_swap(&self, instance: &Instance, s1: usize, s2: usize) -> Option<Time> {
        if s1 == s2 {
            return Some(self.cycle_time());
        }
        let w1 = self.worker_of_station[s1];
        let w2 = self.worker_of_station[s2];
        let load_under = |station: usize, worker: usize| -> Option<Time> {
            self.tasks_of_station[station]
                .iter()
                .map(|&t| instance.time(t, worker))
                .sum()
        };
        let new_1 = load_under(s1, w2)?;
        let new_2 = load_under(s2, w1)?;
        Some(new_1.max(new_2).max(self.peaks.max_excluding(s1, s2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain 0 -> 1 -> 2 -> 3; worker 1 cannot do task 2.
    fn chain() -> Instance {
        Instance::new(
            vec![
                vec![Some(3), Some(4)],
                vec![Some(2), Some(2)],
                vec![Some(5), None],
                vec![Some(4), Some(1)],
            ],
            vec![(0, 1), (1, 2), (2, 3)],
        )
        .unwrap()
    }

    fn free() -> Instance {
        Instance::new(
            vec![
                vec![Some(4), Some(6), Some(1)],
                vec![Some(5), Some(3), Some(2)],
                vec![Some(2), Some(8), Some(9)],
                vec![Some(7), Some(1), Some(3)],
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_can_move_precedence() {
        let inst = chain();
        // worker 0 at station 0, worker 1 at station 1
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0, 1]).unwrap();
        // task 3 may join its predecessor at station 0
        assert!(sol.can_move(&inst, 3, 0));
        // task 2 cannot go to station 1 (incapable worker)
        assert!(!sol.can_move(&inst, 2, 1));
        // task 1 to station 1 would precede task 2 at station 0
        assert!(!sol.can_move(&inst, 1, 1));
        // same station is not a move
        assert!(!sol.can_move(&inst, 0, 0));
    }

    #[test]
    fn test_can_swap_respects_capability() {
        let inst = chain();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0, 1]).unwrap();
        // swapping 2 and 3 would put task 2 at the incapable worker
        assert!(!sol.can_swap(&inst, 2, 3));
    }

    #[test]
    fn test_can_swap_between_related_tasks() {
        let inst = Instance::new(vec![vec![Some(1), Some(1)]; 2], vec![(0, 1)]).unwrap();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 1]).unwrap();
        // would place 0 after 1
        assert!(!sol.can_swap(&inst, 0, 1));
        assert!(!sol.can_swap(&inst, 1, 0));
    }

    #[test]
    fn test_can_swap_free() {
        let inst = free();
        let sol = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0]).unwrap();
        assert!(sol.can_swap(&inst, 0, 1));
        assert!(!sol.can_swap(&inst, 0, 3));
        assert!(!sol.can_swap(&inst, 1, 1));
    }

    #[test]
    fn test_can_swap_workers() {
        let inst = chain();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0, 1]).unwrap();
        // station 0 holds task 2, which worker 1 cannot do
        assert!(!sol.can_swap_workers(&inst, 0, 1));

        let sol = Solution::from_assignment(&inst, vec![1, 0], vec![0, 0, 1, 1]).unwrap();
        assert!(!sol.can_swap_workers(&inst, 0, 1));

        let inst = free();
        let sol = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0]).unwrap();
        assert!(sol.can_swap_workers(&inst, 0, 2));
        assert!(!sol.can_swap_workers(&inst, 1, 1));
        assert!(!sol.can_swap_workers(&inst, 1, 3));
    }

    #[test]
    fn test_deltas_match_applied_moves() {
        let inst = free();
        let base = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0]).unwrap();

        for task in 0..4 {
            for target in 0..3 {
                if !base.can_move(&inst, task, target) {
                    continue;
                }
                let predicted = base.cycle_time_after_move(&inst, task, target).unwrap();
                let mut moved = base.clone();
                moved.apply_move(&inst, task, target);
                assert_eq!(predicted, moved.recompute_cycle_time(&inst));
                assert_eq!(predicted, moved.cycle_time());
            }
        }

        for a in 0..4 {
            for b in (a + 1)..4 {
                if !base.can_swap(&inst, a, b) {
                    continue;
                }
                let predicted = base.cycle_time_after_swap(&inst, a, b).unwrap();
                let mut swapped = base.clone();
                swapped.apply_swap(&inst, a, b);
                assert_eq!(predicted, swapped.recompute_cycle_time(&inst));
            }
        }

        for s1 in 0..3 {
            for s2 in (s1 + 1)..3 {
                let predicted = base.cycle_time_after_worker_swap(&inst, s1, s2).unwrap();
                let mut swapped = base.clone();
                swapped.apply_worker_swap(&inst, s1, s2);
                assert_eq!(predicted, swapped.recompute_cycle_time(&inst));
            }
        }
    }

    #[test]
    fn test_delta_none_when_incapable() {
        let inst = chain();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0, 1]).unwrap();
        assert_eq!(sol.cycle_time_after_move(&inst, 2, 1), None);
        assert_eq!(sol.cycle_time_after_swap(&inst, 2, 3), None);
        assert_eq!(sol.cycle_time_after_worker_swap(&inst, 0, 1), None);
    }

    #[test]
    fn test_delta_same_station_is_identity() {
        let inst = free();
        let sol = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0]).unwrap();
        assert_eq!(sol.cycle_time_after_move(&inst, 0, 0), Some(sol.cycle_time()));
        assert_eq!(sol.cycle_time_after_swap(&inst, 0, 3), Some(sol.cycle_time()));
        assert_eq!(sol.cycle_time_after_worker_swap(&inst, 1, 1), Some(sol.cycle_time()));
    }
}
