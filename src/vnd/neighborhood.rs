//! Neighborhood kinds and concrete moves.

use crate::instance::{Instance, Time};
use crate::solution::Solution;

/// A family of single-step modifications of a solution.
///
/// The same kinds drive both the local search and the perturbation kicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Move one task to another station.
    TaskMove,
    /// Exchange the stations of two tasks.
    TaskSwap,
    /// Exchange the workers of two stations.
    WorkerSwap,
}

impl Neighborhood {
    /// All kinds, in scan order.
    pub const ALL: [Neighborhood; 3] = [
        Neighborhood::TaskMove,
        Neighborhood::TaskSwap,
        Neighborhood::WorkerSwap,
    ];
}

/// One concrete move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Move { task: usize, target: usize },
    Swap { a: usize, b: usize },
    Workers { s1: usize, s2: usize },
}

impl Step {
    pub(crate) fn neighborhood(&self) -> Neighborhood {
        match self {
            Step::Move { .. } => Neighborhood::TaskMove,
            Step::Swap { .. } => Neighborhood::TaskSwap,
            Step::Workers { .. } => Neighborhood::WorkerSwap,
        }
    }

    pub(crate) fn is_legal(&self, instance: &Instance, sol: &Solution) -> bool {
        match *self {
            Step::Move { task, target } => sol.can_move(instance, task, target),
            Step::Swap { a, b } => sol.can_swap(instance, a, b),
            Step::Workers { s1, s2 } => sol.can_swap_workers(instance, s1, s2),
        }
    }

    pub(crate) fn cycle_time_after(&self, instance: &Instance, sol: &Solution) -> Option<Time> {
        match *self {
            Step::Move { task, target } => sol.cycle_time_after_move(instance, task, target),
            Step::Swap { a, b } => sol.cycle_time_after_swap(instance, a, b),
            Step::Workers { s1, s2 } => sol.cycle_time_after_worker_swap(instance, s1, s2),
        }
    }

    pub(crate) fn apply(&self, instance: &Instance, sol: &mut Solution) {
        match *self {
            Step::Move { task, target } => sol.apply_move(instance, task, target),
            Step::Swap { a, b } => sol.apply_swap(instance, a, b),
            Step::Workers { s1, s2 } => sol.apply_worker_swap(instance, s1, s2),
        }
    }
}

/// Every legal move of `kind`, in canonical order: by task then target
/// station for moves, by `(a, b)` with `a < b` for swaps, by `(s1, s2)`
/// with `s1 < s2` for worker swaps.
pub(crate) fn legal_steps(instance: &Instance, sol: &Solution, kind: Neighborhood) -> Vec<Step> {
    let n = instance.num_tasks();
    let k = sol.num_stations();
    match kind {
        Neighborhood::TaskMove => (0..n)
            .flat_map(|task| (0..k).map(move |target| Step::Move { task, target }))
            .filter(|step| step.is_legal(instance, sol))
            .collect(),
        Neighborhood::TaskSwap => (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| Step::Swap { a, b }))
            .filter(|step| step.is_legal(instance, sol))
            .collect(),
        Neighborhood::WorkerSwap => (0..k)
            .flat_map(|s1| ((s1 + 1)..k).map(move |s2| Step::Workers { s1, s2 }))
            .filter(|step| step.is_legal(instance, sol))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_legal_moves_on_chain() {
        let inst = chain();
        let sol = Solution::from_assignment(&inst, vec![0, 1], vec![0, 0, 0, 1]).unwrap();
        // only task 2 -> 1 (incapable) and 3 -> 0 are candidates; 1 and 0
        // are pinned by their successors at station 0
        assert_eq!(
            legal_steps(&inst, &sol, Neighborhood::TaskMove),
            vec![Step::Move { task: 3, target: 0 }]
        );
        assert!(legal_steps(&inst, &sol, Neighborhood::TaskSwap).is_empty());
        assert!(legal_steps(&inst, &sol, Neighborhood::WorkerSwap).is_empty());
    }

    #[test]
    fn test_steps_keep_feasibility() {
        let inst = Instance::new(
            vec![
                vec![Some(4), Some(6), Some(1)],
                vec![Some(5), Some(3), Some(2)],
                vec![Some(2), Some(8), Some(9)],
                vec![Some(7), Some(1), Some(3)],
            ],
            vec![(0, 3)],
        )
        .unwrap();
        let base = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 1]).unwrap();
        for kind in Neighborhood::ALL {
            for step in legal_steps(&inst, &base, kind) {
                assert_eq!(step.neighborhood(), kind);
                let predicted = step.cycle_time_after(&inst, &base).unwrap();
                let mut sol = base.clone();
                step.apply(&inst, &mut sol);
                assert!(sol.is_feasible(&inst), "{step:?}: {:?}", sol.violations(&inst));
                assert_eq!(predicted, sol.cycle_time());
            }
        }
    }
}
