//! Kick selection with kind fallback.

use rand::Rng;
use tracing::trace;

use super::config::PerturbationConfig;
use crate::instance::Instance;
use crate::solution::Solution;
use crate::vnd::legal_steps;

enum Kick {
    /// Trying the `n`-th kind in fallback order.
    Try(usize),
    Applied,
    Exhausted,
}

/// Applies random feasible kicks to a solution.
#[derive(Debug, Clone, Copy)]
pub struct Perturber<'a> {
    instance: &'a Instance,
    config: &'a PerturbationConfig,
}

impl<'a> Perturber<'a> {
    pub fn new(instance: &'a Instance, config: &'a PerturbationConfig) -> Self {
        Self { instance, config }
    }

    /// Applies up to `strength` kicks and returns how many were applied.
    ///
    /// Each kick draws a kind uniformly, then a uniformly random legal move
    /// of that kind. When the drawn kind has no legal move the remaining
    /// kinds are tried in configuration order. If no kind has one, the
    /// solution is left as is and the perturbation ends early.
    pub fn perturb<R: Rng>(&self, solution: &mut Solution, strength: usize, rng: &mut R) -> usize {
        let mut applied = 0;
        for _ in 0..strength {
            if !self.kick(solution, rng) {
                trace!(applied, strength, "no legal kick left");
                break;
            }
            applied += 1;
        }
        applied
    }

    fn kick<R: Rng>(&self, solution: &mut Solution, rng: &mut R) -> bool {
        let kinds = &self.config.kinds;
        if kinds.is_empty() {
            return false;
        }
        let drawn = rng.random_range(0..kinds.len());
        // attempt 0 is the drawn kind, then the others in list order
        let kind_at = |attempt: usize| match attempt {
            0 => drawn,
            a if a - 1 < drawn => a - 1,
            a => a,
        };

        let mut state = Kick::Try(0);
        loop {
            state = match state {
                Kick::Try(attempt) if attempt >= kinds.len() => Kick::Exhausted,
                Kick::Try(attempt) => {
                    let steps = legal_steps(self.instance, solution, kinds[kind_at(attempt)]);
                    if steps.is_empty() {
                        Kick::Try(attempt + 1)
                    } else {
                        let step = steps[rng.random_range(0..steps.len())];
                        if step.is_legal(self.instance, solution) {
                            step.apply(self.instance, solution);
                            Kick::Applied
                        } else {
                            Kick::Try(attempt + 1)
                        }
                    }
                }
                Kick::Applied => return true,
                Kick::Exhausted => return false,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::vnd::Neighborhood;

    fn free() -> Instance {
        Instance::new(
            vec![
                vec![Some(4), Some(6), Some(1)],
                vec![Some(5), Some(3), Some(2)],
                vec![Some(2), Some(8), Some(9)],
                vec![Some(7), Some(1), Some(3)],
                vec![Some(3), Some(3), Some(3)],
            ],
            vec![(0, 2), (1, 4)],
        )
        .unwrap()
    }

    #[test]
    fn test_kicks_preserve_feasibility() {
        let inst = free();
        let config = PerturbationConfig::default().with_worker_swap(true);
        let perturber = Perturber::new(&inst, &config);
        let mut rng = create_rng(7);
        let mut sol = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0, 1]).unwrap();

        for strength in 1..=6 {
            let applied = perturber.perturb(&mut sol, strength, &mut rng);
            assert_eq!(applied, strength);
            assert!(sol.is_feasible(&inst), "{:?}", sol.violations(&inst));
            assert_eq!(sol.cycle_time(), sol.recompute_cycle_time(&inst));
        }
    }

    #[test]
    fn test_no_legal_kick_is_noop() {
        let inst = Instance::new(vec![vec![Some(5)]], vec![]).unwrap();
        let config = PerturbationConfig::default().with_worker_swap(true);
        let mut sol = Solution::from_assignment(&inst, vec![0], vec![0]).unwrap();
        let before = sol.clone();

        let applied = Perturber::new(&inst, &config).perturb(&mut sol, 4, &mut create_rng(1));

        assert_eq!(applied, 0);
        assert_eq!(sol, before);
    }

    #[test]
    fn test_falls_back_to_other_kind() {
        // a single task admits no swap, only moves
        let inst = Instance::new(vec![vec![Some(2), Some(3)]], vec![]).unwrap();
        let config = PerturbationConfig::default()
            .with_kinds(vec![Neighborhood::TaskSwap, Neighborhood::TaskMove]);
        let mut sol = Solution::from_assignment(&inst, vec![0, 1], vec![0]).unwrap();

        let applied = Perturber::new(&inst, &config).perturb(&mut sol, 3, &mut create_rng(3));

        assert_eq!(applied, 3);
        assert_eq!(sol.station_of(0), 1);
        assert_eq!(sol.cycle_time(), 3);
    }

    #[test]
    fn test_same_seed_same_kicks() {
        let inst = free();
        let config = PerturbationConfig::default();
        let perturber = Perturber::new(&inst, &config);
        let start = Solution::from_assignment(&inst, vec![0, 1, 2], vec![0, 1, 2, 0, 1]).unwrap();

        let mut a = start.clone();
        let mut b = start;
        perturber.perturb(&mut a, 5, &mut create_rng(11));
        perturber.perturb(&mut b, 5, &mut create_rng(11));
        assert_eq!(a, b);
    }
}
