//! Adaptive iterated local search execution engine.
//!
//! # Algorithm
//!
//! 1. Construct x (RPW), descend with VND, set best = x, T = T0.
//! 2. Until a stop condition holds:
//!    a. **Perturb**: apply `strength` random kicks to a copy x' of x.
//!    b. **Local search**: descend x' with VND.
//!    c. **Accept**: x = x' if C(x') <= C(x), or with probability
//!       `exp(-(C(x') - C(x)) / T)` otherwise.
//!    d. **Best**: replace best if x' is better.
//!    e. **Adapt**: raise the strength every `improvement_threshold`
//!       non-improving iterations, restart from a fresh construction after
//!       `stagnation_threshold` of them, reset both on a new best.
//!    f. **Cool**: T = T * cooling_rate.
//!
//! # References
//!
//! - Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated local
//!   search", *Handbook of Metaheuristics*, 320-353.
//! - Miralles, C., García-Sabater, J. P., Andrés, C. & Cardós, M. (2007).
//!   "Advantages of assembly lines in sheltered work centres for disabled",
//!   *International Journal of Production Economics* 110(1-2), 187-197.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::config::IlsConfig;
use super::types::{IlsResult, IterationRecord, StopReason};
use crate::construction::RpwConstructor;
use crate::error::{AlwabpError, Result};
use crate::instance::Instance;
use crate::perturbation::Perturber;
use crate::random::rng_from_option;
use crate::sa::Annealer;
use crate::solution::Solution;
use crate::vnd::Vnd;

/// Upper bound on the initial cost history reservation.
const HISTORY_CHUNK: usize = 1024;

/// `budget * factor`, saturating at [`Duration::MAX`].
fn scaled(budget: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(budget.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// Iterated local search runner.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs the search until a stop condition holds.
    ///
    /// # Errors
    /// - [`AlwabpError::InvalidParameter`] if `config` does not validate.
    /// - [`AlwabpError::InfeasibleInstance`] if no feasible start exists.
    /// - [`AlwabpError::TimeBudgetExceededDuringConstruction`] if the budget
    ///   runs out before the first solution is built.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use u_alwabp::ils::{IlsConfig, IlsRunner};
    /// use u_alwabp::instance::Instance;
    ///
    /// let instance = Instance::new(
    ///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
    ///     vec![],
    /// ).unwrap();
    /// let config = IlsConfig::default()
    ///     .with_time_budget(Duration::from_secs(1))
    ///     .with_max_iterations(50)
    ///     .with_seed(42);
    /// let result = IlsRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best_cycle_time, 6);
    /// assert!(result.best.is_feasible(&instance));
    /// ```
    pub fn run(instance: &Instance, config: &IlsConfig) -> Result<IlsResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs the search with an optional cancellation token, checked once
    /// per iteration.
    pub fn run_with_cancel(
        instance: &Instance,
        config: &IlsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<IlsResult> {
        config.validate()?;

        let started = Instant::now();
        let (mut rng, seed) = rng_from_option(config.seed);
        let budget = config.time_budget;
        // `None` when the budget lies beyond what `Instant` can represent
        let mut deadline = started.checked_add(budget);
        let hard_deadline = if config.adaptive_timeout {
            started.checked_add(scaled(budget, config.timeout_hard_cap))
        } else {
            deadline
        };
        let window = scaled(budget, config.timeout_window);
        let extension = scaled(budget, config.timeout_extension);
        let target = config.early_stop_target();

        info!(
            tasks = instance.num_tasks(),
            workers = instance.num_workers(),
            seed,
            budget_ms = budget.as_millis() as u64,
            "ils run started"
        );

        let constructor = RpwConstructor::new(instance, config.construction.clone());
        let vnd = Vnd::new(instance, &config.vnd);
        let perturber = Perturber::new(instance, &config.perturbation);

        // Initialize with local search
        let mut current = constructor.build(&mut rng, deadline)?;
        let constructed_cycle_time = current.cycle_time();
        vnd.descend(&mut current);
        let initial_cycle_time = current.cycle_time();
        let mut best = current.clone();
        let mut last_improvement = Instant::now();

        let mut annealer = Annealer::new(config.annealing, initial_cycle_time);
        let mut strength = config.perturbation_initial;
        let mut since_improvement = 0usize;
        let mut since_escalation = 0usize;

        let mut iteration = 0usize;
        let mut restarts = 0usize;
        let mut accepted = 0usize;
        let mut improving = 0usize;
        let mut new_bests = 0usize;
        let mut best_iteration = None;
        let mut pending_stop: Option<StopReason> = None;

        let history_capacity = match config.max_iterations {
            0 => HISTORY_CHUNK,
            cap => cap.min(HISTORY_CHUNK),
        };
        let mut cost_history = Vec::with_capacity(history_capacity);
        let mut trace = Vec::new();

        debug!(
            constructed = constructed_cycle_time,
            initial = initial_cycle_time,
            temperature = annealer.temperature(),
            "initial local optimum"
        );

        let stop_reason = loop {
            // 1. stop conditions
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break StopReason::Cancelled;
            }
            if let Some(reason) = pending_stop {
                break reason;
            }
            let now = Instant::now();
            if let Some(limit) = deadline.filter(|&d| now >= d) {
                let recent = now.duration_since(last_improvement) <= window;
                let extendable = config.adaptive_timeout && recent;
                if extendable && hard_deadline.is_none_or(|h| limit < h) {
                    deadline = match (limit.checked_add(extension), hard_deadline) {
                        (Some(d), Some(hard)) => Some(d.min(hard)),
                        (extended, None) => extended,
                        (None, hard) => hard,
                    };
                    debug!(
                        deadline_ms = deadline.map(|d| d.duration_since(started).as_millis() as u64),
                        "deadline extended"
                    );
                }
                if deadline.is_some_and(|d| now >= d) {
                    break StopReason::TimeBudget;
                }
            }
            if config.max_iterations > 0 && iteration >= config.max_iterations {
                break StopReason::IterationLimit;
            }
            if target.is_some_and(|t| best.cycle_time() as f64 <= t) {
                break StopReason::OptimalReached;
            }

            // 2. perturb + local search
            let used_strength = strength;
            let mut candidate = current.clone();
            let kicks = perturber.perturb(&mut candidate, strength, &mut rng);
            vnd.descend(&mut candidate);
            let candidate_cycle_time = candidate.cycle_time();
            let temperature = annealer.temperature();

            // 3. acceptance
            let is_accepted = annealer.accept(current.cycle_time(), candidate_cycle_time, &mut rng);
            if candidate_cycle_time < current.cycle_time() {
                improving += 1;
            }

            // 4. best-known
            let improved = candidate_cycle_time < best.cycle_time();
            if config
                .best_replacement
                .replaces(best.cycle_time(), candidate_cycle_time)
            {
                best = candidate.clone();
            }
            if is_accepted {
                current = candidate;
                accepted += 1;
            }

            // 5. adaptation
            let mut restarted = false;
            if improved {
                info!(iteration, cycle_time = best.cycle_time(), "new best");
                new_bests += 1;
                best_iteration = Some(iteration);
                last_improvement = Instant::now();
                strength = config.perturbation_initial;
                since_improvement = 0;
                since_escalation = 0;
            } else {
                since_improvement += 1;
                since_escalation += 1;

                if since_escalation >= config.improvement_threshold {
                    if strength < config.perturbation_max {
                        strength += 1;
                        debug!(iteration, strength, "perturbation strength raised");
                    }
                    since_escalation = 0;
                }

                if since_improvement >= config.stagnation_threshold {
                    if config.max_restarts.is_some_and(|cap| restarts >= cap) {
                        pending_stop = Some(StopReason::RestartLimit);
                    } else {
                        match Self::restart(&constructor, &vnd, &mut rng, deadline, &current) {
                            Ok(fresh) => {
                                restarts += 1;
                                restarted = true;
                                info!(
                                    iteration,
                                    restarts,
                                    cycle_time = fresh.cycle_time(),
                                    "restart"
                                );
                                if fresh.cycle_time() < best.cycle_time() {
                                    best = fresh.clone();
                                    new_bests += 1;
                                    best_iteration = Some(iteration);
                                    last_improvement = Instant::now();
                                }
                                current = fresh;
                                annealer.reset();
                                strength = config.perturbation_initial;
                                since_improvement = 0;
                                since_escalation = 0;
                            }
                            Err(AlwabpError::TimeBudgetExceededDuringConstruction { .. }) => {
                                pending_stop = Some(StopReason::TimeBudget);
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
            }

            // 6. cool
            annealer.cool();
            cost_history.push(best.cycle_time());
            if config.record_trace {
                trace.push(IterationRecord {
                    iteration,
                    strength: used_strength,
                    kicks,
                    candidate_cycle_time,
                    accepted: is_accepted,
                    improved,
                    restarted,
                    current_cycle_time: current.cycle_time(),
                    best_cycle_time: best.cycle_time(),
                    temperature,
                });
            }
            iteration += 1;
        };

        let elapsed = started.elapsed();
        info!(
            iterations = iteration,
            restarts,
            best = best.cycle_time(),
            elapsed_ms = elapsed.as_millis() as u64,
            reason = ?stop_reason,
            "ils run finished"
        );

        Ok(IlsResult {
            best_cycle_time: best.cycle_time(),
            best,
            constructed_cycle_time,
            initial_cycle_time,
            iterations: iteration,
            restarts,
            accepted,
            improving,
            new_bests,
            best_iteration,
            final_temperature: annealer.temperature(),
            final_strength: strength,
            elapsed,
            stop_reason,
            seed,
            cost_history,
            trace,
        })
    }

    /// A fresh construction followed by local search.
    fn restart<R: rand::Rng>(
        constructor: &RpwConstructor<'_>,
        vnd: &Vnd<'_>,
        rng: &mut R,
        deadline: Option<Instant>,
        replaced: &Solution,
    ) -> Result<Solution> {
        let mut fresh = constructor.rebuild(rng, deadline, replaced.worker_of_station())?;
        vnd.descend(&mut fresh);
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use rand::Rng;

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

    fn random_instance(seed: u64, n: usize, k: usize) -> Instance {
        let mut rng = create_rng(seed);
        let times = (0..n)
            .map(|_| (0..k).map(|_| Some(rng.random_range(1..=30))).collect())
            .collect();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.random_bool(0.1) {
                    edges.push((i, j));
                }
            }
        }
        Instance::new(times, edges).unwrap()
    }

    fn quick() -> IlsConfig {
        IlsConfig::default()
            .with_time_budget(Duration::from_secs(60))
            .with_max_iterations(200)
            .with_seed(42)
    }

    #[test]
    fn test_three_by_two_optimum_stops_early() {
        let inst = three_by_two();
        let config = quick().with_known_optimal(6.0);
        let result = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(result.best_cycle_time, 6);
        assert_eq!(result.stop_reason, StopReason::OptimalReached);
        // the first local optimum is already optimal
        assert_eq!(result.iterations, 0);
        assert!(result.cost_history.is_empty());
    }

    #[test]
    fn test_chain_respects_capability() {
        let inst = chain();
        let result = IlsRunner::run(&inst, &quick().with_max_iterations(50)).unwrap();
        assert!(result.best.is_feasible(&inst));
        assert_eq!(result.best.worker_at(result.best.station_of(2)), 0);
        assert_eq!(result.best_cycle_time, result.best.recompute_cycle_time(&inst));
    }

    #[test]
    fn test_same_seed_same_run() {
        let inst = random_instance(3, 15, 4);
        let config = quick().with_max_iterations(80).with_trace(true);

        let a = IlsRunner::run(&inst, &config).unwrap();
        let b = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(a.trace, b.trace);
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_history_non_increasing_and_feasible() {
        let inst = random_instance(8, 20, 5);
        let result = IlsRunner::run(&inst, &quick()).unwrap();

        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        assert_eq!(result.iterations, 200);
        assert_eq!(result.cost_history.len(), 200);
        assert!(result.cost_history.windows(2).all(|w| w[1] <= w[0]));
        assert!(result.best_cycle_time <= result.initial_cycle_time);
        assert!(result.initial_cycle_time <= result.constructed_cycle_time);
        assert_eq!(result.cost_history.last(), Some(&result.best_cycle_time));
        assert!(result.best.is_feasible(&inst));
        assert!(result.trace.is_empty());
    }

    #[test]
    fn test_stagnation_threshold_one_restarts_every_iteration() {
        let inst = three_by_two();
        let config = quick()
            .with_max_iterations(20)
            .with_stagnation_threshold(1)
            .with_trace(true);
        let result = IlsRunner::run(&inst, &config).unwrap();

        // 6 is optimal, so no iteration improves and every one restarts
        assert_eq!(result.restarts, 20);
        assert!(result.trace.iter().all(|r| r.restarted && !r.improved));
        assert!(result.trace.iter().all(|r| r.best_cycle_time == 6));
        assert_eq!(result.final_strength, config.perturbation_initial);
    }

    #[test]
    fn test_restart_draws_new_working_solution() {
        // identical workers: VND never swaps them, so staffing shows the draw
        let inst = Instance::new(
            vec![
                vec![Some(3), Some(3), Some(3)],
                vec![Some(4), Some(4), Some(4)],
                vec![Some(2), Some(2), Some(2)],
                vec![Some(5), Some(5), Some(5)],
                vec![Some(1), Some(1), Some(1)],
            ],
            vec![(0, 2), (1, 3)],
        )
        .unwrap();
        let config = quick();
        let constructor = RpwConstructor::new(&inst, config.construction.clone());
        let vnd = Vnd::new(&inst, &config.vnd);
        let mut rng = create_rng(42);

        let mut current = constructor.build(&mut rng, None).unwrap();
        vnd.descend(&mut current);
        for _ in 0..20 {
            let fresh = IlsRunner::restart(&constructor, &vnd, &mut rng, None, &current).unwrap();
            assert!(fresh.is_feasible(&inst));
            assert_ne!(fresh, current);
            assert_ne!(fresh.worker_of_station(), current.worker_of_station());
            current = fresh;
        }
    }

    #[test]
    fn test_unbounded_time_budget() {
        let inst = three_by_two();
        let config = IlsConfig::default()
            .with_time_budget(Duration::MAX)
            .with_max_iterations(5)
            .with_seed(42);
        let result = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        assert_eq!(result.iterations, 5);

        let fixed = config.with_adaptive_timeout(false);
        assert_eq!(IlsRunner::run(&inst, &fixed).unwrap().iterations, 5);
    }

    #[test]
    fn test_unbounded_iteration_cap() {
        let inst = three_by_two();
        let config = IlsConfig::default()
            .with_time_budget(Duration::from_millis(20))
            .with_max_iterations(usize::MAX)
            .with_adaptive_timeout(false)
            .with_seed(42);
        let result = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::TimeBudget);
        assert_eq!(result.cost_history.len(), result.iterations);
    }

    #[test]
    fn test_restart_cap() {
        let inst = three_by_two();
        let config = quick().with_stagnation_threshold(1).with_max_restarts(3);
        let result = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::RestartLimit);
        assert_eq!(result.restarts, 3);
        assert_eq!(result.iterations, 4);
    }

    #[test]
    fn test_strength_escalates_and_caps() {
        let inst = three_by_two();
        let config = quick()
            .with_max_iterations(30)
            .with_improvement_threshold(2)
            .with_perturbation(1, 3)
            .with_trace(true);
        let result = IlsRunner::run(&inst, &config).unwrap();

        let strengths: Vec<usize> = result.trace.iter().map(|r| r.strength).collect();
        assert_eq!(&strengths[..6], &[1, 1, 2, 2, 3, 3]);
        assert!(strengths.iter().all(|&s| s <= 3));
        assert_eq!(result.final_strength, 3);
    }

    #[test]
    fn test_early_stop_not_before_target() {
        let inst = random_instance(21, 25, 5);
        let free = IlsRunner::run(&inst, &quick()).unwrap();
        let target = free.best_cycle_time;

        let stopped = IlsRunner::run(&inst, &quick().with_known_optimal(target as f64)).unwrap();

        assert_eq!(stopped.stop_reason, StopReason::OptimalReached);
        assert_eq!(stopped.best_cycle_time, target);
        let expected = if free.initial_cycle_time == target {
            0
        } else {
            free.cost_history.iter().position(|&c| c == target).unwrap() + 1
        };
        assert_eq!(stopped.iterations, expected);
    }

    #[test]
    fn test_cancelled_before_first_iteration() {
        let inst = random_instance(5, 10, 3);
        let flag = Arc::new(AtomicBool::new(true));
        let result = IlsRunner::run_with_cancel(&inst, &quick(), Some(flag)).unwrap();

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best.is_feasible(&inst));
    }

    #[test]
    fn test_time_budget_stop() {
        let inst = random_instance(13, 30, 6);
        let config = IlsConfig::default()
            .with_time_budget(Duration::from_millis(30))
            .with_max_iterations(0)
            .with_adaptive_timeout(false)
            .with_seed(1);
        let result = IlsRunner::run(&inst, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::TimeBudget);
        assert!(result.elapsed >= Duration::from_millis(30));
        assert!(result.best.is_feasible(&inst));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inst = three_by_two();
        let config = quick().with_perturbation(3, 1);
        assert!(matches!(
            IlsRunner::run(&inst, &config),
            Err(AlwabpError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_infeasible_instance_surfaced() {
        let inst = Instance::new(
            vec![vec![None, Some(1)], vec![Some(1), None], vec![None, Some(1)]],
            vec![(0, 1), (1, 2)],
        )
        .unwrap();
        assert!(matches!(
            IlsRunner::run(&inst, &quick()),
            Err(AlwabpError::InfeasibleInstance(_))
        ));
    }
}
