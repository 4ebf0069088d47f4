//! Black-box entry point for parameter tuning.

use std::time::Duration;

use super::config::IlsConfig;
use super::runner::IlsRunner;
use super::types::IlsResult;
use crate::error::Result;
use crate::instance::{Instance, Time};

/// The tunable subset of [`IlsConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverParams {
    pub initial_temp_factor: f64,
    pub cooling_rate: f64,
    pub perturbation_initial: usize,
    pub perturbation_max: usize,
    pub improvement_threshold: usize,
    pub stagnation_threshold: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        let config = IlsConfig::default();
        Self {
            initial_temp_factor: config.annealing.initial_temp_factor,
            cooling_rate: config.annealing.cooling_rate,
            perturbation_initial: config.perturbation_initial,
            perturbation_max: config.perturbation_max,
            improvement_threshold: config.improvement_threshold,
            stagnation_threshold: config.stagnation_threshold,
        }
    }
}

impl SolverParams {
    /// Overrides the tunable fields of `config`.
    pub fn apply(&self, mut config: IlsConfig) -> IlsConfig {
        config.annealing.initial_temp_factor = self.initial_temp_factor;
        config.annealing.cooling_rate = self.cooling_rate;
        config.perturbation_initial = self.perturbation_initial;
        config.perturbation_max = self.perturbation_max;
        config.improvement_threshold = self.improvement_threshold;
        config.stagnation_threshold = self.stagnation_threshold;
        config
    }
}

/// What a tuning driver observes from one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveSummary {
    pub initial_cycle_time: Time,
    pub final_cycle_time: Time,
    pub elapsed: Duration,
}

impl From<&IlsResult> for SolveSummary {
    fn from(result: &IlsResult) -> Self {
        Self {
            initial_cycle_time: result.initial_cycle_time,
            final_cycle_time: result.best_cycle_time,
            elapsed: result.elapsed,
        }
    }
}

/// Runs one seeded search with default settings except for `params`, the
/// time budget and the seed. The iteration cap is lifted so that the
/// budget alone bounds the run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_alwabp::ils::{solve, SolverParams};
/// use u_alwabp::instance::Instance;
///
/// let instance = Instance::new(
///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
///     vec![],
/// ).unwrap();
/// let summary = solve(&instance, &SolverParams::default(), 7, Duration::from_millis(20)).unwrap();
/// assert_eq!(summary.final_cycle_time, 6);
/// assert!(summary.final_cycle_time <= summary.initial_cycle_time);
/// ```
pub fn solve(
    instance: &Instance,
    params: &SolverParams,
    seed: u64,
    time_budget: Duration,
) -> Result<SolveSummary> {
    let config = params.apply(
        IlsConfig::default()
            .with_time_budget(time_budget)
            .with_max_iterations(0)
            .with_seed(seed),
    );
    let result = IlsRunner::run(instance, &config)?;
    Ok(SolveSummary::from(&result))
}
