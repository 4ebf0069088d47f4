//! Independent seeded replications of the search.
//!
//! Every replication owns its own random stream and solutions and only
//! reads the shared [`Instance`]. With the `parallel` feature enabled the
//! replications run on the rayon thread pool; otherwise they run one after
//! another. Results are identical either way.

use std::time::Duration;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::error::{AlwabpError, Result};
use crate::ils::{IlsConfig, IlsResult, IlsRunner, StopReason};
use crate::instance::{Instance, Time};
use crate::solution::Solution;

/// Outcome of one replication.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicationRun {
    pub seed: u64,
    pub initial_cycle_time: Time,
    pub final_cycle_time: Time,
    pub elapsed: Duration,
    pub iterations: usize,
    pub restarts: usize,
    pub stop_reason: StopReason,
}

impl From<&IlsResult> for ReplicationRun {
    fn from(result: &IlsResult) -> Self {
        Self {
            seed: result.seed,
            initial_cycle_time: result.initial_cycle_time,
            final_cycle_time: result.best_cycle_time,
            elapsed: result.elapsed,
            iterations: result.iterations,
            restarts: result.restarts,
            stop_reason: result.stop_reason,
        }
    }
}

/// Aggregate figures over a set of replications.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicationStats {
    pub runs: usize,
    pub mean_initial: f64,
    pub mean_final: f64,
    pub best_final: Time,
    pub worst_final: Time,
    /// Population standard deviation of the final cycle times.
    pub std_dev_final: f64,
    pub mean_elapsed: Duration,
    /// `(mean_initial - mean_final) / mean_initial`, in percent.
    pub improvement_percent: f64,
}

impl ReplicationStats {
    /// Aggregates `runs`. `None` if empty.
    pub fn from_runs(runs: &[ReplicationRun]) -> Option<Self> {
        if runs.is_empty() {
            return None;
        }
        let count = runs.len() as f64;
        let mean_initial = runs.iter().map(|r| r.initial_cycle_time as f64).sum::<f64>() / count;
        let mean_final = runs.iter().map(|r| r.final_cycle_time as f64).sum::<f64>() / count;
        let variance = runs
            .iter()
            .map(|r| {
                let d = r.final_cycle_time as f64 - mean_final;
                d * d
            })
            .sum::<f64>()
            / count;
        let total_elapsed: Duration = runs.iter().map(|r| r.elapsed).sum();

        Some(Self {
            runs: runs.len(),
            mean_initial,
            mean_final,
            best_final: runs.iter().map(|r| r.final_cycle_time).min().unwrap_or(0),
            worst_final: runs.iter().map(|r| r.final_cycle_time).max().unwrap_or(0),
            std_dev_final: variance.sqrt(),
            mean_elapsed: total_elapsed / runs.len() as u32,
            improvement_percent: if mean_initial > 0.0 {
                (mean_initial - mean_final) / mean_initial * 100.0
            } else {
                0.0
            },
        })
    }
}

/// All replications of one instance.
#[derive(Debug, Clone)]
pub struct ReplicationReport {
    /// One entry per seed, in seed order.
    pub runs: Vec<ReplicationRun>,
    pub stats: ReplicationStats,
    /// Best solution over all runs (first seed on ties).
    pub best: Solution,
}

/// Runs one search per seed with otherwise identical configuration.
///
/// # Errors
/// [`AlwabpError::InvalidParameter`] for an empty seed list; otherwise the
/// first error of any replication.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_alwabp::ils::IlsConfig;
/// use u_alwabp::instance::Instance;
/// use u_alwabp::replication::replicate;
///
/// let instance = Instance::new(
///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
///     vec![],
/// ).unwrap();
/// let config = IlsConfig::default()
///     .with_time_budget(Duration::from_secs(1))
///     .with_max_iterations(20);
/// let report = replicate(&instance, &config, &[1, 2, 3]).unwrap();
/// assert_eq!(report.runs.len(), 3);
/// assert_eq!(report.stats.best_final, 6);
/// ```
pub fn replicate(instance: &Instance, config: &IlsConfig, seeds: &[u64]) -> Result<ReplicationReport> {
    if seeds.is_empty() {
        return Err(AlwabpError::InvalidParameter(
            "at least one replication seed is required".into(),
        ));
    }
    config.validate()?;

    let run_one = |&seed: &u64| -> Result<IlsResult> {
        let seeded = config.clone().with_seed(seed);
        IlsRunner::run(instance, &seeded)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<IlsResult> = seeds.par_iter().map(run_one).collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let results: Vec<IlsResult> = seeds.iter().map(run_one).collect::<Result<_>>()?;

    let runs: Vec<ReplicationRun> = results.iter().map(ReplicationRun::from).collect();
    let stats = ReplicationStats::from_runs(&runs).ok_or_else(|| {
        AlwabpError::InvalidParameter("at least one replication seed is required".into())
    })?;

    let mut results = results;
    let best_index = results
        .iter()
        .enumerate()
        .min_by_key(|(i, r)| (r.best_cycle_time, *i))
        .map_or(0, |(i, _)| i);
    let best = results.swap_remove(best_index).best;

    info!(
        runs = stats.runs,
        best = stats.best_final,
        mean = stats.mean_final,
        "replications finished"
    );

    Ok(ReplicationReport { runs, stats, best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seed: u64, initial: Time, final_: Time, ms: u64) -> ReplicationRun {
        ReplicationRun {
            seed,
            initial_cycle_time: initial,
            final_cycle_time: final_,
            elapsed: Duration::from_millis(ms),
            iterations: 10,
            restarts: 0,
            stop_reason: StopReason::IterationLimit,
        }
    }

    #[test]
    fn test_stats() {
        let runs = vec![run(1, 20, 10, 100), run(2, 20, 12, 300), run(3, 20, 14, 200)];
        let stats = ReplicationStats::from_runs(&runs).unwrap();

        assert_eq!(stats.runs, 3);
        assert!((stats.mean_initial - 20.0).abs() < 1e-12);
        assert!((stats.mean_final - 12.0).abs() < 1e-12);
        assert_eq!(stats.best_final, 10);
        assert_eq!(stats.worst_final, 14);
        assert!((stats.std_dev_final - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.mean_elapsed, Duration::from_millis(200));
        assert!((stats.improvement_percent - 40.0).abs() < 1e-9);
        assert!(ReplicationStats::from_runs(&[]).is_none());
    }

    #[test]
    fn test_replicate_matches_single_runs() {
        let inst = Instance::new(
            vec![
                vec![Some(4), Some(6), Some(5)],
                vec![Some(5), Some(3), Some(7)],
                vec![Some(2), Some(8), Some(3)],
                vec![Some(6), Some(2), Some(4)],
                vec![Some(3), Some(5), Some(2)],
            ],
            vec![(0, 3), (1, 4)],
        )
        .unwrap();
        let config = IlsConfig::default()
            .with_time_budget(Duration::from_secs(30))
            .with_max_iterations(40);
        let seeds = [5, 6, 7, 8];

        let report = replicate(&inst, &config, &seeds).unwrap();

        assert_eq!(report.runs.len(), 4);
        for (run, &seed) in report.runs.iter().zip(&seeds) {
            let single = IlsRunner::run(&inst, &config.clone().with_seed(seed)).unwrap();
            assert_eq!(run.seed, seed);
            assert_eq!(run.final_cycle_time, single.best_cycle_time);
            assert_eq!(run.iterations, 40);
        }
        assert_eq!(report.best.cycle_time(), report.stats.best_final);
        assert!(report.best.is_feasible(&inst));
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let inst = Instance::new(vec![vec![Some(1)]], vec![]).unwrap();
        assert!(matches!(
            replicate(&inst, &IlsConfig::default(), &[]),
            Err(AlwabpError::InvalidParameter(_))
        ));
    }
}
