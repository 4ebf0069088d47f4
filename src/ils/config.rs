//! Iterated local search configuration.

use std::time::Duration;

use crate::construction::ConstructionConfig;
use crate::error::{AlwabpError, Result};
use crate::instance::Time;
use crate::perturbation::PerturbationConfig;
use crate::sa::SaConfig;
use crate::vnd::VndConfig;

/// When a candidate replaces the best-known solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BestReplacement {
    /// Only a strictly smaller cycle time replaces the best-known.
    #[default]
    StrictlyBetter,
    /// An equal cycle time also replaces it (the snapshot moves along a
    /// plateau). Adaptation still reacts to strict improvements only.
    AllowEqual,
}

impl BestReplacement {
    pub(crate) fn replaces(self, best: Time, candidate: Time) -> bool {
        match self {
            BestReplacement::StrictlyBetter => candidate < best,
            BestReplacement::AllowEqual => candidate <= best,
        }
    }
}

/// Configuration for the adaptive iterated local search.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_alwabp::ils::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_time_budget(Duration::from_secs(5))
///     .with_perturbation(1, 4)
///     .with_known_optimal(120.0)
///     .with_seed(42);
/// assert_eq!(config.perturbation_max, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Construction heuristic settings.
    pub construction: ConstructionConfig,
    /// Local search settings.
    pub vnd: VndConfig,
    /// Kick kinds.
    pub perturbation: PerturbationConfig,
    /// Acceptance settings.
    pub annealing: SaConfig,

    /// Kick count after a start, a restart or a new best.
    pub perturbation_initial: usize,
    /// Upper bound on the kick count.
    pub perturbation_max: usize,
    /// Non-improving iterations between strength increments.
    pub improvement_threshold: usize,
    /// Non-improving iterations before a restart.
    pub stagnation_threshold: usize,

    /// Wall-clock budget.
    pub time_budget: Duration,
    /// Maximum number of iterations (0 = unlimited).
    pub max_iterations: usize,
    /// Restarts allowed before the run ends (None = unlimited).
    pub max_restarts: Option<usize>,

    /// Known optimal cycle time for early stopping.
    pub known_optimal: Option<f64>,
    /// Relative tolerance: the run stops once
    /// `best <= known_optimal * (1 + optimal_tolerance)`.
    pub optimal_tolerance: f64,

    /// Extend the deadline while the search is still improving.
    pub adaptive_timeout: bool,
    /// An improvement within this fraction of the budget before the deadline
    /// earns an extension.
    pub timeout_window: f64,
    /// Extension size as a fraction of the budget.
    pub timeout_extension: f64,
    /// The deadline never moves past this multiple of the budget.
    pub timeout_hard_cap: f64,

    /// Best-known replacement rule.
    pub best_replacement: BestReplacement,
    /// Record an [`IterationRecord`](super::IterationRecord) per iteration.
    pub record_trace: bool,
    /// Random seed (None draws one; the seed used is reported).
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            construction: ConstructionConfig::default(),
            vnd: VndConfig::default(),
            perturbation: PerturbationConfig::default(),
            annealing: SaConfig::default(),
            perturbation_initial: 2,
            perturbation_max: 5,
            improvement_threshold: 50,
            stagnation_threshold: 1000,
            time_budget: Duration::from_secs(300),
            max_iterations: 10_000,
            max_restarts: None,
            known_optimal: None,
            optimal_tolerance: 0.0,
            adaptive_timeout: true,
            timeout_window: 0.1,
            timeout_extension: 0.1,
            timeout_hard_cap: 1.2,
            best_replacement: BestReplacement::StrictlyBetter,
            record_trace: false,
            seed: None,
        }
    }
}

impl IlsConfig {
    pub fn with_construction(mut self, construction: ConstructionConfig) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_vnd(mut self, vnd: VndConfig) -> Self {
        self.vnd = vnd;
        self
    }

    pub fn with_perturbation_kinds(mut self, perturbation: PerturbationConfig) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn with_annealing(mut self, annealing: SaConfig) -> Self {
        self.annealing = annealing;
        self
    }

    /// Sets the initial and maximum kick counts.
    pub fn with_perturbation(mut self, initial: usize, max: usize) -> Self {
        self.perturbation_initial = initial;
        self.perturbation_max = max;
        self
    }

    pub fn with_improvement_threshold(mut self, n: usize) -> Self {
        self.improvement_threshold = n;
        self
    }

    pub fn with_stagnation_threshold(mut self, n: usize) -> Self {
        self.stagnation_threshold = n;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = Some(n);
        self
    }

    pub fn with_known_optimal(mut self, value: f64) -> Self {
        self.known_optimal = Some(value);
        self
    }

    pub fn with_optimal_tolerance(mut self, tolerance: f64) -> Self {
        self.optimal_tolerance = tolerance;
        self
    }

    pub fn with_adaptive_timeout(mut self, enabled: bool) -> Self {
        self.adaptive_timeout = enabled;
        self
    }

    /// Sets window, extension and hard cap of the adaptive timeout, all as
    /// multiples of the time budget.
    pub fn with_timeout_policy(mut self, window: f64, extension: f64, hard_cap: f64) -> Self {
        self.timeout_window = window;
        self.timeout_extension = extension;
        self.timeout_hard_cap = hard_cap;
        self
    }

    pub fn with_best_replacement(mut self, policy: BestReplacement) -> Self {
        self.best_replacement = policy;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cycle time at or below which the run stops early, if a known
    /// optimum was supplied.
    pub fn early_stop_target(&self) -> Option<f64> {
        self.known_optimal
            .map(|optimum| optimum * (1.0 + self.optimal_tolerance))
    }

    /// Validates this configuration and every nested one.
    pub fn validate(&self) -> Result<()> {
        self.construction.validate()?;
        self.vnd.validate()?;
        self.perturbation.validate()?;
        self.annealing.validate()?;

        let invalid = |msg: String| Err(AlwabpError::InvalidParameter(msg));

        if self.perturbation_initial == 0 {
            return invalid("perturbation_initial must be at least 1".into());
        }
        if self.perturbation_max < self.perturbation_initial {
            return invalid(format!(
                "perturbation_max ({}) must be >= perturbation_initial ({})",
                self.perturbation_max, self.perturbation_initial
            ));
        }
        if self.improvement_threshold == 0 {
            return invalid("improvement_threshold must be at least 1".into());
        }
        if self.stagnation_threshold == 0 {
            return invalid("stagnation_threshold must be at least 1".into());
        }
        if self.time_budget.is_zero() {
            return invalid("time_budget must be positive".into());
        }
        if let Some(optimum) = self.known_optimal {
            if !optimum.is_finite() || optimum < 0.0 {
                return invalid(format!("known_optimal must be finite and >= 0, got {optimum}"));
            }
        }
        if !self.optimal_tolerance.is_finite() || self.optimal_tolerance < 0.0 {
            return invalid(format!(
                "optimal_tolerance must be finite and >= 0, got {}",
                self.optimal_tolerance
            ));
        }
        if self.adaptive_timeout {
            if !(self.timeout_window >= 0.0 && self.timeout_window.is_finite()) {
                return invalid(format!("timeout_window must be >= 0, got {}", self.timeout_window));
            }
            if !(self.timeout_extension > 0.0 && self.timeout_extension.is_finite()) {
                return invalid(format!(
                    "timeout_extension must be positive, got {}",
                    self.timeout_extension
                ));
            }
            if !(self.timeout_hard_cap >= 1.0 && self.timeout_hard_cap.is_finite()) {
                return invalid(format!(
                    "timeout_hard_cap must be >= 1, got {}",
                    self.timeout_hard_cap
                ));
            }
        }
        Ok(())
    }
}
