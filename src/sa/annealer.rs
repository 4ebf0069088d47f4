//! Temperature state and the Metropolis test.

use rand::Rng;

use super::config::{FloorPolicy, SaConfig};
use crate::instance::Time;

/// Acceptance state for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Annealer {
    config: SaConfig,
    initial: f64,
    temperature: f64,
}

impl Annealer {
    /// Starts at `initial_temp_factor * initial_cycle_time`, clamped to the
    /// floor.
    pub fn new(config: SaConfig, initial_cycle_time: Time) -> Self {
        let initial = (config.initial_temp_factor * initial_cycle_time as f64)
            .max(config.min_temperature);
        Self {
            config,
            initial,
            temperature: initial,
        }
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Temperature restored by [`reset`](Self::reset).
    pub fn initial_temperature(&self) -> f64 {
        self.initial
    }

    /// Whether the temperature sits at the floor, where worse candidates
    /// are rejected outright.
    pub fn is_frozen(&self) -> bool {
        self.temperature <= self.config.min_temperature
    }

    /// Metropolis acceptance of `candidate` against `current`.
    ///
    /// Consumes one uniform draw only when the candidate is worse and the
    /// temperature is above the floor.
    pub fn accept<R: Rng>(&self, current: Time, candidate: Time, rng: &mut R) -> bool {
        if candidate <= current {
            return true;
        }
        if self.is_frozen() {
            return false;
        }
        let delta = (candidate - current) as f64;
        let probability = (-delta / self.temperature).exp();
        rng.random_range(0.0..1.0) < probability
    }

    /// One geometric cooling step.
    pub fn cool(&mut self) {
        let next = self.temperature * self.config.cooling_rate;
        self.temperature = if next >= self.config.min_temperature {
            next
        } else {
            match self.config.floor_policy {
                FloorPolicy::Clamp => self.config.min_temperature,
                FloorPolicy::Reheat => self.initial,
            }
        };
    }

    /// Restores the initial temperature.
    pub fn reset(&mut self) {
        self.temperature = self.initial;
    }
}
