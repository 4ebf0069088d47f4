//! Annealing acceptance configuration.

use crate::error::{AlwabpError, Result};

/// What happens when cooling would take the temperature below the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloorPolicy {
    /// Stay at the floor; worse candidates are then always rejected.
    #[default]
    Clamp,
    /// Jump back to the initial temperature.
    Reheat,
}

/// Configuration for simulated-annealing acceptance.
///
/// The starting temperature is relative to the cycle time of the first
/// local optimum: `T0 = initial_temp_factor * C0`, never below
/// `min_temperature`. Cooling is geometric, one step per iteration.
///
/// # Examples
///
/// ```
/// use u_alwabp::sa::{FloorPolicy, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temp_factor(0.2)
///     .with_cooling_rate(0.98)
///     .with_floor_policy(FloorPolicy::Reheat);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature as a fraction of the initial cycle time.
    pub initial_temp_factor: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,

    /// Temperature floor. Must be positive.
    pub min_temperature: f64,

    /// Behaviour at the floor.
    pub floor_policy: FloorPolicy,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp_factor: 0.1,
            cooling_rate: 0.95,
            min_temperature: 0.01,
            floor_policy: FloorPolicy::Clamp,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temp_factor(mut self, factor: f64) -> Self {
        self.initial_temp_factor = factor;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_floor_policy(mut self, policy: FloorPolicy) -> Self {
        self.floor_policy = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temp_factor.is_finite() || self.initial_temp_factor < 0.0 {
            return Err(AlwabpError::InvalidParameter(format!(
                "initial_temp_factor must be finite and non-negative, got {}",
                self.initial_temp_factor
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(AlwabpError::InvalidParameter(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(AlwabpError::InvalidParameter(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        Ok(())
    }
}
