//! Perturbation configuration.

use crate::error::{AlwabpError, Result};
use crate::vnd::Neighborhood;

/// Which move kinds a kick may draw from.
///
/// # Examples
///
/// ```
/// use u_alwabp::perturbation::PerturbationConfig;
/// use u_alwabp::vnd::Neighborhood;
///
/// let config = PerturbationConfig::default().with_worker_swap(true);
/// assert!(config.kinds.contains(&Neighborhood::WorkerSwap));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerturbationConfig {
    /// Kick kinds, drawn uniformly. The list order is also the fallback
    /// order when the drawn kind has no legal move.
    pub kinds: Vec<Neighborhood>,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            kinds: vec![Neighborhood::TaskMove, Neighborhood::TaskSwap],
        }
    }
}

impl PerturbationConfig {
    pub fn with_kinds(mut self, kinds: Vec<Neighborhood>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Adds or removes worker-swap kicks.
    pub fn with_worker_swap(mut self, enabled: bool) -> Self {
        self.kinds.retain(|&k| k != Neighborhood::WorkerSwap);
        if enabled {
            self.kinds.push(Neighborhood::WorkerSwap);
        }
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.kinds.is_empty() {
            return Err(AlwabpError::InvalidParameter(
                "at least one kick kind is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PerturbationConfig::default();
        assert_eq!(
            config.kinds,
            vec![Neighborhood::TaskMove, Neighborhood::TaskSwap]
        );
        assert!(config.validate().is_ok());
        assert!(config.with_kinds(vec![]).validate().is_err());
    }
}
