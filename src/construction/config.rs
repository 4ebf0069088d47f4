//! RPW construction configuration.

use crate::error::{AlwabpError, Result};

/// Per-task duration used when computing positional weights.
///
/// Processing times depend on the worker, so the classic single-duration
/// RPW needs a representative value per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepresentativeTime {
    /// Fastest capable worker.
    #[default]
    Min,
    /// Average over capable workers.
    ///
    /// Only the duration matches the classic ALWABP ILS setup. Its weight
    /// was a recursive sum over direct successors, which counts a shared
    /// descendant once per path; here every distinct transitive successor
    /// counts once, whichever representative time is chosen.
    Mean,
}

/// Configuration for the RPW construction heuristic.
///
/// # Examples
///
/// ```
/// use u_alwabp::construction::{ConstructionConfig, RepresentativeTime};
///
/// let config = ConstructionConfig::default()
///     .with_candidate_permutations(16)
///     .with_representative_time(RepresentativeTime::Mean);
/// assert_eq!(config.candidate_permutations, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionConfig {
    /// Random worker permutations tried per construction, in addition to
    /// the capability-breadth permutation used for the first build. Also
    /// caps the assignment attempts of a restart draw.
    pub candidate_permutations: usize,

    /// Duration used for positional weights.
    pub representative_time: RepresentativeTime,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            candidate_permutations: 8,
            representative_time: RepresentativeTime::Min,
        }
    }
}

impl ConstructionConfig {
    pub fn with_candidate_permutations(mut self, n: usize) -> Self {
        self.candidate_permutations = n;
        self
    }

    pub fn with_representative_time(mut self, r: RepresentativeTime) -> Self {
        self.representative_time = r;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.candidate_permutations == 0 {
            return Err(AlwabpError::InvalidParameter(
                "candidate_permutations must be at least 1".into(),
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
        let config = ConstructionConfig::default();
        assert_eq!(config.candidate_permutations, 8);
        assert_eq!(config.representative_time, RepresentativeTime::Min);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let config = ConstructionConfig::default().with_candidate_permutations(0);
        assert!(matches!(
            config.validate(),
            Err(AlwabpError::InvalidParameter(_))
        ));
    }
}
