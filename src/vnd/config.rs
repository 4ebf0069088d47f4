//! VND configuration.

use super::neighborhood::Neighborhood;
use crate::error::{AlwabpError, Result};

/// Configuration for Variable Neighborhood Descent.
///
/// # Examples
///
/// ```
/// use u_alwabp::vnd::{Neighborhood, VndConfig};
///
/// let config = VndConfig::default().with_worker_swap(false);
/// assert_eq!(
///     config.neighborhoods,
///     vec![Neighborhood::TaskMove, Neighborhood::TaskSwap]
/// );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VndConfig {
    /// Neighborhoods in scan order. After every improving move the descent
    /// returns to the first entry.
    pub neighborhoods: Vec<Neighborhood>,
}

impl Default for VndConfig {
    fn default() -> Self {
        Self {
            neighborhoods: Neighborhood::ALL.to_vec(),
        }
    }
}

impl VndConfig {
    pub fn with_neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    /// Adds or removes [`Neighborhood::WorkerSwap`] (appended last).
    pub fn with_worker_swap(mut self, enabled: bool) -> Self {
        self.neighborhoods.retain(|&n| n != Neighborhood::WorkerSwap);
        if enabled {
            self.neighborhoods.push(Neighborhood::WorkerSwap);
        }
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.neighborhoods.is_empty() {
            return Err(AlwabpError::InvalidParameter(
                "at least one VND neighborhood is required".into(),
            ));
        }
        for (i, n) in self.neighborhoods.iter().enumerate() {
            if self.neighborhoods[..i].contains(n) {
                return Err(AlwabpError::InvalidParameter(format!(
                    "VND neighborhood {n:?} listed twice"
                )));
            }
        }
        Ok(())
    }
}
