//! Simulated-annealing acceptance.
//!
//! Decides whether the iterated local search continues from a candidate
//! local optimum. Improvements and ties are always accepted; a worse
//! candidate is accepted with the Metropolis probability
//! `exp(-delta / T)` while the temperature is above its floor.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod annealer;
mod config;

pub use annealer::Annealer;
pub use config::{FloorPolicy, SaConfig};
