//! Random kicks applied between local searches.
//!
//! A perturbation of strength `p` applies `p` random legal moves drawn
//! from the configured kick kinds. Kicks never break feasibility.

mod config;
mod kick;

pub use config::PerturbationConfig;
pub use kick::Perturber;
