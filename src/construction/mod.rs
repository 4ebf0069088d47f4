//! Initial solution construction.
//!
//! A Ranked Positional Weight (RPW) list scheduler adapted to
//! worker-dependent processing times. Several worker-to-station
//! permutations are tried per call and the assignment with the smallest
//! cycle time is kept. Restarts take one fresh draw that changes the
//! staffing.
//!
//! # Reference
//!
//! Helgeson, W. B. & Birnie, D. P. (1961). "Assembly line balancing using
//! the ranked positional weight technique", *Journal of Industrial
//! Engineering* 12(6), 394-398.

mod config;
mod rpw;

pub use config::{ConstructionConfig, RepresentativeTime};
pub use rpw::RpwConstructor;
