//! Variable Neighborhood Descent (VND).
//!
//! Deterministic local search over three move families: relocating a
//! task, exchanging two tasks and exchanging the workers of two stations.
//! Each neighborhood is scanned exhaustively and the best strictly
//! improving move is applied; any improvement sends the search back to
//! the first neighborhood.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//!   Principles and applications", *European Journal of Operational Research* 130(3), 449-467.

mod config;
mod neighborhood;
mod search;

pub use config::VndConfig;
pub use neighborhood::Neighborhood;
pub(crate) use neighborhood::legal_steps;
pub use search::{Vnd, VndOutcome};
