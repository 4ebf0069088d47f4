//! Adaptive Iterated Local Search (ILS) with annealing acceptance.
//!
//! The run controller: builds a starting point, then alternates
//! perturbation, VND and simulated-annealing acceptance while adapting the
//! perturbation strength, restarting on stagnation and watching the time
//! budget, the iteration cap, an optional known optimum and a
//! cancellation flag.
//!
//! # References
//!
//! - Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated local
//!   search", *Handbook of Metaheuristics*, 320-353.
//! - Miralles, C. et al. (2007). "Advantages of assembly lines in sheltered
//!   work centres for disabled", *International Journal of Production
//!   Economics* 110(1-2), 187-197.

mod config;
mod runner;
mod solve;
mod types;

pub use config::{BestReplacement, IlsConfig};
pub use runner::IlsRunner;
pub use solve::{solve, SolveSummary, SolverParams};
pub use types::{IlsResult, IterationRecord, StopReason};
