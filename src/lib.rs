//! Assembly line worker assignment and balancing (ALWABP).
//!
//! Assigns tasks to stations and workers to stations (one worker per
//! station) so that the cycle time, the heaviest station load, is as small
//! as possible. Processing times depend on the worker, some workers cannot
//! perform some tasks, and tasks are ordered by a precedence DAG.
//!
//! - **Instance**: validated, immutable problem data.
//! - **Solution**: assignment state with cached loads, O(1) move pricing
//!   and an independent feasibility check.
//! - **Construction**: Ranked Positional Weight list scheduling over a set
//!   of candidate worker permutations.
//! - **VND**: best-improvement descent over task moves, task swaps and
//!   worker swaps.
//! - **Perturbation**: random feasible kicks.
//! - **SA**: simulated-annealing acceptance with a temperature floor.
//! - **ILS**: the adaptive run controller (strength adaptation, restarts,
//!   time budget with adaptive extension, early stopping, cancellation).
//! - **Report** and **Replication**: line balance figures and seeded
//!   independent runs, optionally parallel (`parallel` feature).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use u_alwabp::ils::{IlsConfig, IlsRunner};
//! use u_alwabp::instance::Instance;
//! use u_alwabp::report::LineReport;
//!
//! // 3 tasks, 2 workers; task 0 must not come after task 2
//! let instance = Instance::new(
//!     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), None]],
//!     vec![(0, 2)],
//! )?;
//! let config = IlsConfig::default()
//!     .with_time_budget(Duration::from_millis(200))
//!     .with_max_iterations(100)
//!     .with_seed(1);
//! let result = IlsRunner::run(&instance, &config)?;
//! let report = LineReport::new(&instance, &result.best, None);
//! assert_eq!(report.cycle_time, result.best_cycle_time);
//! # Ok::<(), u_alwabp::AlwabpError>(())
//! ```
//!
//! # Logging
//!
//! The solver emits [`tracing`] events (run start and end, restarts and new
//! bests at `INFO`; strength changes and deadline extensions at `DEBUG`;
//! individual VND steps at `TRACE`). No subscriber is installed.

pub mod construction;
pub mod error;
pub mod ils;
pub mod instance;
pub mod perturbation;
pub mod random;
pub mod replication;
pub mod report;
pub mod sa;
pub mod solution;
pub mod vnd;

pub use error::{AlwabpError, Result};
