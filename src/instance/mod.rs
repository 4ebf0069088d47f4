//! Problem data for the Assembly Line Worker Assignment and Balancing
//! Problem (ALWABP).
//!
//! An [`Instance`] holds `n` tasks, `k` workers (one per station), the
//! worker-specific processing times, the precedence DAG and the derived
//! incapability sets. Instances are validated once and then shared
//! read-only by every search component.
//!
//! # References
//!
//! - Miralles, C., García-Sabater, J. P., Andrés, C. & Cardós, M. (2007).
//!   "Advantages of assembly lines in Sheltered Work Centres for Disabled",
//!   *International Journal of Production Economics* 110(1-2), 187-197.

mod model;
mod validation;

pub use model::{Instance, Time};
pub use validation::{ValidationError, ValidationErrorKind};
