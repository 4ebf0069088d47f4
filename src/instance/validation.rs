//! Structural checks for ALWABP problem data.
//!
//! Detects:
//! - Empty or ragged time matrices
//! - Precedence edges referencing unknown tasks, and self-loops
//! - Circular precedence dependencies (DAG validation)
//! - Tasks that no worker can perform
//!
//! # Reference
//! Kahn, A. B. (1962), "Topological sorting of large networks",
//! *Communications of the ACM* 5(11), 558-562.

use crate::error::{AlwabpError, Result};

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No tasks or no workers.
    EmptyInstance,
    /// A time-matrix row has the wrong number of worker columns.
    RaggedTimes,
    /// A precedence edge or incapability entry references an unknown index.
    IndexOutOfRange,
    /// A precedence edge from a task to itself.
    SelfLoop,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A task that no worker can perform.
    UncoveredTask,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<Vec<ValidationError>> for AlwabpError {
    /// Uncovered tasks make the instance infeasible; every other problem
    /// means the data itself is malformed.
    fn from(errors: Vec<ValidationError>) -> Self {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        if errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::UncoveredTask)
        {
            AlwabpError::InfeasibleInstance(message)
        } else {
            AlwabpError::InvalidInstance(message)
        }
    }
}

/// Checks the shape of a time matrix and returns the worker count.
pub(crate) fn check_shape<T>(rows: &[Vec<T>]) -> std::result::Result<usize, Vec<ValidationError>> {
    let Some(first) = rows.first() else {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "instance has no tasks",
        )]);
    };
    let k = first.len();
    if k == 0 {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "instance has no workers",
        )]);
    }

    let errors: Vec<ValidationError> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() != k)
        .map(|(task, row)| {
            ValidationError::new(
                ValidationErrorKind::RaggedTimes,
                format!("task {task} has {} worker times, expected {k}", row.len()),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(k)
    } else {
        Err(errors)
    }
}

/// Checks precedence edges for range errors and self-loops.
pub(crate) fn check_edges(n: usize, edges: &[(usize, usize)]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for &(i, j) in edges {
        if i >= n || j >= n {
            errors.push(ValidationError::new(
                ValidationErrorKind::IndexOutOfRange,
                format!("precedence {i} -> {j} references a task outside 0..{n}"),
            ));
        } else if i == j {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfLoop,
                format!("task {i} cannot precede itself"),
            ));
        }
    }
    errors
}

/// Computes a topological order of the precedence DAG.
///
/// Ready tasks are released smallest id first, so the order is unique for
/// a given graph. Returns a [`ValidationErrorKind::CyclicDependency`]
/// error if some tasks are never released.
pub(crate) fn topological_order(
    successors: &[Vec<usize>],
    predecessors: &[Vec<usize>],
) -> std::result::Result<Vec<usize>, ValidationError> {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    let n = successors.len();
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&t| in_degree[t] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);

    while let Some(Reverse(task)) = ready.pop() {
        order.push(task);
        for &succ in &successors[task] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        let stuck = (0..n).find(|&t| in_degree[t] > 0).unwrap_or(0);
        Err(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("circular precedence detected involving task {stuck}"),
        ))
    }
}

/// Lists tasks without any capable worker.
pub(crate) fn check_coverage(times: &[Option<u64>], k: usize) -> Vec<ValidationError> {
    times
        .chunks(k)
        .enumerate()
        .filter(|(_, row)| row.iter().all(Option::is_none))
        .map(|(task, _)| {
            ValidationError::new(
                ValidationErrorKind::UncoveredTask,
                format!("no worker can perform task {task}"),
            )
        })
        .collect()
}

/// Converts a list of errors into a crate error, or `Ok` when empty.
pub(crate) fn into_result(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
