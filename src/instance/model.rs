//! The immutable ALWABP instance.

use super::validation::{
    check_coverage, check_edges, check_shape, into_result, topological_order, ValidationError,
    ValidationErrorKind,
};
use crate::error::Result;

/// Integer processing duration.
pub type Time = u64;

/// An ALWABP instance: `n` tasks, `k` workers and `k` stations.
///
/// Station order is line order. Each station is staffed by exactly one
/// worker, so the worker and station counts coincide.
///
/// The instance is validated on construction and never mutated, so it can
/// be shared by reference across concurrent replications.
///
/// # Examples
///
/// ```
/// use u_alwabp::instance::Instance;
///
/// let instance = Instance::new(
///     vec![
///         vec![Some(4), Some(6)],
///         vec![Some(5), None],
///     ],
///     vec![(0, 1)],
/// )
/// .unwrap();
///
/// assert_eq!(instance.num_tasks(), 2);
/// assert_eq!(instance.num_workers(), 2);
/// assert!(!instance.can_perform(1, 1));
/// assert_eq!(instance.incapable_tasks(1), &[1]);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    num_tasks: usize,
    num_workers: usize,
    /// Row-major `task * num_workers + worker`.
    times: Vec<Option<Time>>,
    precedences: Vec<(usize, usize)>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    incapable: Vec<Vec<usize>>,
    worker_breadth: Vec<usize>,
}

impl Instance {
    /// Builds an instance from a time matrix (`None` marks incapability)
    /// and precedence edges `(before, after)`.
    ///
    /// Duplicate edges are merged.
    ///
    /// # Errors
    /// - [`InvalidInstance`](crate::AlwabpError::InvalidInstance) for an
    ///   empty or ragged matrix, out-of-range or self-loop edges, or a
    ///   cyclic precedence relation.
    /// - [`InfeasibleInstance`](crate::AlwabpError::InfeasibleInstance)
    ///   when some task has no capable worker.
    pub fn new(times: Vec<Vec<Option<Time>>>, precedences: Vec<(usize, usize)>) -> Result<Self> {
        let num_workers = check_shape(&times)?;
        let num_tasks = times.len();

        into_result(check_edges(num_tasks, &precedences))?;

        let mut edges = precedences;
        edges.sort_unstable();
        edges.dedup();

        let mut predecessors = vec![Vec::new(); num_tasks];
        let mut successors = vec![Vec::new(); num_tasks];
        for &(i, j) in &edges {
            successors[i].push(j);
            predecessors[j].push(i);
        }

        // acyclicity
        topological_order(&successors, &predecessors)
            .map_err(|e| crate::AlwabpError::from(vec![e]))?;

        let flat: Vec<Option<Time>> = times.into_iter().flatten().collect();
        into_result(check_coverage(&flat, num_workers))?;

        let incapable: Vec<Vec<usize>> = (0..num_workers)
            .map(|w| {
                (0..num_tasks)
                    .filter(|&t| flat[t * num_workers + w].is_none())
                    .collect()
            })
            .collect();
        let worker_breadth = incapable.iter().map(|tasks| num_tasks - tasks.len()).collect();

        Ok(Self {
            num_tasks,
            num_workers,
            times: flat,
            precedences: edges,
            predecessors,
            successors,
            incapable,
            worker_breadth,
        })
    }

    /// Builds an instance from a plain time matrix plus explicit
    /// per-worker incapability lists.
    ///
    /// Entries named in `incapable[w]` become infeasible regardless of the
    /// matrix value, so the two views always agree.
    pub fn with_incapabilities(
        times: Vec<Vec<Time>>,
        incapable: Vec<Vec<usize>>,
        precedences: Vec<(usize, usize)>,
    ) -> Result<Self> {
        let num_workers = check_shape(&times)?;
        let num_tasks = times.len();

        let mut errors = Vec::new();
        if incapable.len() > num_workers {
            errors.push(ValidationError::new(
                ValidationErrorKind::IndexOutOfRange,
                format!(
                    "incapability lists given for {} workers, instance has {num_workers}",
                    incapable.len()
                ),
            ));
        }
        for (w, tasks) in incapable.iter().enumerate() {
            for &t in tasks {
                if t >= num_tasks {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::IndexOutOfRange,
                        format!("worker {w} is marked incapable of unknown task {t}"),
                    ));
                }
            }
        }
        into_result(errors)?;

        let mut matrix: Vec<Vec<Option<Time>>> = times
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        for (w, tasks) in incapable.iter().enumerate() {
            for &t in tasks {
                matrix[t][w] = None;
            }
        }

        Self::new(matrix, precedences)
    }

    /// Number of tasks `n`.
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Number of workers `k`.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Number of stations, always equal to the worker count.
    pub fn num_stations(&self) -> usize {
        self.num_workers
    }

    /// Processing time of `task` by `worker`, `None` if incapable.
    #[inline]
    pub fn time(&self, task: usize, worker: usize) -> Option<Time> {
        self.times[task * self.num_workers + worker]
    }

    /// Whether `worker` can perform `task`.
    #[inline]
    pub fn can_perform(&self, task: usize, worker: usize) -> bool {
        self.time(task, worker).is_some()
    }

    /// Direct predecessors of `task`.
    pub fn predecessors(&self, task: usize) -> &[usize] {
        &self.predecessors[task]
    }

    /// Direct successors of `task`.
    pub fn successors(&self, task: usize) -> &[usize] {
        &self.successors[task]
    }

    /// All precedence edges, sorted and deduplicated.
    pub fn precedences(&self) -> &[(usize, usize)] {
        &self.precedences
    }

    /// Tasks `worker` cannot perform, ascending.
    pub fn incapable_tasks(&self, worker: usize) -> &[usize] {
        &self.incapable[worker]
    }

    /// Number of tasks `worker` can perform.
    pub fn worker_breadth(&self, worker: usize) -> usize {
        self.worker_breadth[worker]
    }

    /// Workers able to perform `task`.
    pub fn capable_workers(&self, task: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_workers).filter(move |&w| self.can_perform(task, w))
    }

    /// Smallest feasible processing time of `task`.
    pub fn min_time(&self, task: usize) -> Time {
        self.capable_workers(task)
            .filter_map(|w| self.time(task, w))
            .min()
            .unwrap_or(0)
    }

    /// Mean feasible processing time of `task`.
    pub fn mean_time(&self, task: usize) -> f64 {
        let (sum, count) = self
            .capable_workers(task)
            .filter_map(|w| self.time(task, w))
            .fold((0u64, 0usize), |(s, c), t| (s + t, c + 1));
        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }

    /// All transitive successors of `task` (excluding `task`), ascending.
    pub fn transitive_successors(&self, task: usize) -> Vec<usize> {
        let mut seen = vec![false; self.num_tasks];
        let mut stack: Vec<usize> = self.successors[task].clone();
        while let Some(t) = stack.pop() {
            if !seen[t] {
                seen[t] = true;
                stack.extend_from_slice(&self.successors[t]);
            }
        }
        (0..self.num_tasks).filter(|&t| seen[t]).collect()
    }
}
