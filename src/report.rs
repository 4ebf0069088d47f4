//! Line balance report for a finished solution.
//!
//! Turns a [`Solution`] into plain per-station figures that a caller can
//! persist or print without touching solver internals.

use std::fmt;

use crate::instance::{Instance, Time};
use crate::solution::Solution;

/// One station of the line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationReport {
    pub station: usize,
    pub worker: usize,
    /// `(task, duration)` pairs, ascending by task id.
    pub tasks: Vec<(usize, Time)>,
    pub load: Time,
    /// `cycle_time - load`.
    pub idle: Time,
    /// `load / cycle_time`, in percent.
    pub utilization: f64,
}

/// Balance figures for a whole line.
///
/// # Examples
///
/// ```
/// use u_alwabp::instance::Instance;
/// use u_alwabp::report::LineReport;
/// use u_alwabp::solution::Solution;
///
/// let instance = Instance::new(
///     vec![vec![Some(4), Some(6)], vec![Some(5), Some(3)], vec![Some(2), Some(8)]],
///     vec![],
/// ).unwrap();
/// let sol = Solution::from_assignment(&instance, vec![0, 1], vec![0, 1, 0]).unwrap();
/// let report = LineReport::new(&instance, &sol, Some(6.0));
/// assert_eq!(report.cycle_time, 6);
/// assert_eq!(report.total_idle, 3);
/// assert_eq!(report.gap_percent, Some(0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineReport {
    pub cycle_time: Time,
    pub stations: Vec<StationReport>,
    /// Sum of all station loads.
    pub total_work: Time,
    /// `cycle_time * stations`.
    pub total_available: Time,
    pub total_idle: Time,
    /// `total_work / total_available`, in percent.
    pub efficiency: f64,
    /// `(max load - min load) / cycle_time`, in percent. Lower is better.
    pub balance_index: f64,
    /// `(cycle_time - optimum) / optimum`, in percent, when an optimum is known.
    pub gap_percent: Option<f64>,
}

impl LineReport {
    pub fn new(instance: &Instance, solution: &Solution, known_optimal: Option<f64>) -> Self {
        let cycle_time = solution.cycle_time();
        let percent_of_cycle = |value: Time| {
            if cycle_time > 0 {
                value as f64 / cycle_time as f64 * 100.0
            } else {
                0.0
            }
        };

        let stations: Vec<StationReport> = solution
            .station_assignments(instance)
            .into_iter()
            .map(|a| StationReport {
                station: a.station,
                worker: a.worker,
                idle: cycle_time - a.load,
                utilization: percent_of_cycle(a.load),
                load: a.load,
                tasks: a.tasks,
            })
            .collect();

        let total_work: Time = stations.iter().map(|s| s.load).sum();
        let total_available = cycle_time * stations.len() as Time;
        let efficiency = if total_available > 0 {
            total_work as f64 / total_available as f64 * 100.0
        } else {
            0.0
        };
        let max_load = stations.iter().map(|s| s.load).max().unwrap_or(0);
        let min_load = stations.iter().map(|s| s.load).min().unwrap_or(0);

        let gap_percent = known_optimal
            .filter(|&opt| opt > 0.0)
            .map(|opt| (cycle_time as f64 - opt) / opt * 100.0);

        Self {
            cycle_time,
            total_work,
            total_available,
            total_idle: total_available - total_work,
            efficiency,
            balance_index: percent_of_cycle(max_load - min_load),
            gap_percent,
            stations,
        }
    }

    /// Stations whose load equals the cycle time.
    pub fn bottlenecks(&self) -> impl Iterator<Item = &StationReport> + '_ {
        self.stations
            .iter()
            .filter(move |s| s.load == self.cycle_time)
    }
}

impl fmt::Display for LineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cycle time: {}", self.cycle_time)?;
        for s in &self.stations {
            let tasks: Vec<String> = s
                .tasks
                .iter()
                .map(|(task, time)| format!("{task}:{time}"))
                .collect();
            writeln!(
                f,
                "station {} (worker {}): load {} idle {} util {:.1}% [{}]",
                s.station,
                s.worker,
                s.load,
                s.idle,
                s.utilization,
                tasks.join(" ")
            )?;
        }
        write!(
            f,
            "efficiency {:.1}%, balance index {:.1}%",
            self.efficiency, self.balance_index
        )?;
        if let Some(gap) = self.gap_percent {
            write!(f, ", gap {gap:.2}%")?;
        }
        Ok(())
    }
}
