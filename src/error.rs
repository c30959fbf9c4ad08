//! Scheduling errors.

use thiserror::Error;

use crate::graph::GraphError;
use crate::models::Time;

/// Errors returned by the flow scheduler.
///
/// Configuration errors are raised before any graph work begins. Graph
/// errors indicate an inconsistent flow network and abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Processor count is zero or does not fit a flow capacity.
    #[error("processor count must be positive, got {0}")]
    InvalidProcessorCount(usize),
    /// Super-period is zero.
    #[error("super-period must be positive, got {0}")]
    InvalidSuperPeriod(Time),
    /// A task has a zero period.
    #[error("task '{task}' has a zero period")]
    InvalidPeriod { task: String },
    /// The super-period is not a positive multiple of a task's period.
    #[error("super-period {super_period} is not a multiple of task '{task}' period {period}")]
    SuperPeriodNotMultiple {
        task: String,
        period: Time,
        super_period: Time,
    },
    /// The task set has no representable super-period.
    #[error("super-period of the task set overflows")]
    SuperPeriodOverflow,
    /// Flow network misuse.
    #[error("flow network error: {0}")]
    Graph(#[from] GraphError),
}
