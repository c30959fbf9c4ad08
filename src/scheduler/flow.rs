//! Max-flow schedule generator.
//!
//! # Algorithm
//!
//! 1. Check processor count, super-period and task periods.
//! 2. Build the time-expanded network ([`FlowNetwork::build`]).
//! 3. Saturate it with Edmonds–Karp.
//! 4. Extract, pack and sequence the decisions.
//!
//! The caller is expected to have checked aggregate feasibility
//! (see [`crate::validation`]); for an infeasible set the returned grid simply
//! leaves some instances short of their execution time.
//!
//! # Reference
//! Horn (1974), "Some Simple Scheduling Algorithms"

use tracing::info;

use super::extract::{extract_raw_schedule, pack, sequence};
use super::network::FlowNetwork;
use crate::error::ScheduleError;
use crate::flow::EdmondsKarp;
use crate::models::{Schedule, Task, Time};
use crate::validation::super_period;

/// Input container for scheduling.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Tasks to schedule; their instances are regenerated on each run.
    pub tasks: Vec<Task>,
    /// Number of identical processors.
    pub processor_count: usize,
    /// Explicit super-period. `None` = LCM of task periods.
    pub super_period: Option<Time>,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(tasks: Vec<Task>, processor_count: usize) -> Self {
        Self {
            tasks,
            processor_count,
            super_period: None,
        }
    }

    /// Sets an explicit super-period.
    pub fn with_super_period(mut self, super_period: Time) -> Self {
        self.super_period = Some(super_period);
        self
    }

    /// The super-period used for scheduling.
    ///
    /// # Errors
    /// [`ScheduleError::SuperPeriodOverflow`] if the LCM does not fit, or a
    /// task has a zero period.
    pub fn resolved_super_period(&self) -> Result<Time, ScheduleError> {
        match self.super_period {
            Some(s) => Ok(s),
            None => super_period(&self.tasks).ok_or(ScheduleError::SuperPeriodOverflow),
        }
    }
}

/// Preemptive multiprocessor scheduler based on maximum flow.
///
/// # Example
///
/// ```
/// use u_flowsched::models::Task;
/// use u_flowsched::scheduler::FlowScheduler;
///
/// let mut tasks = vec![Task::new("A", 1, 2), Task::new("B", 1, 4)];
/// let schedule = FlowScheduler::new().schedule(&mut tasks, 1, 4).unwrap();
///
/// assert_eq!(schedule.occupied_count(), 3);
/// assert_eq!(tasks[0].instances().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowScheduler {
    solver: EdmondsKarp,
}

impl FlowScheduler {
    /// Creates a new scheduler.
    pub fn new() -> Self {
        Self {
            solver: EdmondsKarp::new(),
        }
    }

    /// Computes a `super_period × processor_count` schedule for `tasks`.
    ///
    /// Regenerates each task's instances and records the resulting decisions
    /// on them.
    ///
    /// # Errors
    /// Configuration errors ([`ScheduleError::InvalidProcessorCount`],
    /// [`ScheduleError::InvalidSuperPeriod`],
    /// [`ScheduleError::SuperPeriodNotMultiple`], [`ScheduleError::InvalidPeriod`])
    /// are reported before the network is built. Graph errors abort the run.
    pub fn schedule(
        &self,
        tasks: &mut [Task],
        processor_count: usize,
        super_period: Time,
    ) -> Result<Schedule, ScheduleError> {
        Self::check_config(tasks, processor_count, super_period)?;

        let mut network = FlowNetwork::build(tasks, processor_count, super_period)?;
        let demand = network.demand();
        let summary = self
            .solver
            .max_flow(&mut network.graph, &network.source, &network.sink)?;

        let raw = extract_raw_schedule(&network)?;
        let mut schedule = pack(raw, processor_count);
        sequence(&mut schedule, tasks);

        info!(
            tasks = tasks.len(),
            processor_count,
            super_period,
            demand,
            flow = summary.total_flow,
            occupied = schedule.occupied_count(),
            "schedule computed"
        );

        Ok(schedule)
    }

    /// Schedules from a request, resolving the super-period if unset.
    pub fn schedule_request(
        &self,
        request: &mut ScheduleRequest,
    ) -> Result<Schedule, ScheduleError> {
        let super_period = request.resolved_super_period()?;
        self.schedule(&mut request.tasks, request.processor_count, super_period)
    }

    fn check_config(
        tasks: &[Task],
        processor_count: usize,
        super_period: Time,
    ) -> Result<(), ScheduleError> {
        if processor_count == 0 {
            return Err(ScheduleError::InvalidProcessorCount(processor_count));
        }
        if super_period == 0 {
            return Err(ScheduleError::InvalidSuperPeriod(super_period));
        }
        for task in tasks {
            if task.period == 0 {
                return Err(ScheduleError::InvalidPeriod {
                    task: task.name.clone(),
                });
            }
            if super_period % task.period != 0 {
                return Err(ScheduleError::SuperPeriodNotMultiple {
                    task: task.name.clone(),
                    period: task.period,
                    super_period,
                });
            }
        }
        Ok(())
    }
}

/// Computes a schedule with a default [`FlowScheduler`].
///
/// # Errors
/// See [`FlowScheduler::schedule`].
pub fn get_schedule(
    tasks: &mut [Task],
    processor_count: usize,
    super_period: Time,
) -> Result<Schedule, ScheduleError> {
    FlowScheduler::new().schedule(tasks, processor_count, super_period)
}
