//! Periodic task model.
//!
//! A task releases one instance per period. Each instance must receive
//! `execution_time` units of processor time inside its window
//! `[available, available + period)`.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment", J. ACM 20(1)

use serde::{Deserialize, Serialize};

use super::SchedulingDecision;
use crate::error::ScheduleError;

/// Discrete time instant or duration, in scheduler time units.
pub type Time = u32;

/// Identifies one task instance within a task list.
///
/// Ordered by task index, then by release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    /// Index of the owning task in the task list.
    pub task: usize,
    /// Index of the instance within its task's instance list.
    pub instance: usize,
}

impl InstanceId {
    /// Creates an instance identifier.
    pub fn new(task: usize, instance: usize) -> Self {
        Self { task, instance }
    }
}

/// A periodic task.
///
/// Instances are generated per scheduling run by
/// [`create_instances`](Task::create_instances) and are not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Display name.
    pub name: String,
    /// Time units consumed per period.
    pub execution_time: Time,
    /// Release interval (and relative deadline).
    pub period: Time,
    #[serde(skip)]
    instances: Vec<TaskInstance>,
}

impl Task {
    /// Creates a task with no instances.
    pub fn new(name: impl Into<String>, execution_time: Time, period: Time) -> Self {
        Self {
            name: name.into(),
            execution_time,
            period,
            instances: Vec::new(),
        }
    }

    /// Regenerates this task's instances for one super-period.
    ///
    /// Instances are released at `0, period, 2·period, …` below
    /// `super_period`. Previous instances (and their decisions) are replaced.
    /// `index` is this task's position in the task list and is recorded in
    /// each instance's [`InstanceId`].
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidPeriod`] if the period is zero.
    /// - [`ScheduleError::SuperPeriodNotMultiple`] if `super_period` is not a
    ///   positive multiple of the period.
    pub fn create_instances(
        &mut self,
        index: usize,
        super_period: Time,
    ) -> Result<&[TaskInstance], ScheduleError> {
        if self.period == 0 {
            return Err(ScheduleError::InvalidPeriod {
                task: self.name.clone(),
            });
        }
        if super_period == 0 || super_period % self.period != 0 {
            return Err(ScheduleError::SuperPeriodNotMultiple {
                task: self.name.clone(),
                period: self.period,
                super_period,
            });
        }

        let period = self.period;
        self.instances = (0..super_period / period)
            .map(|i| TaskInstance::new(InstanceId::new(index, i as usize), i * period, period))
            .collect();
        Ok(&self.instances)
    }

    /// Instances generated by the last [`create_instances`](Task::create_instances).
    pub fn instances(&self) -> &[TaskInstance] {
        &self.instances
    }

    /// Looks up an instance by its position.
    pub fn instance(&self, index: usize) -> Option<&TaskInstance> {
        self.instances.get(index)
    }

    pub(crate) fn instance_mut(&mut self, index: usize) -> Option<&mut TaskInstance> {
        self.instances.get_mut(index)
    }

    /// Fraction of one processor this task needs (`execution_time / period`).
    ///
    /// Returns `None` for a zero period.
    pub fn utilization(&self) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        Some(self.execution_time as f64 / self.period as f64)
    }
}

/// One periodic release of a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Identity; `id.task` points back at the owning task.
    pub id: InstanceId,
    /// Release time.
    pub available: Time,
    period: Time,
    decisions: Vec<SchedulingDecision>,
}

impl TaskInstance {
    fn new(id: InstanceId, available: Time, period: Time) -> Self {
        Self {
            id,
            available,
            period,
            decisions: Vec::new(),
        }
    }

    /// Absolute deadline: `available + period` (exclusive).
    pub fn deadline(&self) -> Time {
        self.available + self.period
    }

    /// Whether `time` lies in `[available, deadline)`.
    pub fn is_available_at(&self, time: Time) -> bool {
        time >= self.available && time < self.deadline()
    }

    /// Decisions assigned to this instance, in increasing time order.
    pub fn decisions(&self) -> &[SchedulingDecision] {
        &self.decisions
    }

    pub(crate) fn push_decision(&mut self, decision: SchedulingDecision) {
        self.decisions.push(decision);
    }
}
