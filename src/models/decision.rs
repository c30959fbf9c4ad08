//! Scheduling decision model.

use serde::{Deserialize, Serialize};

use super::{InstanceId, Task, TaskInstance, Time};

/// One unit of execution of a task instance at one time on one processor.
///
/// Decisions refer to their instance by [`InstanceId`]; resolve it against
/// the task list the schedule was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchedulingDecision {
    /// The executing instance.
    pub instance: InstanceId,
    /// Time unit of execution.
    pub time: Time,
    /// Processor column.
    pub processor: usize,
    /// Execution units the instance completed before this one.
    /// `None` until the decision is sequenced.
    pub completed: Option<Time>,
}

impl SchedulingDecision {
    /// Creates an unsequenced decision on processor 0.
    pub fn new(instance: InstanceId, time: Time) -> Self {
        Self {
            instance,
            time,
            processor: 0,
            completed: None,
        }
    }

    /// Sets the processor column.
    pub fn with_processor(mut self, processor: usize) -> Self {
        self.processor = processor;
        self
    }

    /// Sets the completed-unit count.
    pub fn with_completed(mut self, completed: Time) -> Self {
        self.completed = Some(completed);
        self
    }

    /// The task this decision belongs to.
    pub fn task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        tasks.get(self.instance.task)
    }

    /// The instance this decision belongs to.
    pub fn task_instance<'a>(&self, tasks: &'a [Task]) -> Option<&'a TaskInstance> {
        self.task(tasks)?.instance(self.instance.instance)
    }

    /// The instance's next decision in time order.
    ///
    /// With completed count `c` this is entry `c + 1` of the instance's
    /// decision list. Returns `None` for an unsequenced decision or the last
    /// unit of the instance.
    pub fn next_decision<'a>(&self, tasks: &'a [Task]) -> Option<&'a SchedulingDecision> {
        let completed = self.completed? as usize;
        self.task_instance(tasks)?.decisions().get(completed + 1)
    }
}
