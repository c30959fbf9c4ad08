//! Schedule quality metrics (KPIs).
//!
//! Computes indicators from a completed grid and its input tasks.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Occupied slots | Cells holding a decision |
//! | Idle slots | `S·m − occupied` |
//! | Utilization | Occupied / capacity |
//! | Per-processor utilization | Busy time units / S, per column |
//! | Complete instances | Instances with `e` decisions inside `[a, a + p)` |
//! | Short instances | Instances with fewer |
//!
//! Instances are enumerated from the task periods and the grid's
//! super-period, so the task list does not need to carry instances.

use std::collections::HashMap;

use crate::models::{InstanceId, Schedule, Task};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Cells holding a decision.
    pub occupied_slots: usize,
    /// Empty cells.
    pub idle_slots: usize,
    /// Occupied fraction of the whole grid (0.0..=1.0).
    pub utilization: f64,
    /// Busy fraction of each processor column.
    pub utilization_by_processor: Vec<f64>,
    /// Instances that received their full execution time in their window.
    pub instances_complete: usize,
    /// Instances that did not.
    pub instances_short: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its input tasks.
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate(schedule: &Schedule, tasks: &[Task]) -> Self {
        let super_period = schedule.super_period();
        let capacity = schedule.capacity();
        let occupied_slots = schedule.occupied_count();

        let utilization = if capacity == 0 {
            0.0
        } else {
            occupied_slots as f64 / capacity as f64
        };

        let utilization_by_processor = (0..schedule.processor_count())
            .map(|p| {
                if super_period == 0 {
                    0.0
                } else {
                    schedule.busy_on(p) as f64 / f64::from(super_period)
                }
            })
            .collect();

        // Units each instance received inside its own window.
        let mut received: HashMap<InstanceId, u32> = HashMap::new();
        for decision in schedule.decisions() {
            let Some(task) = tasks.get(decision.instance.task) else {
                continue;
            };
            let release = decision.instance.instance as u64 * u64::from(task.period);
            let time = u64::from(decision.time);
            if time >= release && time < release + u64::from(task.period) {
                *received.entry(decision.instance).or_insert(0) += 1;
            }
        }

        let mut instances_complete = 0;
        let mut instances_short = 0;
        for (index, task) in tasks.iter().enumerate() {
            if task.period == 0 {
                continue;
            }
            for instance in 0..(super_period / task.period) as usize {
                let units = received
                    .get(&InstanceId::new(index, instance))
                    .copied()
                    .unwrap_or(0);
                if units >= task.execution_time {
                    instances_complete += 1;
                } else {
                    instances_short += 1;
                }
            }
        }

        Self {
            occupied_slots,
            idle_slots: capacity - occupied_slots,
            utilization,
            utilization_by_processor,
            instances_complete,
            instances_short,
        }
    }

    /// Whether every instance is complete and utilization reaches
    /// `min_utilization`.
    pub fn meets_thresholds(&self, min_utilization: f64) -> bool {
        self.instances_short == 0 && self.utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchedulingDecision;
    use crate::scheduler::get_schedule;

    fn d(task: usize, instance: usize, time: u32) -> SchedulingDecision {
        SchedulingDecision::new(InstanceId::new(task, instance), time)
    }

    #[test]
    fn test_kpi_generated_schedule() {
        let mut tasks = vec![Task::new("A", 1, 2), Task::new("B", 2, 4)];
        let schedule = get_schedule(&mut tasks, 1, 4).unwrap();

        let kpi = ScheduleKpi::calculate(&schedule, &tasks);
        assert_eq!(kpi.occupied_slots, 4);
        assert_eq!(kpi.idle_slots, 0);
        assert!((kpi.utilization - 1.0).abs() < 1e-10);
        assert_eq!(kpi.instances_complete, 3);
        assert_eq!(kpi.instances_short, 0);
        assert!(kpi.meets_thresholds(1.0));
    }

    #[test]
    fn test_kpi_per_processor() {
        let tasks = vec![Task::new("A", 2, 2), Task::new("B", 1, 2)];
        let mut schedule = Schedule::new(2, 2);
        schedule.place(0, 0, d(0, 0, 0));
        schedule.place(1, 0, d(0, 0, 1));
        schedule.place(0, 1, d(1, 0, 0));

        let kpi = ScheduleKpi::calculate(&schedule, &tasks);
        assert_eq!(kpi.utilization_by_processor, vec![1.0, 0.5]);
        assert!((kpi.utilization - 0.75).abs() < 1e-10);
        assert_eq!(kpi.idle_slots, 1);
        assert_eq!(kpi.instances_complete, 2);
    }

    #[test]
    fn test_kpi_short_instances() {
        let tasks = vec![Task::new("A", 2, 2)];
        let mut schedule = Schedule::new(4, 1);
        schedule.place(0, 0, d(0, 0, 0));
        schedule.place(1, 0, d(0, 0, 1));
        schedule.place(2, 0, d(0, 1, 2));
        // Outside instance 0's window: does not count.
        schedule.place(3, 0, d(0, 0, 3));

        let kpi = ScheduleKpi::calculate(&schedule, &tasks);
        assert_eq!(kpi.instances_complete, 1);
        assert_eq!(kpi.instances_short, 1);
        assert!(!kpi.meets_thresholds(0.0));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Schedule::new(0, 0), &[]);
        assert_eq!(kpi.occupied_slots, 0);
        assert_eq!(kpi.idle_slots, 0);
        assert!((kpi.utilization - 0.0).abs() < 1e-10);
        assert!(kpi.utilization_by_processor.is_empty());
        assert!(kpi.meets_thresholds(0.0));
    }
}
