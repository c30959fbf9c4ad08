//! Random feasible task-set generator.
//!
//! Draws periods from a fixed set (so the super-period stays bounded) and
//! execution times uniformly from `1..=period`, trimming or skipping tasks
//! that would push total demand past the utilization budget. Every
//! generated set passes aggregate feasibility for its processor count.

use rand::Rng;

use crate::models::{Task, Time};
use crate::validation::{lcm_all, processor_time, total_demand};

/// Generator for feasible periodic task sets.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_flowsched::generator::TaskSetGenerator;
/// use u_flowsched::validation::is_feasible;
///
/// let generator = TaskSetGenerator::new(2).with_max_tasks(6);
/// let tasks = generator.generate(&mut StdRng::seed_from_u64(7));
/// let s = generator.super_period().unwrap();
/// assert!(is_feasible(&tasks, 2, s));
/// ```
#[derive(Debug, Clone)]
pub struct TaskSetGenerator {
    processor_count: usize,
    periods: Vec<Time>,
    max_tasks: usize,
    target_utilization: f64,
}

impl TaskSetGenerator {
    /// Creates a generator for `processor_count` processors with periods
    /// `{2, 3, 4, 6, 12}` and up to `3 · processor_count + 1` tasks.
    pub fn new(processor_count: usize) -> Self {
        Self {
            processor_count,
            periods: vec![2, 3, 4, 6, 12],
            max_tasks: 3 * processor_count + 1,
            target_utilization: 1.0,
        }
    }

    /// Sets the candidate periods. Zero periods are ignored.
    pub fn with_periods(mut self, periods: Vec<Time>) -> Self {
        self.periods = periods.into_iter().filter(|&p| p > 0).collect();
        self
    }

    /// Sets the maximum number of tasks.
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Sets the normalized utilization budget, clamped to `0.0..=1.0`.
    pub fn with_target_utilization(mut self, target: f64) -> Self {
        self.target_utilization = target.clamp(0.0, 1.0);
        self
    }

    /// Super-period of every generated set: the LCM of the candidate periods.
    ///
    /// `None` if the LCM overflows.
    pub fn super_period(&self) -> Option<Time> {
        lcm_all(self.periods.iter().copied())
    }

    /// Runs the generator.
    ///
    /// Returns an empty set if there are no candidate periods or the
    /// super-period overflows.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Task> {
        let Some(super_period) = self.super_period() else {
            return Vec::new();
        };
        if self.periods.is_empty() || self.max_tasks == 0 {
            return Vec::new();
        }

        let capacity = processor_time(self.processor_count, super_period);
        let budget = (capacity as f64 * self.target_utilization).floor() as u64;
        let count = rng.random_range(1..=self.max_tasks);

        let mut tasks: Vec<Task> = Vec::with_capacity(count);
        for i in 0..count {
            let used = total_demand(&tasks, super_period);
            let period = self.periods[rng.random_range(0..self.periods.len())];
            let releases = u64::from(super_period / period);

            let room = (budget.saturating_sub(used) / releases).min(u64::from(period));
            if room == 0 {
                continue;
            }
            let execution_time = rng.random_range(1..=period).min(room as Time);
            tasks.push(Task::new(format!("T{i}"), execution_time, period));
        }

        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{is_feasible, validate_task_set, ValidationLimits};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_sets_are_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        for processors in 1..=5 {
            let generator = TaskSetGenerator::new(processors);
            for _ in 0..50 {
                let tasks = generator.generate(&mut rng);
                assert!(tasks.len() <= 3 * processors + 1);
                assert!(
                    validate_task_set(&tasks, processors, &ValidationLimits::default()).is_ok()
                );
            }
        }
    }

    #[test]
    fn test_target_utilization_respected() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = TaskSetGenerator::new(4)
            .with_target_utilization(0.5)
            .with_max_tasks(20);
        let s = generator.super_period().unwrap();
        for _ in 0..50 {
            let tasks = generator.generate(&mut rng);
            assert!(total_demand(&tasks, s) <= 2 * u64::from(s));
            assert!(is_feasible(&tasks, 2, s));
        }
    }

    #[test]
    fn test_custom_periods() {
        let generator = TaskSetGenerator::new(1).with_periods(vec![0, 5, 10]);
        assert_eq!(generator.super_period(), Some(10));
        let tasks = generator.generate(&mut StdRng::seed_from_u64(3));
        assert!(tasks.iter().all(|t| t.period == 5 || t.period == 10));
    }

    #[test]
    fn test_degenerate_generators() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(TaskSetGenerator::new(1)
            .with_periods(vec![])
            .generate(&mut rng)
            .is_empty());
        assert!(TaskSetGenerator::new(1)
            .with_max_tasks(0)
            .generate(&mut rng)
            .is_empty());
        assert!(TaskSetGenerator::new(2)
            .with_target_utilization(0.0)
            .generate(&mut rng)
            .is_empty());
    }
}
