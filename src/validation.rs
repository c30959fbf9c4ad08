//! Input validation for periodic task sets.
//!
//! Checks a task set before scheduling. Detects:
//! - Names that are too long
//! - Non-positive execution times or periods, or periods above the limit
//! - Execution times larger than the period
//! - Too many tasks or processors outside the allowed range
//! - Super-periods above the limit
//! - Aggregate infeasibility: `Σ (S / p_i) · e_i > m · S`
//!
//! The flow scheduler assumes a validated, feasible task set.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use serde::{Deserialize, Serialize};

use crate::models::{Task, Time};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Task name exceeds the length limit.
    NameTooLong,
    /// Execution time is zero.
    InvalidExecutionTime,
    /// Period is zero or above the limit.
    InvalidPeriod,
    /// Execution time exceeds the period.
    ExecutionExceedsPeriod,
    /// More tasks than allowed.
    TooManyTasks,
    /// Processor count outside the allowed range.
    InvalidProcessorCount,
    /// Super-period above the limit (or overflowing).
    SuperPeriodTooLarge,
    /// Total demand exceeds total processor time.
    Infeasible,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Bounds applied by [`validate_task_set`].
///
/// Deserializes with missing fields taken from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Maximum task name length, in characters.
    pub max_name_length: usize,
    /// Maximum task period.
    pub max_period: Time,
    /// Maximum super-period.
    pub max_super_period: Time,
    /// Minimum processor count.
    pub min_processors: usize,
    /// Maximum processor count.
    pub max_processors: usize,
    /// Maximum number of tasks.
    pub max_tasks: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_name_length: 15,
            max_period: 200,
            max_super_period: 200,
            min_processors: 1,
            max_processors: 5,
            max_tasks: 60,
        }
    }
}

impl ValidationLimits {
    /// Limits that only reject structurally invalid input.
    pub fn unbounded() -> Self {
        Self {
            max_name_length: usize::MAX,
            max_period: Time::MAX,
            max_super_period: Time::MAX,
            min_processors: 1,
            max_processors: usize::MAX,
            max_tasks: usize::MAX,
        }
    }
}

/// Validates a task set for `processor_count` processors.
///
/// Checks:
/// 1. Processor count within limits
/// 2. Task count within limits
/// 3. Per task: name length, execution time ≥ 1, 1 ≤ period ≤ max,
///    execution time ≤ period
/// 4. Super-period (LCM of periods) within limits
/// 5. Aggregate feasibility over one super-period
///
/// Feasibility is only checked when every task passed step 3 and the
/// super-period is valid.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_task_set(
    tasks: &[Task],
    processor_count: usize,
    limits: &ValidationLimits,
) -> ValidationResult {
    let mut errors = Vec::new();

    if processor_count < limits.min_processors || processor_count > limits.max_processors {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidProcessorCount,
            format!(
                "Processor count must be between {} and {}, got {processor_count}",
                limits.min_processors, limits.max_processors
            ),
        ));
    }

    if tasks.len() > limits.max_tasks {
        errors.push(ValidationError::new(
            ValidationErrorKind::TooManyTasks,
            format!("{} tasks exceed the limit of {}", tasks.len(), limits.max_tasks),
        ));
    }

    let mut tasks_ok = true;
    for task in tasks {
        if task.name.chars().count() > limits.max_name_length {
            errors.push(ValidationError::new(
                ValidationErrorKind::NameTooLong,
                format!(
                    "Task name '{}' is longer than {} characters",
                    task.name, limits.max_name_length
                ),
            ));
        }
        if task.execution_time == 0 {
            tasks_ok = false;
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidExecutionTime,
                format!("Task '{}' has an execution time of 0", task.name),
            ));
        }
        if task.period == 0 || task.period > limits.max_period {
            tasks_ok = false;
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPeriod,
                format!(
                    "Task '{}' has a period of {} (allowed 1..={})",
                    task.name, task.period, limits.max_period
                ),
            ));
        } else if task.execution_time > task.period {
            tasks_ok = false;
            errors.push(ValidationError::new(
                ValidationErrorKind::ExecutionExceedsPeriod,
                format!(
                    "Task '{}' has an execution time larger than its period",
                    task.name
                ),
            ));
        }
    }

    if tasks_ok {
        match super_period(tasks).filter(|&s| s <= limits.max_super_period) {
            Some(s) => {
                if !is_feasible(tasks, processor_count, s) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Infeasible,
                        format!(
                            "Task set needs {} units but {processor_count} processors provide {}",
                            total_demand(tasks, s),
                            processor_time(processor_count, s)
                        ),
                    ));
                }
            }
            None => errors.push(ValidationError::new(
                ValidationErrorKind::SuperPeriodTooLarge,
                format!(
                    "Super-period is greater than {}",
                    limits.max_super_period
                ),
            )),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Least common multiple of all task periods.
///
/// Returns `Some(1)` for an empty set, `None` if a period is zero or the
/// result overflows.
pub fn super_period(tasks: &[Task]) -> Option<Time> {
    lcm_all(tasks.iter().map(|t| t.period))
}

/// Least common multiple of `periods`; `Some(1)` when empty, `None` on a
/// zero period or overflow.
pub fn lcm_all(periods: impl IntoIterator<Item = Time>) -> Option<Time> {
    periods.into_iter().try_fold(1, lcm)
}

/// Total execution time required over `super_period`:
/// `Σ (super_period / p_i) · e_i`. Tasks with a zero period contribute nothing.
pub fn total_demand(tasks: &[Task], super_period: Time) -> u64 {
    tasks
        .iter()
        .filter(|t| t.period > 0)
        .map(|t| u64::from(super_period / t.period) * u64::from(t.execution_time))
        .sum()
}

/// Whether total demand fits in `processor_count · super_period`.
pub fn is_feasible(tasks: &[Task], processor_count: usize, super_period: Time) -> bool {
    total_demand(tasks, super_period) <= processor_time(processor_count, super_period)
}

/// Processor time available over `super_period`: `processor_count · super_period`,
/// saturating at `u64::MAX`.
pub fn processor_time(processor_count: usize, super_period: Time) -> u64 {
    u64::try_from(processor_count)
        .unwrap_or(u64::MAX)
        .saturating_mul(u64::from(super_period))
}

fn lcm(a: Time, b: Time) -> Option<Time> {
    if a == 0 || b == 0 {
        return None;
    }
    (a / gcd(a, b)).checked_mul(b)
}

fn gcd(mut a: Time, mut b: Time) -> Time {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
