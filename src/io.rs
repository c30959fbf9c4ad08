//! Task-file reader and schedule report writer.
//!
//! # Task file format
//!
//! ```text
//! 2            <- processor count
//! A,1,2        <- name,execution_time,period
//! B,1,4
//! ```
//!
//! Every line after the first must hold exactly three fields, so a blank
//! line is a field-count error. Names are taken verbatim; surrounding
//! whitespace is allowed around numbers. The parsed set is validated with
//! [`validate_task_set`] before it is returned.
//!
//! # Report format
//!
//! ```text
//! Time,Processor 1,Processor 2
//! 0,A,B
//! 1,,
//! ```

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::models::{Schedule, Task, Time};
use crate::validation::{super_period, validate_task_set, ValidationError, ValidationLimits};

const FIELD_SEPARATOR: char = ',';
const FIELDS_PER_LINE: usize = 3;

/// Errors from reading a task file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The input has no processor count line.
    #[error("the number of processors is not given")]
    MissingProcessorCount,
    /// The processor count is not a number.
    #[error("line 1: invalid processor count '{0}'")]
    InvalidProcessorCount(String),
    /// A task line has the wrong number of fields.
    #[error("line {line} has {found} fields, expected 3")]
    FieldCount { line: usize, found: usize },
    /// A numeric field is not a number.
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// The task set failed validation.
    #[error("invalid task set: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),
}

/// A validated task set ready for scheduling.
#[derive(Debug, Clone)]
pub struct TaskSet {
    /// Tasks in file order.
    pub tasks: Vec<Task>,
    /// Number of processors.
    pub processor_count: usize,
    /// LCM of all task periods.
    pub super_period: Time,
}

/// Parses and validates a task set from text.
///
/// # Errors
/// Returns a [`ParseError`] for malformed input or a task set that fails
/// validation against `limits`.
pub fn parse_task_set(input: &str, limits: &ValidationLimits) -> Result<TaskSet, ParseError> {
    let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (_, first) = lines.next().ok_or(ParseError::MissingProcessorCount)?;
    let processor_count: usize = first
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidProcessorCount(first.to_string()))?;

    let mut tasks = Vec::new();
    for (line, text) in lines {
        let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELDS_PER_LINE {
            return Err(ParseError::FieldCount {
                line,
                found: fields.len(),
            });
        }
        let execution_time = parse_field(line, "execution time", fields[1])?;
        let period = parse_field(line, "period", fields[2])?;
        tasks.push(Task::new(fields[0], execution_time, period));
    }

    validate_task_set(&tasks, processor_count, limits).map_err(ParseError::Validation)?;

    // Validation guarantees a bounded, non-overflowing LCM.
    let super_period = super_period(&tasks).unwrap_or(1);

    Ok(TaskSet {
        tasks,
        processor_count,
        super_period,
    })
}

/// Reads and validates a task set from a file.
///
/// # Errors
/// See [`parse_task_set`]; IO failures are reported as [`ParseError::Io`].
pub fn read_task_set(
    path: impl AsRef<Path>,
    limits: &ValidationLimits,
) -> Result<TaskSet, ParseError> {
    let input = std::fs::read_to_string(path)?;
    parse_task_set(&input, limits)
}

/// Renders a schedule as a comma-separated report.
///
/// Each occupied cell shows the task name resolved from `tasks`.
pub fn format_schedule(schedule: &Schedule, tasks: &[Task]) -> String {
    let mut out = String::from("Time");
    for p in 1..=schedule.processor_count() {
        let _ = write!(out, ",Processor {p}");
    }
    out.push('\n');

    for time in 0..schedule.super_period() {
        let _ = write!(out, "{time}");
        for cell in schedule.row(time) {
            out.push(FIELD_SEPARATOR);
            if let Some(task) = cell.as_ref().and_then(|d| d.task(tasks)) {
                out.push_str(&task.name);
            }
        }
        out.push('\n');
    }

    out
}

/// Writes the report from [`format_schedule`] to a file.
///
/// # Errors
/// Propagates IO failures.
pub fn write_schedule(
    schedule: &Schedule,
    tasks: &[Task],
    path: impl AsRef<Path>,
) -> std::io::Result<()> {
    std::fs::write(path, format_schedule(schedule, tasks))
}

fn parse_field(line: usize, field: &'static str, value: &str) -> Result<Time, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
