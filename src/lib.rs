//! Multiprocessor scheduling of periodic tasks via maximum flow.
//!
//! Given periodic tasks (execution time `e`, period `p`, deadline = next
//! release) and `m` identical processors, builds a time-expanded flow network
//! over one super-period (LCM of the periods), solves it with Edmonds–Karp and
//! reads a `time × processor` grid of scheduling decisions back out.
//!
//! # Modules
//!
//! - **`graph`**: Generic directed graph with keyed edge payloads
//! - **`flow`**: Edmonds–Karp max-flow over a residual graph
//! - **`models`**: Domain types: `Task`, `TaskInstance`, `SchedulingDecision`,
//!   `Schedule`
//! - **`scheduler`**: Network builder, extractor, `FlowScheduler`, `ScheduleKpi`
//! - **`validation`**: Task-set limits, super-period (LCM), feasibility
//! - **`io`**: Task-file reader and schedule report writer
//! - **`generator`**: Random feasible task sets
//!
//! # Example
//!
//! ```
//! use u_flowsched::models::Task;
//! use u_flowsched::scheduler::get_schedule;
//!
//! let mut tasks = vec![Task::new("A", 1, 2), Task::new("B", 2, 4)];
//! let schedule = get_schedule(&mut tasks, 1, 4).unwrap();
//! assert_eq!(schedule.occupied_count(), 4);
//! ```
//!
//! # References
//!
//! - Horn (1974), "Some Simple Scheduling Algorithms"
//! - Edmonds & Karp (1972), "Theoretical Improvements in Algorithmic
//!   Efficiency for Network Flow Problems"

pub mod error;
pub mod flow;
pub mod generator;
pub mod graph;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::ScheduleError;
