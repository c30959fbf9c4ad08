//! Periodic scheduling domain models.
//!
//! Describes what is being scheduled and the result of scheduling it.
//! No knowledge of flow algorithms.
//!
//! # Ownership
//!
//! | Type | Owned by | Refers to |
//! |------|----------|-----------|
//! | `Task` | caller's task list | its `TaskInstance`s |
//! | `TaskInstance` | `Task` | owning task via `InstanceId::task` |
//! | `SchedulingDecision` | `Schedule` grid (copy in `TaskInstance`) | instance via `InstanceId` |

mod decision;
mod schedule;
mod task;

pub use decision::SchedulingDecision;
pub use schedule::Schedule;
pub use task::{InstanceId, Task, TaskInstance, Time};
