//! Max-flow scheduler and KPI evaluation.
//!
//! Turns a periodic task set into a `time × processor` grid for one
//! super-period.
//!
//! # Algorithm
//!
//! `FlowScheduler` builds a time-expanded flow network (`network`), saturates
//! it with Edmonds–Karp, then reads the saturated instance → time edges back
//! into a grid (`extract`). For implicit-deadline sets whose aggregate demand
//! fits `m · S` the result is a complete preemptive, migrating schedule.
//!
//! # KPI
//!
//! `ScheduleKpi` computes grid metrics: occupied and idle slots, overall and
//! per-processor utilization, complete and short instances.
//!
//! # References
//!
//! - Horn (1974), "Some Simple Scheduling Algorithms"
//! - Liu (2000), "Real-Time Systems", Ch. 6

mod extract;
mod flow;
mod kpi;
mod network;

pub use extract::{extract_raw_schedule, pack, sequence};
pub use flow::{get_schedule, FlowScheduler, ScheduleRequest};
pub use kpi::ScheduleKpi;
pub use network::{FlowCapacity, FlowNetwork, FlowNode};
