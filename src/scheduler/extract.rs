//! Reads a saturated flow network back into a schedule grid.
//!
//! # Algorithm
//! 1. Every instance → time edge whose residual capacity dropped to zero
//!    carried one unit of flow: the instance executes at that time.
//! 2. Decisions are grouped per time unit and sorted by [`InstanceId`].
//! 3. Each group is packed into processor columns `0..m`. Overflow beyond `m`
//!    is dropped (a correct network never produces it).
//! 4. Each instance's decisions are numbered in time order and copied into
//!    the instance.

use std::collections::HashMap;

use tracing::warn;

use super::network::{FlowNetwork, FlowNode};
use crate::graph::GraphError;
use crate::models::{InstanceId, Schedule, SchedulingDecision, Task, Time};

/// Collects unsequenced decisions per time unit from a solved network.
///
/// The outer vector has one entry per time unit in `[0, super_period)`;
/// each entry is sorted by instance.
///
/// # Errors
/// Propagates graph errors from adjacency traversal.
pub fn extract_raw_schedule(
    network: &FlowNetwork,
) -> Result<Vec<Vec<SchedulingDecision>>, GraphError> {
    let mut raw: Vec<Vec<SchedulingDecision>> = vec![Vec::new(); network.super_period as usize];

    for node in network.graph.nodes() {
        let FlowNode::Instance(id) = node else {
            continue;
        };
        for edge in network.graph.outgoing_edges(node)? {
            if let FlowNode::TimeSlot(time) = *edge.to {
                if *edge.value == 0 {
                    if let Some(slot) = raw.get_mut(time as usize) {
                        slot.push(SchedulingDecision::new(*id, time));
                    }
                }
            }
        }
    }

    for slot in &mut raw {
        slot.sort_by_key(|d| d.instance);
    }

    Ok(raw)
}

/// Packs per-time decisions into processor columns.
///
/// Decisions beyond `processor_count` at a time unit are dropped.
pub fn pack(raw: Vec<Vec<SchedulingDecision>>, processor_count: usize) -> Schedule {
    let mut schedule = Schedule::new(raw.len() as Time, processor_count);
    let mut dropped = 0usize;

    for (time, decisions) in raw.into_iter().enumerate() {
        for (processor, decision) in decisions.into_iter().enumerate() {
            if processor >= processor_count {
                dropped += 1;
                continue;
            }
            schedule.place(time as Time, processor, decision.with_processor(processor));
        }
    }

    if dropped > 0 {
        warn!(dropped, processor_count, "dropped decisions exceeding processor count");
    }

    schedule
}

/// Numbers each instance's decisions in time order and records them on the
/// instances in `tasks`.
pub fn sequence(schedule: &mut Schedule, tasks: &mut [Task]) {
    let mut completed: HashMap<InstanceId, Time> = HashMap::new();

    // Row-major order is time order.
    for decision in schedule.cells_mut() {
        let count = completed.entry(decision.instance).or_insert(0);
        decision.completed = Some(*count);
        *count += 1;

        if let Some(instance) = tasks
            .get_mut(decision.instance.task)
            .and_then(|t| t.instance_mut(decision.instance.instance))
        {
            instance.push_decision(*decision);
        }
    }
}
