//! Time-expanded flow network for periodic scheduling.
//!
//! # Construction
//!
//! ```text
//!            e_i                 1                    m
//! Source ────────▶ Instance ────────▶ TimeSlot(t) ────────▶ Sink
//!                  (one per release)  (t in [available, deadline))
//! ```
//!
//! - source → instance: capacity = task execution time
//! - instance → time slot: capacity 1 for each slot in the instance window
//! - time slot → sink: capacity = processor count, for every slot in
//!   `[0, super_period)`
//!
//! A flow saturating every source edge is a feasible preemptive schedule.
//!
//! # Reference
//! Horn (1974), "Some Simple Scheduling Algorithms", Naval Research
//! Logistics Quarterly 21(1)

use std::collections::HashSet;

use tracing::debug;

use crate::error::ScheduleError;
use crate::graph::DirectedGraph;
use crate::models::{InstanceId, Task, Time};

/// Residual capacity on network edges.
pub type FlowCapacity = u32;

/// Node identity in the scheduling network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowNode {
    /// Flow origin.
    Source,
    /// Flow destination.
    Sink,
    /// One task instance.
    Instance(InstanceId),
    /// One discrete time unit.
    TimeSlot(Time),
}

/// A scheduling flow network together with its terminals.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    /// The (residual) graph.
    pub graph: DirectedGraph<FlowNode, FlowCapacity>,
    /// Flow origin.
    pub source: FlowNode,
    /// Flow destination.
    pub sink: FlowNode,
    /// Number of time units covered.
    pub super_period: Time,
}

impl FlowNetwork {
    /// Builds the network for `tasks` on `processor_count` processors.
    ///
    /// Regenerates every task's instances for `super_period` as a side effect.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidProcessorCount`] if `processor_count` is zero
    ///   or exceeds the capacity type.
    /// - [`ScheduleError::InvalidSuperPeriod`] if `super_period` is zero.
    /// - Instance generation errors from [`Task::create_instances`].
    pub fn build(
        tasks: &mut [Task],
        processor_count: usize,
        super_period: Time,
    ) -> Result<Self, ScheduleError> {
        let processor_capacity = FlowCapacity::try_from(processor_count)
            .ok()
            .filter(|&c| c > 0)
            .ok_or(ScheduleError::InvalidProcessorCount(processor_count))?;
        if super_period == 0 {
            return Err(ScheduleError::InvalidSuperPeriod(super_period));
        }

        let source = FlowNode::Source;
        let sink = FlowNode::Sink;
        let mut graph = DirectedGraph::new();
        graph.add_node(source)?;
        graph.add_node(sink)?;

        let mut added: HashSet<FlowNode> = HashSet::new();

        for (index, task) in tasks.iter_mut().enumerate() {
            let execution_time = task.execution_time;
            for instance in task.create_instances(index, super_period)? {
                let node = FlowNode::Instance(instance.id);
                if added.insert(node) {
                    graph.add_node(node)?;
                }
                graph.add_edge(source, node, execution_time)?;

                for time in instance.available..instance.deadline() {
                    let slot = FlowNode::TimeSlot(time);
                    if added.insert(slot) {
                        graph.add_node(slot)?;
                    }
                    graph.add_edge(node, slot, 1)?;
                }
            }
        }

        for time in 0..super_period {
            let slot = FlowNode::TimeSlot(time);
            if added.insert(slot) {
                graph.add_node(slot)?;
            }
            graph.add_edge(slot, sink, processor_capacity)?;
        }

        debug!(
            tasks = tasks.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            super_period,
            processor_count,
            "built flow network"
        );

        Ok(Self {
            graph,
            source,
            sink,
            super_period,
        })
    }

    /// Total capacity leaving the source: the execution demand of one super-period.
    pub fn demand(&self) -> u64 {
        self.graph
            .outgoing_edges(&self.source)
            .map(|edges| edges.map(|e| u64::from(*e.value)).sum::<u64>())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tasks() -> Vec<Task> {
        vec![Task::new("A", 1, 2), Task::new("B", 1, 4)]
    }

    #[test]
    fn test_network_shape() {
        let mut tasks = two_tasks();
        let net = FlowNetwork::build(&mut tasks, 1, 4).unwrap();

        // source, sink, 3 instances, 4 time slots
        assert_eq!(net.graph.node_count(), 9);
        // 3 source edges + (2 + 2 + 4) window edges + 4 sink edges
        assert_eq!(net.graph.edge_count(), 15);

        let first: Vec<FlowNode> = net.graph.nodes().take(2).copied().collect();
        assert_eq!(first, vec![FlowNode::Source, FlowNode::Sink]);
    }

    #[test]
    fn test_network_capacities() {
        let mut tasks = vec![Task::new("A", 2, 3)];
        let net = FlowNetwork::build(&mut tasks, 2, 6).unwrap();
        let g = &net.graph;

        let i0 = FlowNode::Instance(InstanceId::new(0, 0));
        let i1 = FlowNode::Instance(InstanceId::new(0, 1));
        assert_eq!(g.edge(&FlowNode::Source, &i0), Ok(&2));
        assert_eq!(g.edge(&FlowNode::Source, &i1), Ok(&2));

        for t in 0..3 {
            assert_eq!(g.edge(&i0, &FlowNode::TimeSlot(t)), Ok(&1));
            assert!(!g.contains_edge(&i1, &FlowNode::TimeSlot(t)));
        }
        for t in 3..6 {
            assert_eq!(g.edge(&i1, &FlowNode::TimeSlot(t)), Ok(&1));
        }
        for t in 0..6 {
            assert_eq!(g.edge(&FlowNode::TimeSlot(t), &FlowNode::Sink), Ok(&2));
        }
        assert_eq!(net.demand(), 4);
    }

    #[test]
    fn test_network_covers_idle_slots() {
        let mut tasks = vec![Task::new("A", 1, 3)];
        let net = FlowNetwork::build(&mut tasks, 1, 3).unwrap();
        assert!(net.graph.contains_node(&FlowNode::TimeSlot(2)));
        assert!(!net.graph.contains_node(&FlowNode::TimeSlot(3)));

        // Without tasks every slot still reaches the sink.
        let mut tasks: Vec<Task> = Vec::new();
        let net = FlowNetwork::build(&mut tasks, 1, 5).unwrap();
        for t in 0..5 {
            assert!(net.graph.contains_edge(&FlowNode::TimeSlot(t), &FlowNode::Sink));
        }
        assert_eq!(net.demand(), 0);
    }

    #[test]
    fn test_network_regenerates_instances() {
        let mut tasks = two_tasks();
        FlowNetwork::build(&mut tasks, 1, 8).unwrap();
        assert_eq!(tasks[0].instances().len(), 4);
        FlowNetwork::build(&mut tasks, 1, 4).unwrap();
        assert_eq!(tasks[0].instances().len(), 2);
        assert_eq!(tasks[1].instances().len(), 1);
    }

    #[test]
    fn test_network_rejects_bad_config() {
        let mut tasks = two_tasks();
        assert!(matches!(
            FlowNetwork::build(&mut tasks, 0, 4),
            Err(ScheduleError::InvalidProcessorCount(0))
        ));
        assert!(matches!(
            FlowNetwork::build(&mut tasks, 1, 0),
            Err(ScheduleError::InvalidSuperPeriod(0))
        ));
        assert!(matches!(
            FlowNetwork::build(&mut tasks, 1, 6),
            Err(ScheduleError::SuperPeriodNotMultiple { .. })
        ));
    }
}
