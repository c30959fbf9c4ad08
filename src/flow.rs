//! Maximum flow via Edmonds–Karp.
//!
//! Operates in place on a [`DirectedGraph`] whose edge payloads are residual
//! capacities. The solver is structural only: it never inspects what a node
//! represents, and the source and sink are passed in by the caller.
//!
//! # Algorithm
//! 1. Breadth-first search from source over edges with positive residual
//!    capacity, recording a parent per visited node. Stop as soon as the sink
//!    is reached.
//! 2. If the sink is unreachable, the flow is maximum.
//! 3. Otherwise push the path's bottleneck: decrement each forward edge and
//!    increment (or create) the matching reverse edge.
//!
//! # Complexity
//! O(V * E^2): BFS finds shortest augmenting paths, bounding the number of
//! augmentations by O(V * E).
//!
//! # Reference
//! Edmonds & Karp (1972), "Theoretical Improvements in Algorithmic Efficiency
//! for Network Flow Problems", J. ACM 19(2)

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Sub};

use tracing::debug;

use crate::graph::{DirectedGraph, GraphError};

/// Numeric type usable as a residual capacity.
///
/// `Default::default()` is taken as zero capacity.
pub trait Capacity:
    Copy + Ord + Default + Debug + Add<Output = Self> + Sub<Output = Self>
{
}

impl<T> Capacity for T where
    T: Copy + Ord + Default + Debug + Add<Output = T> + Sub<Output = T>
{
}

/// Outcome of a max-flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSummary<C> {
    /// Total flow pushed from source to sink.
    pub total_flow: C,
    /// Number of augmenting paths used.
    pub augmentations: usize,
}

/// Edmonds–Karp maximum-flow solver.
///
/// # Example
/// ```
/// use u_flowsched::flow::EdmondsKarp;
/// use u_flowsched::graph::DirectedGraph;
///
/// let mut g: DirectedGraph<char, u32> = DirectedGraph::new();
/// g.add_edge('s', 'a', 3).unwrap();
/// g.add_edge('s', 'b', 2).unwrap();
/// g.add_edge('a', 't', 2).unwrap();
/// g.add_edge('b', 't', 3).unwrap();
/// g.add_edge('a', 'b', 1).unwrap();
///
/// let summary = EdmondsKarp::new().max_flow(&mut g, &'s', &'t').unwrap();
/// assert_eq!(summary.total_flow, 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmondsKarp;

impl EdmondsKarp {
    /// Creates a solver.
    pub fn new() -> Self {
        Self
    }

    /// Saturates `graph` from `source` to `sink`, leaving it in residual form.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if `source` or `sink` is not in the graph.
    /// Other graph errors indicate an inconsistent graph and abort the run.
    pub fn max_flow<N, C>(
        &self,
        graph: &mut DirectedGraph<N, C>,
        source: &N,
        sink: &N,
    ) -> Result<FlowSummary<C>, GraphError>
    where
        N: Eq + Hash + Clone + Debug,
        C: Capacity,
    {
        for node in [source, sink] {
            if !graph.contains_node(node) {
                return Err(GraphError::NodeNotFound(format!("{node:?}")));
            }
        }

        let mut summary = FlowSummary {
            total_flow: C::default(),
            augmentations: 0,
        };

        if source == sink {
            return Ok(summary);
        }

        while let Some(path) = Self::find_augmenting_path(graph, source, sink)? {
            let bottleneck = Self::bottleneck(graph, &path)?;
            Self::augment(graph, &path, bottleneck)?;
            summary.total_flow = summary.total_flow + bottleneck;
            summary.augmentations += 1;
        }

        debug!(
            total_flow = ?summary.total_flow,
            augmentations = summary.augmentations,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "max flow reached"
        );

        Ok(summary)
    }

    /// BFS over positive-capacity edges. Returns the node sequence
    /// source..=sink, or `None` when the sink is unreachable.
    fn find_augmenting_path<N, C>(
        graph: &DirectedGraph<N, C>,
        source: &N,
        sink: &N,
    ) -> Result<Option<Vec<N>>, GraphError>
    where
        N: Eq + Hash + Clone + Debug,
        C: Capacity,
    {
        let zero = C::default();
        let mut parents: HashMap<N, Option<N>> = HashMap::new();
        let mut queue = VecDeque::new();

        parents.insert(source.clone(), None);
        queue.push_back(source.clone());

        while let Some(current) = queue.pop_front() {
            for edge in graph.outgoing_edges(&current)? {
                if *edge.value <= zero || parents.contains_key(edge.to) {
                    continue;
                }
                parents.insert(edge.to.clone(), Some(current.clone()));
                if edge.to == sink {
                    return Ok(Some(Self::build_path(&parents, sink)));
                }
                queue.push_back(edge.to.clone());
            }
        }

        Ok(None)
    }

    fn build_path<N>(parents: &HashMap<N, Option<N>>, sink: &N) -> Vec<N>
    where
        N: Eq + Hash + Clone,
    {
        let mut path = vec![sink.clone()];
        let mut current = sink;
        while let Some(Some(parent)) = parents.get(current) {
            path.push(parent.clone());
            current = parent;
        }
        path.reverse();
        path
    }

    fn bottleneck<N, C>(graph: &DirectedGraph<N, C>, path: &[N]) -> Result<C, GraphError>
    where
        N: Eq + Hash + Clone + Debug,
        C: Capacity,
    {
        let mut min: Option<C> = None;
        for pair in path.windows(2) {
            let capacity = *graph.edge(&pair[0], &pair[1])?;
            min = Some(min.map_or(capacity, |m| m.min(capacity)));
        }
        Ok(min.unwrap_or_default())
    }

    fn augment<N, C>(
        graph: &mut DirectedGraph<N, C>,
        path: &[N],
        amount: C,
    ) -> Result<(), GraphError>
    where
        N: Eq + Hash + Clone + Debug,
        C: Capacity,
    {
        for pair in path.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let forward = graph.edge_mut(from, to)?;
            *forward = *forward - amount;

            match graph.edge_mut(to, from) {
                Ok(reverse) => *reverse = *reverse + amount,
                Err(GraphError::EdgeNotFound { .. }) => {
                    graph.add_edge(to.clone(), from.clone(), amount)?
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classic CLRS Figure 26.1 network; max flow 23.
    fn clrs_network() -> DirectedGraph<&'static str, u32> {
        let mut g = DirectedGraph::new();
        g.add_node("s").unwrap();
        g.add_node("t").unwrap();
        g.add_edge("s", "v1", 16).unwrap();
        g.add_edge("s", "v2", 13).unwrap();
        g.add_edge("v2", "v1", 4).unwrap();
        g.add_edge("v1", "v3", 12).unwrap();
        g.add_edge("v3", "v2", 9).unwrap();
        g.add_edge("v2", "v4", 14).unwrap();
        g.add_edge("v4", "v3", 7).unwrap();
        g.add_edge("v3", "t", 20).unwrap();
        g.add_edge("v4", "t", 4).unwrap();
        g
    }

    #[test]
    fn test_clrs_max_flow() {
        let mut g = clrs_network();
        let summary = EdmondsKarp::new().max_flow(&mut g, &"s", &"t").unwrap();
        assert_eq!(summary.total_flow, 23);
        assert!(summary.augmentations >= 1);
    }

    #[test]
    fn test_residual_capacities_after_flow() {
        let mut g = clrs_network();
        let summary = EdmondsKarp::new().max_flow(&mut g, &"s", &"t").unwrap();

        // Flow conservation: reverse edges into the source sum to the total.
        let into_source: u32 = ["v1", "v2"]
            .iter()
            .filter_map(|n| g.try_get_edge(n, &"s"))
            .sum();
        assert_eq!(into_source, summary.total_flow);

        // Each original edge: residual + reverse = original capacity.
        let forward = *g.edge(&"s", &"v1").unwrap();
        let reverse = g.try_get_edge(&"v1", &"s").copied().unwrap_or(0);
        assert_eq!(forward + reverse, 16);

        // No further augmenting path exists.
        let again = EdmondsKarp::new().max_flow(&mut g, &"s", &"t").unwrap();
        assert_eq!(again.total_flow, 0);
        assert_eq!(again.augmentations, 0);
    }

    #[test]
    fn test_disconnected_sink() {
        let mut g: DirectedGraph<u8, u32> = DirectedGraph::new();
        g.add_node(0).unwrap();
        g.add_node(9).unwrap();
        g.add_edge(0, 1, 5).unwrap();
        let summary = EdmondsKarp::new().max_flow(&mut g, &0, &9).unwrap();
        assert_eq!(summary.total_flow, 0);
        assert_eq!(*g.edge(&0, &1).unwrap(), 5);
    }

    #[test]
    fn test_bottleneck_limits_single_path() {
        let mut g: DirectedGraph<u8, u32> = DirectedGraph::new();
        g.add_edge(0, 1, 10).unwrap();
        g.add_edge(1, 2, 3).unwrap();
        g.add_edge(2, 3, 8).unwrap();
        let summary = EdmondsKarp::new().max_flow(&mut g, &0, &3).unwrap();
        assert_eq!(summary.total_flow, 3);
        assert_eq!(summary.augmentations, 1);
        assert_eq!(*g.edge(&0, &1).unwrap(), 7);
        assert_eq!(*g.edge(&1, &2).unwrap(), 0);
        assert_eq!(*g.edge(&2, &1).unwrap(), 3);
    }

    #[test]
    fn test_flow_undone_through_reverse_edge() {
        // A greedy path s-a-b-t must be partially undone to reach flow 2.
        let mut g: DirectedGraph<char, u32> = DirectedGraph::new();
        g.add_edge('s', 'a', 1).unwrap();
        g.add_edge('s', 'b', 1).unwrap();
        g.add_edge('a', 'b', 1).unwrap();
        g.add_edge('a', 't', 1).unwrap();
        g.add_edge('b', 't', 1).unwrap();
        let summary = EdmondsKarp::new().max_flow(&mut g, &'s', &'t').unwrap();
        assert_eq!(summary.total_flow, 2);
    }

    #[test]
    fn test_missing_terminal_is_error() {
        let mut g: DirectedGraph<u8, u32> = DirectedGraph::new();
        g.add_edge(0, 1, 1).unwrap();
        assert!(matches!(
            EdmondsKarp::new().max_flow(&mut g, &0, &7),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_signed_capacities() {
        let mut g: DirectedGraph<u8, i64> = DirectedGraph::new();
        g.add_edge(0, 1, 4).unwrap();
        g.add_edge(1, 2, -1).unwrap(); // non-positive: never traversed
        g.add_edge(0, 2, 2).unwrap();
        let summary = EdmondsKarp::new().max_flow(&mut g, &0, &2).unwrap();
        assert_eq!(summary.total_flow, 2);
    }
}
