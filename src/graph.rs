//! Generic directed graph with keyed edge payloads.
//!
//! Nodes are plain values usable as map keys. Each node owns an outgoing
//! adjacency list, and edge payloads live in a separate map keyed by the
//! ordered `(from, to)` pair, so lookups and updates are O(1) amortized
//! without the node type carrying any edge state.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.1

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Graph misuse errors.
///
/// Node identities are rendered with `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge from a node to itself was requested.
    #[error("self-loop on node {0} is not allowed")]
    SelfLoop(String),
    /// The node was already registered.
    #[error("node {0} is already in the graph")]
    DuplicateNode(String),
    /// The ordered pair already has an edge.
    #[error("edge from {from} to {to} is already in the graph")]
    DuplicateEdge { from: String, to: String },
    /// The ordered pair has no edge.
    #[error("edge from {from} to {to} is not in the graph")]
    EdgeNotFound { from: String, to: String },
    /// The node is not registered.
    #[error("node {0} is not in the graph")]
    NodeNotFound(String),
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a, N, E> {
    /// Source node.
    pub from: &'a N,
    /// Destination node.
    pub to: &'a N,
    /// Edge payload.
    pub value: &'a E,
}

/// Directed graph over node identities `N` with edge payloads `E`.
///
/// Self-loops and parallel edges are rejected. Adding an edge implicitly
/// registers either endpoint that is not yet a node, but [`add_node`]
/// on an existing node is an error rather than a no-op.
///
/// [`add_node`]: DirectedGraph::add_node
///
/// # Example
/// ```
/// use u_flowsched::graph::DirectedGraph;
///
/// let mut g: DirectedGraph<&str, u32> = DirectedGraph::new();
/// g.add_edge("a", "b", 3).unwrap();
/// *g.edge_mut(&"a", &"b").unwrap() -= 1;
/// assert_eq!(g.edge(&"a", &"b"), Ok(&2));
/// assert_eq!(g.node_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Outgoing neighbors per node, oldest first.
    adjacency: HashMap<N, Vec<N>>,
    /// Node identities in insertion order.
    order: Vec<N>,
    edges: HashMap<(N, N), E>,
}

impl<N, E> DirectedGraph<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
            order: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Registers a node with no outgoing edges.
    ///
    /// # Errors
    /// [`GraphError::DuplicateNode`] if the node is already present.
    pub fn add_node(&mut self, node: N) -> Result<(), GraphError> {
        if self.adjacency.contains_key(&node) {
            return Err(GraphError::DuplicateNode(format!("{node:?}")));
        }
        self.insert_node(node);
        Ok(())
    }

    /// Adds an edge carrying `value`.
    ///
    /// Endpoints that are not yet nodes are registered first.
    ///
    /// # Errors
    /// [`GraphError::SelfLoop`] if `from == to`, [`GraphError::DuplicateEdge`]
    /// if the ordered pair already has an edge.
    pub fn add_edge(&mut self, from: N, to: N, value: E) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(format!("{from:?}")));
        }
        let key = (from.clone(), to.clone());
        if self.edges.contains_key(&key) {
            return Err(GraphError::DuplicateEdge {
                from: format!("{from:?}"),
                to: format!("{to:?}"),
            });
        }
        self.edges.insert(key, value);

        if !self.adjacency.contains_key(&from) {
            self.insert_node(from.clone());
        }
        if !self.adjacency.contains_key(&to) {
            self.insert_node(to.clone());
        }
        if let Some(list) = self.adjacency.get_mut(&from) {
            list.push(to);
        }
        Ok(())
    }

    /// Returns the payload of an edge.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn edge(&self, from: &N, to: &N) -> Result<&E, GraphError> {
        self.edges
            .get(&(from.clone(), to.clone()))
            .ok_or_else(|| edge_not_found(from, to))
    }

    /// Returns a mutable reference to the payload of an edge.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn edge_mut(&mut self, from: &N, to: &N) -> Result<&mut E, GraphError> {
        self.edges
            .get_mut(&(from.clone(), to.clone()))
            .ok_or_else(|| edge_not_found(from, to))
    }

    /// Overwrites the payload of an existing edge. Topology is unchanged.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn set_edge(&mut self, from: &N, to: &N, value: E) -> Result<(), GraphError> {
        *self.edge_mut(from, to)? = value;
        Ok(())
    }

    /// Non-failing edge probe.
    pub fn try_get_edge(&self, from: &N, to: &N) -> Option<&E> {
        self.edges.get(&(from.clone(), to.clone()))
    }

    /// Whether the node is registered.
    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Whether the ordered pair has an edge.
    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.edges.contains_key(&(from.clone(), to.clone()))
    }

    /// Outgoing edges of `node`, most recently added first.
    ///
    /// The sequence is lazy and each call starts a fresh walk.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if the node is not registered.
    pub fn outgoing_edges<'a>(
        &'a self,
        node: &'a N,
    ) -> Result<impl Iterator<Item = Edge<'a, N, E>> + 'a, GraphError> {
        let list = self
            .adjacency
            .get(node)
            .ok_or_else(|| GraphError::NodeNotFound(format!("{node:?}")))?;

        Ok(list.iter().rev().filter_map(move |to| {
            self.edges
                .get(&(node.clone(), to.clone()))
                .map(|value| Edge { from: node, to, value })
        }))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.order.iter()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn insert_node(&mut self, node: N) {
        self.order.push(node.clone());
        self.adjacency.insert(node, Vec::new());
    }
}

impl<N, E> Default for DirectedGraph<N, E>
where
    N: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

fn edge_not_found<N: Debug>(from: &N, to: &N) -> GraphError {
    GraphError::EdgeNotFound {
        from: format!("{from:?}"),
        to: format!("{to:?}"),
    }
}
