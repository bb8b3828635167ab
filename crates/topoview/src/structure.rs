//! Adjacency structure built from a topology's flat edge list.
//!
//! [`TopologyGraph`] indexes a [`Topology`] for traversal:
//! - node storage by id, in declaration order
//! - edge storage, in declaration order
//! - incoming and outgoing edge indices per node
//!
//! Edges whose endpoints name no node are skipped with a warning, so a
//! programmatically built topology with dangling references still produces
//! a usable graph.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};

use topoview_core::{
    identifier::Id,
    topology::{Node, Topology},
};

/// Index of an edge inside a [`TopologyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    fn new(index: usize) -> Self {
        EdgeIndex(index)
    }

    /// Position of the edge in the graph's edge list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    id: Id,
    source: Id,
    target: Id,
}

impl GraphEdge {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }
}

/// Directed graph over the nodes of a [`Topology`].
///
/// Self-loops and parallel edges are kept; outgoing edges of a node are
/// reported in the order they were declared.
#[derive(Debug)]
pub struct TopologyGraph<'a> {
    nodes: IndexMap<Id, &'a Node>,
    edges: Vec<GraphEdge>,
    incoming_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl<'a> TopologyGraph<'a> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        TopologyGraph {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            incoming_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    /// Builds the adjacency list of `topology`.
    pub fn from_topology(topology: &'a Topology) -> Self {
        let mut graph = Self::new();
        for node in topology.nodes() {
            graph.add_node(node);
        }

        for edge in topology.edges() {
            if !graph.contains_node(edge.source()) || !graph.contains_node(edge.target()) {
                warn!(
                    edge = edge.id().to_string(),
                    source = edge.source().to_string(),
                    target = edge.target().to_string();
                    "Skipping edge with unknown endpoint"
                );
                continue;
            }
            graph.add_edge(edge.id(), edge.source(), edge.target());
        }

        debug!(
            nodes = graph.nodes_count(),
            edges = graph.edges.len();
            "Topology graph built"
        );

        graph
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: Id) -> Option<&'a Node> {
        self.nodes.get(&id).copied()
    }

    /// Returns the first declared node.
    pub fn first_node(&self) -> Option<&'a Node> {
        self.nodes.first().map(|(_, node)| *node)
    }

    /// Returns all nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.values().copied()
    }

    /// Returns the number of nodes.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a node with the given id exists.
    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the edge at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn edge_unchecked(&self, idx: EdgeIndex) -> GraphEdge {
        self.edges[idx.0]
    }

    /// Returns all edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.edges.iter().copied()
    }

    /// Returns nodes without incoming edges, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes
            .iter()
            .filter(|(node_id, _)| !self.incoming_edges.contains_key(*node_id))
            .map(|(_, node)| *node)
    }

    /// Returns the targets of the outgoing edges of `source_id`, in edge order.
    ///
    /// Empty when the node has no outgoing edges or does not exist.
    pub fn outgoing_nodes(&self, source_id: Id) -> impl Iterator<Item = &'a Node> + '_ {
        self.outgoing_edges
            .get(&source_id)
            .into_iter()
            .flatten()
            .filter_map(|idx| self.node(self.edges[idx.0].target))
    }

    /// Adds a node. A node with the same id replaces the previous one.
    pub fn add_node(&mut self, node: &'a Node) {
        self.nodes.insert(node.id(), node);
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Panics
    /// Panics in debug builds if either endpoint is missing.
    pub fn add_edge(&mut self, id: Id, source_id: Id, target_id: Id) -> EdgeIndex {
        debug_assert!(
            self.nodes.contains_key(&source_id),
            "Adding edge {id}: source node {source_id} does not exist",
        );
        debug_assert!(
            self.nodes.contains_key(&target_id),
            "Adding edge {id}: target node {target_id} does not exist",
        );

        self.edges.push(GraphEdge {
            id,
            source: source_id,
            target: target_id,
        });

        let idx = EdgeIndex::new(self.edges.len() - 1);
        self.outgoing_edges.entry(source_id).or_default().push(idx);
        self.incoming_edges.entry(target_id).or_default().push(idx);
        idx
    }
}

impl Default for TopologyGraph<'_> {
    fn default() -> Self {
        Self::new()
    }
}
