//! The topology data model: nodes, edges and their JSON interchange format.
//!
//! A [`Topology`] is an ordered node set plus an ordered edge list. Order is
//! significant: the first node becomes the root of the tree view and edge
//! order decides the order of siblings.
//!
//! # Interchange format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "0", "label": "Node 1", "group": 1 },
//!     { "id": "1", "label": "Node 2", "group": 1, "descriptions": ["eth0", "eth1"] }
//!   ],
//!   "edges": [ { "source": "0", "target": "1" } ]
//! }
//! ```
//!
//! Edges without an `id` are named `"{index}-edge"` after their position in
//! the edge list.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::identifier::Id;

/// Whether a node stands for one device or for a whole group of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Individual,
    /// An aggregate node replacing `members` nodes of the same group.
    Aggregate { members: usize },
}

/// A topology node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    group: u32,
    descriptions: Vec<String>,
    kind: NodeKind,
}

impl Node {
    /// Creates an individual node without descriptions.
    pub fn new(id: Id, label: impl Into<String>, group: u32) -> Self {
        Self {
            id,
            label: label.into(),
            group,
            descriptions: Vec::new(),
            kind: NodeKind::Individual,
        }
    }

    /// Creates the aggregate node standing for `members` nodes of `group`.
    pub fn aggregate(group: u32, members: usize) -> Self {
        Self {
            id: Id::for_group(group),
            label: format!("Group {group}"),
            group,
            descriptions: Vec::new(),
            kind: NodeKind::Aggregate { members },
        }
    }

    /// Returns the node with `descriptions` attached (builder style).
    pub fn with_descriptions(mut self, descriptions: Vec<String>) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    /// Description rows drawn as a table under the node.
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
}

impl Edge {
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self { id, source, target }
    }

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

/// Byte range in the source text that an error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    offset: usize,
    len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Error produced while reading a topology file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    span: Option<Span>,
    help: Option<String>,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            help: None,
        }
    }

    fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location in the source, when it is known.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Ids and endpoints stay raw so errors can point at the exact occurrence.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTopology<'a> {
    #[serde(default, borrow)]
    nodes: Vec<RawNode<'a>>,
    #[serde(default, borrow)]
    edges: Vec<RawEdge<'a>>,
}

#[derive(Debug, Deserialize)]
struct RawNode<'a> {
    #[serde(borrow)]
    id: &'a RawValue,
    label: String,
    #[serde(default)]
    group: u32,
    #[serde(default)]
    descriptions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEdge<'a> {
    #[serde(borrow)]
    source: &'a RawValue,
    #[serde(borrow)]
    target: &'a RawValue,
    #[serde(default)]
    id: Option<String>,
}

/// An ordered set of nodes and the edges between them.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<Id, usize>,
}

impl Topology {
    /// Creates an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a topology from its JSON interchange format.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed JSON, duplicate node ids, and
    /// edges whose endpoints name no declared node.
    ///
    /// # Examples
    ///
    /// ```
    /// use topoview_core::topology::Topology;
    ///
    /// let topology = Topology::from_json(r#"{
    ///     "nodes": [
    ///         {"id": "a", "label": "A", "group": 1},
    ///         {"id": "b", "label": "B", "group": 2}
    ///     ],
    ///     "edges": [{"source": "a", "target": "b"}]
    /// }"#).unwrap();
    ///
    /// assert_eq!(topology.nodes().len(), 2);
    /// assert_eq!(topology.edges()[0].id(), "0-edge");
    /// ```
    pub fn from_json(source: &str) -> Result<Self, ParseError> {
        let raw: RawTopology = serde_json::from_str(source).map_err(|err| {
            let offset = offset_of(source, err.line(), err.column());
            ParseError::new(format!("invalid topology JSON: {err}"))
                .with_span(Span::new(offset, 1))
        })?;

        let mut topology = Topology::new();
        for raw_node in raw.nodes {
            let (name, span) = located_string(source, raw_node.id, "node id")?;
            let id = Id::new(&name);
            if topology.contains(id) {
                return Err(ParseError::new(format!("duplicate node id `{name}`"))
                    .with_span(span)
                    .with_help("node ids must be unique within a topology"));
            }
            topology.add_node(
                Node::new(id, raw_node.label, raw_node.group)
                    .with_descriptions(raw_node.descriptions),
            );
        }

        for (index, raw_edge) in raw.edges.into_iter().enumerate() {
            let from = located_string(source, raw_edge.source, "edge source")?;
            let to = located_string(source, raw_edge.target, "edge target")?;
            for (endpoint, span) in [&from, &to] {
                if !topology.contains(Id::new(endpoint)) {
                    return Err(ParseError::new(format!(
                        "edge {index} references unknown node `{endpoint}`"
                    ))
                    .with_span(*span)
                    .with_help("declare the node in `nodes` before using it in `edges`"));
                }
            }

            let id = raw_edge
                .id
                .map(|id| Id::new(&id))
                .unwrap_or_else(|| default_edge_id(index));
            topology
                .edges
                .push(Edge::new(id, Id::new(&from.0), Id::new(&to.0)));
        }

        debug!(
            nodes = topology.nodes.len(),
            edges = topology.edges.len();
            "Topology parsed"
        );

        Ok(topology)
    }

    /// Appends a node. A node with an already known id replaces the old one
    /// in place.
    pub fn add_node(&mut self, node: Node) {
        match self.index.get(&node.id()) {
            Some(&position) => self.nodes[position] = node,
            None => {
                self.index.insert(node.id(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Appends an edge between `source` and `target`, named after its
    /// position in the edge list. Endpoints are not checked.
    pub fn add_edge(&mut self, source: Id, target: Id) -> Id {
        let id = default_edge_id(self.edges.len());
        self.edges.push(Edge::new(id, source, target));
        id
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    /// Returns true if a node with the given id exists.
    pub fn contains(&self, id: Id) -> bool {
        self.index.contains_key(&id)
    }

    /// The first node, which roots the tree view.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn default_edge_id(index: usize) -> Id {
    Id::new(&format!("{index}-edge"))
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Decodes a raw JSON string borrowed from `source`, returning it with the
/// span of its literal.
fn located_string(
    source: &str,
    raw: &RawValue,
    what: &str,
) -> Result<(String, Span), ParseError> {
    let literal = raw.get();
    let offset = (literal.as_ptr() as usize).saturating_sub(source.as_ptr() as usize);
    let span = Span::new(offset, literal.len());

    serde_json::from_str(literal)
        .map(|value| (value, span))
        .map_err(|_| {
            ParseError::new(format!("{what} must be a string, found `{literal}`")).with_span(span)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let topology = Topology::from_json(r#"{"nodes": [{"id": "x", "label": "X"}]}"#).unwrap();
        assert_eq!(topology.nodes().len(), 1);
        assert!(topology.edges().is_empty());

        let root = topology.root().unwrap();
        assert_eq!(root.id(), "x");
        assert_eq!(root.group(), 0);
        assert!(root.descriptions().is_empty());
        assert_eq!(root.kind(), NodeKind::Individual);
    }

    #[test]
    fn test_edge_ids_default_to_position() {
        let topology = Topology::from_json(
            r#"{
                "nodes": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
                "edges": [
                    {"source": "a", "target": "b", "id": "uplink"},
                    {"source": "b", "target": "a"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(topology.edges()[0].id(), "uplink");
        assert_eq!(topology.edges()[1].id(), "1-edge");
    }

    #[test]
    fn test_descriptions_are_kept() {
        let topology = Topology::from_json(
            r#"{"nodes": [{"id": "a", "label": "A", "group": 2, "descriptions": ["p1", "p2"]}]}"#,
        )
        .unwrap();
        let node = topology.node(Id::new("a")).unwrap();
        assert_eq!(node.descriptions(), ["p1".to_string(), "p2".to_string()]);
        assert_eq!(node.group(), 2);
    }

    #[test]
    fn test_malformed_json_has_span() {
        let source = "{\n  \"nodes\": [\n    {\"id\": }\n  ]\n}";
        let err = Topology::from_json(source).unwrap_err();
        let span = err.span().expect("syntax errors carry a span");
        assert!(span.offset() > 0 && span.offset() <= source.len());
        assert!(err.message().starts_with("invalid topology JSON"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let source = r#"{"nodes": [{"id": "a", "label": "A"}, {"id": "a", "label": "B"}]}"#;
        let err = Topology::from_json(source).unwrap_err();
        assert_eq!(err.message(), "duplicate node id `a`");
        assert!(err.help().is_some());

        // the span points at the second declaration
        let span = err.span().unwrap();
        assert_eq!(span.offset(), source.rfind("\"a\"").unwrap());
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn test_unknown_endpoint_span_skips_matching_label() {
        let source = r#"{
            "nodes": [{"id": "a", "label": "ghost"}],
            "edges": [{"source": "a", "target": "ghost"}]
        }"#;
        let err = Topology::from_json(source).unwrap_err();
        let span = err.span().unwrap();
        assert_eq!(span.offset(), source.rfind("\"ghost\"").unwrap());
    }

    #[test]
    fn test_escaped_id_span() {
        let source = r#"{"nodes": [{"id": "a\"b", "label": "A"}, {"id": "a\"b", "label": "B"}]}"#;
        let err = Topology::from_json(source).unwrap_err();
        assert_eq!(err.message(), "duplicate node id `a\"b`");
        let span = err.span().unwrap();
        assert_eq!(&source[span.offset()..span.offset() + span.len()], r#""a\"b""#);
        assert!(span.offset() > source.find("a\\").unwrap());
    }

    #[test]
    fn test_non_string_id_rejected() {
        let source = r#"{"nodes": [{"id": 7, "label": "A"}]}"#;
        let err = Topology::from_json(source).unwrap_err();
        assert_eq!(err.message(), "node id must be a string, found `7`");
        let span = err.span().unwrap();
        assert_eq!(&source[span.offset()..span.offset() + span.len()], "7");
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let source = r#"{
            "nodes": [{"id": "a", "label": "A"}],
            "edges": [{"source": "a", "target": "ghost"}]
        }"#;
        let err = Topology::from_json(source).unwrap_err();
        assert_eq!(err.message(), "edge 0 references unknown node `ghost`");
        let span = err.span().unwrap();
        assert_eq!(&source[span.offset()..span.offset() + span.len()], "\"ghost\"");
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let err = Topology::from_json(r#"{"nodes": [], "links": []}"#).unwrap_err();
        assert!(err.message().contains("links"));
    }

    #[test]
    fn test_add_node_replaces_in_place() {
        let mut topology = Topology::new();
        topology.add_node(Node::new(Id::new("a"), "first", 1));
        topology.add_node(Node::new(Id::new("b"), "second", 1));
        topology.add_node(Node::new(Id::new("a"), "replaced", 3));

        assert_eq!(topology.nodes().len(), 2);
        assert_eq!(topology.nodes()[0].label(), "replaced");
        assert_eq!(topology.node(Id::new("a")).unwrap().group(), 3);
    }

    #[test]
    fn test_aggregate_node() {
        let node = Node::aggregate(7, 4);
        assert_eq!(node.id(), "group-7");
        assert_eq!(node.label(), "Group 7");
        assert_eq!(node.kind(), NodeKind::Aggregate { members: 4 });
    }

    #[test]
    fn test_offset_of() {
        let source = "ab\ncd\nef";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 2), 4);
        assert_eq!(offset_of(source, 3, 1), 6);
    }
}
