//! Tree view of a topology.
//!
//! [`TopologyTree::from_topology`] converts the flat edge list into a tree
//! rooted at the first node with a breadth-first traversal:
//!
//! - children of a node are the targets of its outgoing edges, in edge order,
//!   that were not discovered earlier;
//! - nodes unreachable from the root are left out;
//! - a node reachable through several edges hangs under the parent that
//!   discovered it first, later edges to it are ignored;
//! - nodes are marked visited on discovery, so cycles terminate and no node
//!   appears twice.
//!
//! Collapsing a node moves its children into a saved slot; expanding moves
//! them back. Hidden nodes keep their place in the arena.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};
use thiserror::Error;

use topoview_core::{identifier::Id, topology::Node, topology::Topology};

use crate::structure::TopologyGraph;

/// Errors raised by tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node `{0}` is not part of the tree")]
    UnknownNode(Id),
}

/// A node of the tree with its structural state.
#[derive(Debug, Clone)]
pub struct TreeNode {
    node: Node,
    parent: Option<usize>,
    depth: usize,
    children: Vec<usize>,
    collapsed_children: Vec<usize>,
    expanded: bool,
}

impl TreeNode {
    fn new(node: Node, parent: Option<usize>, depth: usize) -> Self {
        Self {
            node,
            parent,
            depth,
            children: Vec::new(),
            collapsed_children: Vec::new(),
            expanded: true,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn id(&self) -> Id {
        self.node.id()
    }

    /// Arena index of the parent, `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Visible children, in discovery order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Children hidden by a collapse.
    pub fn collapsed_children(&self) -> &[usize] {
        &self.collapsed_children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// True if the node is collapsed and hides at least one child.
    pub fn is_collapsed(&self) -> bool {
        !self.expanded && !self.collapsed_children.is_empty()
    }
}

/// Arena-backed tree; index 0 is the root.
#[derive(Debug, Clone, Default)]
pub struct TopologyTree {
    nodes: Vec<TreeNode>,
    index: HashMap<Id, usize>,
}

impl TopologyTree {
    /// Converts `topology` into a tree rooted at its first node.
    ///
    /// An empty topology yields an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use topoview::{identifier::Id, topology::{Node, Topology}, tree::TopologyTree};
    ///
    /// let mut topology = Topology::new();
    /// for name in ["a", "b", "c"] {
    ///     topology.add_node(Node::new(Id::new(name), name, 1));
    /// }
    /// topology.add_edge(Id::new("a"), Id::new("b"));
    /// topology.add_edge(Id::new("b"), Id::new("a"));
    ///
    /// let tree = TopologyTree::from_topology(&topology);
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.depth_of(Id::new("b")), Some(1));
    /// assert!(tree.get(Id::new("c")).is_none());
    /// ```
    pub fn from_topology(topology: &Topology) -> Self {
        let graph = TopologyGraph::from_topology(topology);
        let mut tree = Self::default();

        let Some(root) = graph.first_node() else {
            debug!("Empty topology, empty tree");
            return tree;
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(root.id());
        tree.push(TreeNode::new(root.clone(), None, 0));
        queue.push_back(0);

        while let Some(current) = queue.pop_front() {
            let current_id = tree.nodes[current].id();
            let depth = tree.nodes[current].depth + 1;

            for target in graph.outgoing_nodes(current_id) {
                if !visited.insert(target.id()) {
                    trace!(
                        parent = current_id.to_string(),
                        target = target.id().to_string();
                        "Ignoring edge to visited node"
                    );
                    continue;
                }

                let child = tree.push(TreeNode::new(target.clone(), Some(current), depth));
                tree.nodes[current].children.push(child);
                queue.push_back(child);
            }
        }

        debug!(
            reachable = tree.len(),
            total = topology.nodes().len();
            "Tree built"
        );

        tree
    }

    fn push(&mut self, node: TreeNode) -> usize {
        let index = self.nodes.len();
        self.index.insert(node.id(), index);
        self.nodes.push(node);
        index
    }

    fn position(&self, id: Id) -> Result<usize, TreeError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Returns the root, or `None` for an empty tree.
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Returns the tree node for `id`.
    pub fn get(&self, id: Id) -> Option<&TreeNode> {
        self.index.get(&id).map(|&index| &self.nodes[index])
    }

    /// Returns the tree node at arena index `index`.
    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Returns the arena index of `id`.
    pub fn index_of(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Number of nodes in the tree, hidden ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn depth_of(&self, id: Id) -> Option<usize> {
        self.get(id).map(TreeNode::depth)
    }

    /// Iterates over all nodes in breadth-first discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Collapses an expanded node or expands a collapsed one.
    ///
    /// Returns `Ok(false)` for leaves, which cannot be toggled.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is not in the tree.
    pub fn toggle(&mut self, id: Id) -> Result<bool, TreeError> {
        let position = self.position(id)?;
        if self.nodes[position].expanded {
            self.collapse(id)
        } else {
            self.expand(id)
        }
    }

    /// Hides the children of `id`. Returns whether anything changed.
    pub fn collapse(&mut self, id: Id) -> Result<bool, TreeError> {
        let position = self.position(id)?;
        let node = &mut self.nodes[position];
        if !node.expanded || node.children.is_empty() {
            return Ok(false);
        }

        node.collapsed_children = std::mem::take(&mut node.children);
        node.expanded = false;
        trace!(node = id.to_string(); "Node collapsed");
        Ok(true)
    }

    /// Shows the children of `id` again. Returns whether anything changed.
    pub fn expand(&mut self, id: Id) -> Result<bool, TreeError> {
        let position = self.position(id)?;
        let node = &mut self.nodes[position];
        if node.expanded {
            return Ok(false);
        }

        node.children = std::mem::take(&mut node.collapsed_children);
        node.expanded = true;
        trace!(node = id.to_string(); "Node expanded");
        Ok(true)
    }

    /// Expands every collapsed node.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if !node.expanded {
                node.children = std::mem::take(&mut node.collapsed_children);
                node.expanded = true;
            }
        }
    }

    /// Collapses every node at `depth` or deeper that has children.
    pub fn collapse_below(&mut self, depth: usize) {
        for node in &mut self.nodes {
            if node.depth >= depth && node.expanded && !node.children.is_empty() {
                node.collapsed_children = std::mem::take(&mut node.children);
                node.expanded = false;
            }
        }
    }

    /// Arena indices of the visible nodes, in breadth-first order.
    ///
    /// Descendants of collapsed nodes are hidden.
    pub fn visible(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }

        let mut queue = VecDeque::from([0]);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            queue.extend(self.nodes[current].children.iter().copied());
        }
        order
    }

    /// Visible parent/child pairs, in breadth-first order of the child.
    pub fn links(&self) -> Vec<(usize, usize)> {
        self.visible()
            .into_iter()
            .filter_map(|index| self.nodes[index].parent.map(|parent| (parent, index)))
            .collect()
    }

    /// Visible descendants of `index`, excluding itself.
    pub fn visible_descendants(&self, index: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let mut queue: VecDeque<usize> = self.nodes[index].children.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            result.push(current);
            queue.extend(self.nodes[current].children.iter().copied());
        }
        result
    }

    /// Ids of the nodes currently collapsed with hidden children.
    pub fn collapsed_ids(&self) -> Vec<Id> {
        self.nodes
            .iter()
            .filter(|node| node.is_collapsed())
            .map(TreeNode::id)
            .collect()
    }
}
