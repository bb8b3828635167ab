//! Layout of topology trees.
//!
//! [`LayoutEngine::calculate`] positions the visible nodes of a
//! [`TopologyTree`] in three steps:
//!
//! 1. a tidy-tree pass assigns each node a breadth coordinate (see
//!    [`tidy`]); depth maps to `x = depth * level_distance`, breadth to `y`;
//! 2. every node gets a vertical extent covering its circle, its label and
//!    its description table;
//! 3. a collision sweep pushes same-depth nodes apart until no extent
//!    overlaps the one before it.
//!
//! The sweep walks depths from shallow to deep. Within a depth it compares
//! each node with its immediate predecessor in breadth-first order and, on
//! overlap, shifts the node and all of its visible descendants down by the
//! overlap. Afterwards `next.top >= prev.bottom` holds for every adjacent
//! same-depth pair.

pub mod curve;
mod tidy;

use std::collections::HashMap;

use log::{debug, info, trace};

use topoview_core::{
    draw::LABEL_OFFSET_FACTOR,
    geometry::{Bounds, Point},
    identifier::Id,
    topology::{Node, NodeKind},
};

use crate::{config::LayoutConfig, tree::TopologyTree};

/// A visible node with its final position and vertical extent.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    node: Node,
    tree_index: usize,
    depth: usize,
    position: Point,
    radius: f32,
    top: f32,
    bottom: f32,
    collapsed: bool,
}

impl LayoutNode {
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn id(&self) -> Id {
        self.node.id()
    }

    /// Index of this node in the source [`TopologyTree`].
    pub fn tree_index(&self) -> usize {
        self.tree_index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Center of the node circle.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Circle radius, enlarged for aggregate nodes.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Upper end of the vertical extent.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Lower end of the vertical extent, below the description table.
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// True if the node is collapsed and hides children.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Number of grouped nodes for aggregates.
    pub fn aggregated_count(&self) -> Option<usize> {
        match self.node.kind() {
            NodeKind::Aggregate { members } => Some(members),
            NodeKind::Individual => None,
        }
    }

    /// Bounds covering the circle and the vertical extent.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.position.x() - self.radius,
            self.top,
            self.position.x() + self.radius,
            self.bottom,
        )
    }

    fn shift_down(&mut self, delta: f32) {
        self.position = self.position.with_y(self.position.y() + delta);
        self.top += delta;
        self.bottom += delta;
    }
}

/// Positioned visible nodes and the links between them.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    nodes: Vec<LayoutNode>,
    links: Vec<(usize, usize)>,
    lookup: HashMap<Id, usize>,
}

impl TreeLayout {
    /// Nodes in breadth-first order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Parent/child pairs as indices into [`TreeLayout::nodes`].
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Iterates over links as node pairs.
    pub fn link_nodes(&self) -> impl Iterator<Item = (&LayoutNode, &LayoutNode)> {
        self.links
            .iter()
            .map(|&(parent, child)| (&self.nodes[parent], &self.nodes[child]))
    }

    pub fn node(&self, id: Id) -> Option<&LayoutNode> {
        self.lookup.get(&id).map(|&index| &self.nodes[index])
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.node(id).map(LayoutNode::position)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Bounds of all node extents; default bounds for an empty layout.
    pub fn bounds(&self) -> Bounds {
        let mut nodes = self.nodes.iter();
        let Some(first) = nodes.next() else {
            return Bounds::default();
        };
        nodes.fold(first.bounds(), |acc, node| acc.merge(&node.bounds()))
    }

    /// Layout indices grouped by depth, each group in breadth-first order.
    pub fn rows(&self) -> Vec<Vec<usize>> {
        let mut rows: Vec<Vec<usize>> = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if rows.len() <= node.depth {
                rows.resize_with(node.depth + 1, Vec::new);
            }
            rows[node.depth].push(index);
        }
        rows
    }
}

/// Tidy-tree layout engine.
///
/// # Examples
///
/// ```
/// use topoview::{
///     config::LayoutConfig,
///     identifier::Id,
///     layout::LayoutEngine,
///     topology::{Node, Topology},
///     tree::TopologyTree,
/// };
///
/// let mut topology = Topology::new();
/// topology.add_node(Node::new(Id::new("core"), "Core", 1));
/// topology.add_node(Node::new(Id::new("edge"), "Edge", 2));
/// topology.add_edge(Id::new("core"), Id::new("edge"));
///
/// let tree = TopologyTree::from_topology(&topology);
/// let layout = LayoutEngine::new(&LayoutConfig::default()).calculate(&tree);
///
/// assert_eq!(layout.position(Id::new("edge")).unwrap().x(), 350.0);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    level_distance: f32,
    sibling_distance: f32,
    node_radius: f32,
    table_row_height: f32,
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            level_distance: config.level_distance(),
            sibling_distance: config.sibling_distance(),
            node_radius: config.node_radius(),
            table_row_height: config.table_row_height(),
        }
    }

    pub fn with_level_distance(mut self, distance: f32) -> Self {
        self.level_distance = distance;
        self
    }

    pub fn with_sibling_distance(mut self, distance: f32) -> Self {
        self.sibling_distance = distance;
        self
    }

    /// Lays out the visible part of `tree`.
    pub fn calculate(&self, tree: &TopologyTree) -> TreeLayout {
        info!(nodes = tree.len(); "Calculating tree layout");

        let breadths = tidy::breadths(tree);
        let mut layout = TreeLayout::default();
        let mut layout_index = vec![usize::MAX; tree.len()];

        for (tree_index, breadth) in breadths {
            let Some(tree_node) = tree.node(tree_index) else {
                continue;
            };

            let position = Point::new(
                tree_node.depth() as f32 * self.level_distance,
                breadth * self.sibling_distance,
            );
            let node = self.positioned(tree_node.node().clone(), position);

            layout_index[tree_index] = layout.nodes.len();
            layout.lookup.insert(node.id(), layout.nodes.len());
            layout.nodes.push(LayoutNode {
                tree_index,
                depth: tree_node.depth(),
                collapsed: tree_node.is_collapsed(),
                ..node
            });
        }

        layout.links = tree
            .links()
            .into_iter()
            .map(|(parent, child)| (layout_index[parent], layout_index[child]))
            .collect();

        let shifted = resolve_collisions(&mut layout, tree, &layout_index);
        debug!(
            nodes = layout.len(),
            links = layout.links.len(),
            shifted;
            "Tree layout calculated"
        );

        layout
    }

    fn positioned(&self, node: Node, position: Point) -> LayoutNode {
        let radius = match node.kind() {
            NodeKind::Aggregate { .. } => {
                self.node_radius * topoview_core::draw::AGGREGATE_RADIUS_FACTOR
            }
            NodeKind::Individual => self.node_radius,
        };
        let rows = node.descriptions().len() as f32;

        LayoutNode {
            top: position.y() - radius,
            bottom: position.y() + radius * LABEL_OFFSET_FACTOR + rows * self.table_row_height,
            node,
            tree_index: 0,
            depth: 0,
            position,
            radius,
            collapsed: false,
        }
    }
}

/// Pushes overlapping same-depth nodes apart. Returns the number of shifts.
fn resolve_collisions(layout: &mut TreeLayout, tree: &TopologyTree, layout_index: &[usize]) -> usize {
    let mut shifted = 0;

    for row in layout.rows() {
        for pair in row.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let floor = layout.nodes[prev].bottom;
            let overlap = floor - layout.nodes[next].top;
            if overlap <= 0.0 {
                continue;
            }

            trace!(
                prev = layout.nodes[prev].id().to_string(),
                next = layout.nodes[next].id().to_string(),
                overlap;
                "Shifting overlapping subtree"
            );

            let tree_index = layout.nodes[next].tree_index;
            layout.nodes[next].shift_down(overlap);
            // `top + (floor - top)` can round below `floor`
            layout.nodes[next].top = layout.nodes[next].top.max(floor);
            for descendant in tree.visible_descendants(tree_index) {
                layout.nodes[layout_index[descendant]].shift_down(overlap);
            }
            shifted += 1;
        }
    }

    shifted
}
