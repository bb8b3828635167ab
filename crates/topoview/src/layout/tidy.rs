//! Reingold-Tilford tidy tree in the linear-time Buchheim/Walker form.
//!
//! Works on breadth units: adjacent siblings are one unit apart, adjacent
//! nodes with different parents two units. The root ends up at breadth 0.

use crate::tree::TopologyTree;

/// Per-node state of the walker. Index 0 is a virtual node parenting the
/// real root.
#[derive(Debug, Clone)]
struct WalkNode {
    parent: usize,
    children: Vec<usize>,
    /// Position among siblings.
    number: usize,
    /// Ancestor pointer used by `apportion`.
    ancestor: usize,
    /// Default ancestor of this node's children.
    default_ancestor: Option<usize>,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
}

impl WalkNode {
    fn new(index: usize, parent: usize, number: usize) -> Self {
        Self {
            parent,
            children: Vec::new(),
            number,
            ancestor: index,
            default_ancestor: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
        }
    }
}

struct Walker {
    nodes: Vec<WalkNode>,
}

impl Walker {
    fn separation(&self, a: usize, b: usize) -> f32 {
        if self.nodes[a].parent == self.nodes[b].parent {
            1.0
        } else {
            2.0
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f32) {
        let subtrees = (self.nodes[wp].number - self.nodes[wm].number) as f32;
        let change = shift / subtrees;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for position in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[position];
            self.nodes[w].prelim += shift;
            self.nodes[w].modifier += shift;
            change += self.nodes[w].change;
            shift += self.nodes[w].shift + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.nodes[v].parent;
        let number = self.nodes[v].number;
        let left_sibling = (number > 0).then(|| self.nodes[parent].children[number - 1]);

        if let (Some(&first), Some(&last)) = (
            self.nodes[v].children.first(),
            self.nodes[v].children.last(),
        ) {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                    self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let default_ancestor = self.nodes[parent]
            .default_ancestor
            .unwrap_or(self.nodes[parent].children[0]);
        let ancestor = self.apportion(v, left_sibling, default_ancestor);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };

        let parent = self.nodes[v].parent;
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let mut next_vim = self.next_right(vim);
        let mut next_vip = self.next_left(vip);
        while let (Some(right), Some(left)) = (next_vim, next_vip) {
            vim = right;
            vip = left;
            // Both contours continue at this depth, so the outer ones do too
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;

            next_vim = self.next_right(vim);
            next_vip = self.next_left(vip);
        }

        if let Some(right) = next_vim {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(right);
                self.nodes[vop].modifier += sim - sop;
            }
        }

        if let Some(left) = next_vip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(left);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }

        ancestor
    }
}

/// Computes breadth coordinates for the visible nodes of `tree`.
///
/// Returns `(tree_index, breadth)` pairs in breadth-first order, with the
/// root at breadth 0.
pub(super) fn breadths(tree: &TopologyTree) -> Vec<(usize, f32)> {
    let visible = tree.visible();
    if visible.is_empty() {
        return Vec::new();
    }

    // Walk index of each visible tree node; the virtual root takes 0
    let mut walk_index = vec![usize::MAX; tree.len()];
    let mut walker = Walker {
        nodes: vec![WalkNode::new(0, 0, 0)],
    };

    for &tree_index in &visible {
        let index = walker.nodes.len();
        walk_index[tree_index] = index;

        let parent = tree
            .node(tree_index)
            .and_then(|node| node.parent())
            .map(|parent| walk_index[parent])
            .unwrap_or(0);
        let number = walker.nodes[parent].children.len();
        walker.nodes.push(WalkNode::new(index, parent, number));
        walker.nodes[parent].children.push(index);
    }

    // Left-to-right post-order: reverse of a right-to-left pre-order
    let mut pre_order = Vec::with_capacity(walker.nodes.len());
    let mut stack = vec![1];
    while let Some(current) = stack.pop() {
        pre_order.push(current);
        stack.extend(walker.nodes[current].children.iter().copied());
    }
    for &v in pre_order.iter().rev() {
        walker.first_walk(v);
    }

    // Second walk: accumulate modifiers top-down
    walker.nodes[0].modifier = -walker.nodes[1].prelim;
    let mut positions = vec![0.0; walker.nodes.len()];
    for &v in pre_order.iter() {
        let parent = walker.nodes[v].parent;
        let parent_modifier = walker.nodes[parent].modifier;
        positions[v] = walker.nodes[v].prelim + parent_modifier;
        walker.nodes[v].modifier += parent_modifier;
    }

    visible
        .into_iter()
        .map(|tree_index| (tree_index, positions[walk_index[tree_index]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use topoview_core::{
        identifier::Id,
        topology::{Node, Topology},
    };

    use super::*;

    fn tree(nodes: &[&str], edges: &[(&str, &str)]) -> TopologyTree {
        let mut topology = Topology::new();
        for name in nodes {
            topology.add_node(Node::new(Id::new(name), *name, 1));
        }
        for (source, target) in edges {
            topology.add_edge(Id::new(source), Id::new(target));
        }
        TopologyTree::from_topology(&topology)
    }

    fn breadth_of(tree: &TopologyTree, positions: &[(usize, f32)], id: &str) -> f32 {
        let index = tree.index_of(Id::new(id)).unwrap();
        positions
            .iter()
            .find(|(tree_index, _)| *tree_index == index)
            .map(|(_, breadth)| *breadth)
            .unwrap()
    }

    #[test]
    fn test_single_node() {
        let tree = tree(&["r"], &[]);
        let positions = breadths(&tree);
        assert_eq!(positions.len(), 1);
        assert_approx_eq!(f32, positions[0].1, 0.0);
    }

    #[test]
    fn test_parent_centered_over_children() {
        let tree = tree(&["r", "a", "b", "c"], &[("r", "a"), ("r", "b"), ("r", "c")]);
        let positions = breadths(&tree);

        assert_approx_eq!(f32, breadth_of(&tree, &positions, "r"), 0.0);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "a"), -1.0);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "b"), 0.0);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "c"), 1.0);
    }

    #[test]
    fn test_cousins_are_two_units_apart() {
        // r -> a -> (a1, a2), r -> b -> (b1)
        let tree = tree(
            &["r", "a", "b", "a1", "a2", "b1"],
            &[("r", "a"), ("r", "b"), ("a", "a1"), ("a", "a2"), ("b", "b1")],
        );
        let positions = breadths(&tree);

        let a2 = breadth_of(&tree, &positions, "a2");
        let b1 = breadth_of(&tree, &positions, "b1");
        assert!(b1 - a2 >= 2.0 - 1e-4);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "r"), 0.0);
    }

    #[test]
    fn test_collapsed_subtree_is_skipped() {
        let mut tree = tree(
            &["r", "a", "b", "a1", "a2"],
            &[("r", "a"), ("r", "b"), ("a", "a1"), ("a", "a2")],
        );
        tree.collapse(Id::new("a")).unwrap();

        let positions = breadths(&tree);
        assert_eq!(positions.len(), 3);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "a"), -0.5);
        assert_approx_eq!(f32, breadth_of(&tree, &positions, "b"), 0.5);
    }

    #[test]
    fn test_same_depth_order_is_preserved() {
        let tree = tree(
            &["r", "a", "b", "c", "a1", "c1", "c2", "c3"],
            &[
                ("r", "a"),
                ("r", "b"),
                ("r", "c"),
                ("a", "a1"),
                ("c", "c1"),
                ("c", "c2"),
                ("c", "c3"),
            ],
        );
        let positions = breadths(&tree);

        let mut by_depth: Vec<Vec<f32>> = Vec::new();
        for (tree_index, breadth) in &positions {
            let depth = tree.node(*tree_index).unwrap().depth();
            if by_depth.len() <= depth {
                by_depth.resize(depth + 1, Vec::new());
            }
            by_depth[depth].push(*breadth);
        }

        for row in by_depth {
            for pair in row.windows(2) {
                assert!(pair[1] - pair[0] >= 1.0 - 1e-4, "row not separated: {pair:?}");
            }
        }
    }
}
