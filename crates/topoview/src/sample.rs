//! Built-in sample topology, used when no input is given.

use topoview_core::{
    identifier::Id,
    topology::{Node, Topology},
};

/// `(id, label, group, description rows)`
const NODES: [(&str, &str, u32, usize); 25] = [
    ("0", "Node 1", 1, 0),
    ("1", "Node 2", 1, 0),
    ("2", "Node 3", 1, 5),
    ("3", "Node 4", 1, 0),
    ("5", "Node 5", 2, 5),
    ("6", "Node 6", 2, 0),
    ("7", "Node 7", 2, 0),
    ("8", "Node 8", 3, 0),
    ("9", "Node 9", 3, 4),
    ("10", "Node 10", 4, 5),
    ("11", "Node 11", 4, 0),
    ("12", "Node 12", 4, 0),
    ("13", "Node 13", 4, 0),
    ("14", "Node 14", 5, 5),
    ("15", "Node 15", 5, 0),
    ("16", "Node 16", 6, 0),
    ("17", "Node 17", 6, 0),
    ("18", "Node 18", 6, 0),
    ("19", "Node 19", 7, 0),
    ("20", "Node 20", 7, 0),
    ("21", "Node 21", 8, 0),
    ("22", "Node 22", 9, 0),
    ("23", "Node 23", 9, 0),
    ("24", "Node 24", 9, 0),
    ("25", "Node 25", 9, 0),
];

const EDGES: [(&str, &str); 19] = [
    ("0", "1"),
    ("0", "2"),
    ("0", "3"),
    ("0", "5"),
    ("1", "6"),
    ("1", "7"),
    ("2", "8"),
    ("2", "9"),
    ("3", "10"),
    ("3", "11"),
    ("5", "12"),
    ("5", "13"),
    ("5", "14"),
    ("6", "15"),
    ("6", "16"),
    ("15", "17"),
    ("15", "19"),
    ("15", "20"),
    ("16", "18"),
];

/// Returns the sample topology: 25 nodes in 9 groups and 19 edges. The last
/// five nodes are not reachable from the root.
pub fn topology() -> Topology {
    let mut topology = Topology::new();
    for (id, label, group, rows) in NODES {
        let descriptions = (1..=rows).map(|row| format!("description {row}")).collect();
        topology.add_node(Node::new(Id::new(id), label, group).with_descriptions(descriptions));
    }
    for (source, target) in EDGES {
        topology.add_edge(Id::new(source), Id::new(target));
    }
    topology
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TopologyTree;

    #[test]
    fn test_sample_shape() {
        let topology = topology();
        assert_eq!(topology.nodes().len(), 25);
        assert_eq!(topology.edges().len(), 19);
        assert_eq!(topology.node(Id::new("5")).unwrap().descriptions().len(), 5);

        let tree = TopologyTree::from_topology(&topology);
        assert_eq!(tree.len(), 20);
        assert!(tree.get(Id::new("21")).is_none());
        assert_eq!(tree.depth_of(Id::new("17")), Some(4));
    }
}
