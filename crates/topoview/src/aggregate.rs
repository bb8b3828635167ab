//! Group aggregation: one node per group id.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use topoview_core::{
    identifier::Id,
    topology::{Node, Topology},
};

/// Replaces every group of nodes with a single aggregate node.
///
/// - aggregates appear in first-appearance order of their group, so the
///   group of the first node roots the aggregated tree;
/// - edges map to `group(source) -> group(target)`; edges inside a group are
///   dropped and repeated inter-group edges keep only the first occurrence;
/// - edges with an unknown endpoint are skipped.
///
/// # Examples
///
/// ```
/// use topoview::{aggregate::aggregate, identifier::Id, topology::{Node, Topology}};
///
/// let mut topology = Topology::new();
/// topology.add_node(Node::new(Id::new("a"), "A", 2));
/// topology.add_node(Node::new(Id::new("b"), "B", 2));
/// topology.add_node(Node::new(Id::new("c"), "C", 5));
/// topology.add_edge(Id::new("a"), Id::new("c"));
/// topology.add_edge(Id::new("b"), Id::new("c"));
///
/// let aggregated = aggregate(&topology);
/// assert_eq!(aggregated.nodes().len(), 2);
/// assert_eq!(aggregated.nodes()[0].label(), "Group 2");
/// assert_eq!(aggregated.edges().len(), 1);
/// ```
pub fn aggregate(topology: &Topology) -> Topology {
    let mut order: Vec<u32> = Vec::new();
    let mut members: HashMap<u32, usize> = HashMap::new();
    for node in topology.nodes() {
        let count = members.entry(node.group()).or_insert(0);
        if *count == 0 {
            order.push(node.group());
        }
        *count += 1;
    }

    let mut aggregated = Topology::new();
    for group in &order {
        aggregated.add_node(Node::aggregate(*group, members[group]));
    }

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    for edge in topology.edges() {
        let (Some(source), Some(target)) = (topology.node(edge.source()), topology.node(edge.target()))
        else {
            warn!(edge = edge.id().to_string(); "Skipping edge with unknown endpoint");
            continue;
        };

        let pair = (source.group(), target.group());
        if pair.0 == pair.1 || !seen.insert(pair) {
            continue;
        }
        aggregated.add_edge(Id::for_group(pair.0), Id::for_group(pair.1));
    }

    debug!(
        groups = aggregated.nodes().len(),
        edges = aggregated.edges().len();
        "Topology aggregated"
    );

    aggregated
}

#[cfg(test)]
mod tests {
    use topoview_core::topology::NodeKind;

    use super::*;

    fn node(id: &str, group: u32) -> Node {
        Node::new(Id::new(id), id, group)
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregated = aggregate(&Topology::new());
        assert!(aggregated.is_empty());
        assert!(aggregated.edges().is_empty());
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let mut topology = Topology::new();
        topology.add_node(node("a", 3));
        topology.add_node(node("b", 1));
        topology.add_node(node("c", 3));

        let aggregated = aggregate(&topology);
        let ids: Vec<String> = aggregated.nodes().iter().map(|node| node.id().to_string()).collect();
        assert_eq!(ids, ["group-3", "group-1"]);
        assert_eq!(aggregated.nodes()[0].kind(), NodeKind::Aggregate { members: 2 });
        assert_eq!(aggregated.nodes()[1].kind(), NodeKind::Aggregate { members: 1 });
    }

    #[test]
    fn test_edges_mapped_and_deduplicated() {
        let mut topology = Topology::new();
        topology.add_node(node("a", 1));
        topology.add_node(node("b", 1));
        topology.add_node(node("c", 2));
        topology.add_node(node("d", 2));
        topology.add_edge(Id::new("a"), Id::new("b"));
        topology.add_edge(Id::new("a"), Id::new("c"));
        topology.add_edge(Id::new("b"), Id::new("d"));
        topology.add_edge(Id::new("d"), Id::new("a"));

        let aggregated = aggregate(&topology);
        let edges: Vec<(String, String)> = aggregated
            .edges()
            .iter()
            .map(|edge| (edge.source().to_string(), edge.target().to_string()))
            .collect();

        assert_eq!(
            edges,
            [
                ("group-1".to_string(), "group-2".to_string()),
                ("group-2".to_string(), "group-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let mut topology = Topology::new();
        topology.add_node(node("a", 1));
        topology.add_edge(Id::new("a"), Id::new("ghost"));

        assert!(aggregate(&topology).edges().is_empty());
    }
}
