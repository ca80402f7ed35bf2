use abstutil::Counter;

use crate::{NodeIdx, StreetGraph};

/// How many times each node is used across every way. An interior occurrence counts twice and an
/// endpoint once, so 1 is a dead end, 2 is a through-point, and anything higher is an
/// intersection. Built once, before any merging, and never changed after.
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeMap {
    counts: Counter<NodeIdx>,
}

pub fn compute_degrees(graph: &StreetGraph) -> DegreeMap {
    let mut counts = Counter::new();
    for segment in &graph.segments {
        let last = segment.nodes.len() - 1;
        for (idx, node) in segment.nodes.iter().enumerate() {
            counts.add(*node, if idx == 0 || idx == last { 1 } else { 2 });
        }
    }
    DegreeMap { counts }
}

impl DegreeMap {
    /// 0 for nodes no way uses
    pub fn get(&self, node: NodeIdx) -> usize {
        self.counts.get(node)
    }

    /// Nodes with degree above 2, in ID order.
    pub fn intersections(&self) -> Vec<NodeIdx> {
        self.counts
            .borrow()
            .iter()
            .filter(|(_, degree)| **degree > 2)
            .map(|(node, _)| *node)
            .collect()
    }

    pub fn dead_ends(&self) -> Vec<NodeIdx> {
        self.counts
            .borrow()
            .iter()
            .filter(|(_, degree)| **degree == 1)
            .map(|(node, _)| *node)
            .collect()
    }
}
