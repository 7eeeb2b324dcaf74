//! Census of a parsed graph

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{GraphNode, NodeRef, NodeValue};

/// Counts of the nodes reachable from a root through owning edges.
/// Reference edges are counted but not followed, so cycles are harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nulls: usize,
    pub bools: usize,
    pub integers: usize,
    pub doubles: usize,
    pub strings: usize,
    pub arrays: usize,
    pub objects: usize,
    pub references: usize,
    /// References whose target has already been released.
    pub dangling_references: usize,
    /// Nodes owned by more than one parent.
    pub shared_nodes: usize,
}

impl GraphStats {
    pub fn collect(root: &NodeRef) -> Self {
        let mut stats = GraphStats::default();
        let mut owners: HashMap<*const GraphNode, usize> = HashMap::new();
        let mut to_visit = vec![Arc::clone(root)];

        while let Some(node) = to_visit.pop() {
            let count = owners.entry(Arc::as_ptr(&node)).or_insert(0);
            *count += 1;
            if *count > 1 {
                continue;
            }

            match node.value() {
                None | Some(NodeValue::Null) => stats.nulls += 1,
                Some(NodeValue::Bool(_)) => stats.bools += 1,
                Some(NodeValue::Integer(_)) => stats.integers += 1,
                Some(NodeValue::Double(_)) => stats.doubles += 1,
                Some(NodeValue::String(_)) => stats.strings += 1,
                Some(NodeValue::Array(items)) => {
                    stats.arrays += 1;
                    to_visit.extend(items.iter().cloned());
                }
                Some(NodeValue::Object(members)) => {
                    stats.objects += 1;
                    to_visit.extend(members.values().cloned());
                }
                Some(NodeValue::Reference(target)) => {
                    stats.references += 1;
                    if target.strong_count() == 0 {
                        stats.dangling_references += 1;
                    }
                }
            }
        }

        stats.shared_nodes = owners.values().filter(|&&count| count > 1).count();
        stats
    }

    /// Concrete (non-reference) nodes.
    pub fn concrete_nodes(&self) -> usize {
        self.nulls
            + self.bools
            + self.integers
            + self.doubles
            + self.strings
            + self.arrays
            + self.objects
    }
}
