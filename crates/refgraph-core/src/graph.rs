//! Owning container for a parsed reference graph

use std::sync::Arc;

use crate::adapter::GraphAdapter;
use crate::model::{GraphNode, NodeRef};
use crate::stats::GraphStats;

/// The reference graph. Owns exactly one root node.
pub struct Graph {
    root: NodeRef,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("root_populated", &self.root.is_populated())
            .finish()
    }
}

impl Graph {
    /// An empty graph whose root is null.
    pub fn new() -> Self {
        Graph {
            root: Arc::new(GraphNode::empty()),
        }
    }

    pub(crate) fn with_root(root: NodeRef) -> Self {
        Graph { root }
    }

    /// Borrow the root node.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Get a shared handle to the root node.
    pub fn root_node(&self) -> NodeRef {
        Arc::clone(&self.root)
    }

    /// Replace the root, releasing the previous one.
    pub fn set_root(&mut self, root: NodeRef) {
        self.root = root;
    }

    /// Read-only view of the root.
    pub fn adapter(&self) -> GraphAdapter {
        GraphAdapter::new(self.root_node())
    }

    /// Census of the nodes reachable from the root.
    pub fn stats(&self) -> GraphStats {
        GraphStats::collect(&self.root)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
