//! Root-to-leaf node paths and cursors
//!
//! Built backwards during hit-testing: the located leaf goes in first and
//! each ancestor is prepended while walking up. Afterwards the path is
//! read-only and navigated through independent, clonable cursors. Pure
//! data structure; no provider calls happen here.

use std::sync::Arc;

use crate::tree::AccessibleNode;

/// An ordered sequence of nodes from a root down to a located leaf.
#[derive(Default)]
pub struct NodePath {
    nodes: Vec<Arc<AccessibleNode>>,
}

impl NodePath {
    pub fn new() -> Self {
        NodePath { nodes: Vec::new() }
    }

    /// Prepend an ancestor. Only used while constructing the path from a
    /// leaf back up to a root.
    pub fn add_parent(&mut self, node: Arc<AccessibleNode>) {
        self.nodes.insert(0, node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root end of the path, if any.
    pub fn root(&self) -> Option<&Arc<AccessibleNode>> {
        self.nodes.first()
    }

    /// The leaf end of the path, if any.
    pub fn leaf(&self) -> Option<&Arc<AccessibleNode>> {
        self.nodes.last()
    }

    /// An independent cursor positioned at the root end.
    pub fn create_cursor(&self) -> NodeCursor {
        NodeCursor {
            nodes: Arc::from(self.nodes.as_slice()),
            position: 0,
        }
    }
}

/// A clonable position within a [`NodePath`].
///
/// Movement saturates at the path bounds; [`NodeCursor::node`] is `None`
/// only when the path is empty.
#[derive(Clone)]
pub struct NodeCursor {
    nodes: Arc<[Arc<AccessibleNode>]>,
    position: usize,
}

impl NodeCursor {
    /// The node at the cursor, `None` when out of bounds.
    pub fn node(&self) -> Option<&Arc<AccessibleNode>> {
        self.nodes.get(self.position)
    }

    /// Current position index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move one step toward the leaf; saturates at the last node.
    pub fn move_next(&mut self) {
        if self.position + 1 < self.nodes.len() {
            self.position += 1;
        }
    }

    /// Move one step toward the root; saturates at the first node.
    pub fn move_previous(&mut self) {
        self.position = self.position.saturating_sub(1);
    }
}
