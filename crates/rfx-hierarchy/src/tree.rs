//! Tree node storage.
//!
//! Children are owned by their parent, so dropping a child set drops every
//! descendant with it.

use rfx_protocol::{NodeContext, NodeRole};

/// Process-unique identifier of a materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing ids; never reuses one.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Expansion state of one node.
///
/// There is no collapsed-after-expanded state: activation always clears and
/// refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Loading,
    Loaded,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub label: String,
    /// `None` for field rows, which are leaves.
    pub context: Option<NodeContext>,
    pub state: ExpansionState,
    /// Bumped on every activation; completions carry the value they were
    /// issued under.
    pub generation: u64,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId, role: NodeRole, label: String, context: Option<NodeContext>) -> Self {
        Self {
            id,
            role,
            label,
            context,
            state: ExpansionState::Collapsed,
            generation: 0,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.context.is_none()
    }

    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }
}

pub(crate) fn find(nodes: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_mut(nodes: &mut [TreeNode], id: NodeId) -> Option<&mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ids: &mut IdAllocator, label: &str) -> TreeNode {
        TreeNode::new(ids.next_id(), NodeRole::Field, label.to_string(), None)
    }

    #[test]
    fn ids_are_never_reused() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn find_reaches_nested_nodes() {
        let mut ids = IdAllocator::default();
        let mut root = TreeNode::new(
            ids.next_id(),
            NodeRole::Method,
            "Ping".to_string(),
            None,
        );
        let child = leaf(&mut ids, "message");
        let child_id = child.id;
        root.children.push(child);
        let mut roots = vec![root];

        assert_eq!(find(&roots, child_id).map(|n| n.label.as_str()), Some("message"));
        find_mut(&mut roots, child_id).unwrap().label = "renamed".to_string();
        assert_eq!(roots[0].child_labels(), vec!["renamed"]);

        roots[0].children.clear();
        assert!(find(&roots, child_id).is_none());
    }
}
