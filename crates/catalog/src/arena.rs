//! Owning storage for the nodes of one declaration pass

use crate::types::ResourceNode;

/// Append-only owner of every node committed during a pass.
///
/// Nodes are never removed or aliased; at the end of the pass the whole
/// list moves out with [`ResourceArena::into_nodes`].
#[derive(Debug, Default)]
pub struct ResourceArena {
    nodes: Vec<ResourceNode>,
}

impl ResourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a fully built node and return a handle to it.
    pub(crate) fn alloc(&mut self, node: ResourceNode) -> &ResourceNode {
        let index = self.nodes.len();
        self.nodes.push(node);
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<ResourceNode> {
        self.nodes
    }
}
