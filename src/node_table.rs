//! Bounded-hash vertex store. Nodes live in an arena and are addressed by
//! dense handles; a fixed set of buckets maps external (possibly negative)
//! ids onto arena handles. Lookups are O(1) on average, iteration visits
//! every stored node exactly once.

use crate::node::{Node, NodeId};

/// Index of a node in the arena of its owning table.
pub type NodeHandle = usize;

#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    arena: Vec<Node>,
    buckets: Vec<Vec<NodeHandle>>,
}

impl NodeTable {
    /// Creates a table sized for roughly `expected` nodes. The bucket count
    /// is fixed for the lifetime of the table.
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            arena: Vec::with_capacity(expected),
            buckets: vec![Vec::new(); expected.max(1)],
        }
    }

    #[inline]
    fn bucket_index(&self, id: NodeId) -> usize {
        id.rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Inserts `node` unless a node with the same id is already present.
    /// Returns whether the node was inserted; duplicates are input noise,
    /// not an error.
    pub fn insert_unique(&mut self, node: Node) -> bool {
        if self.contains(node.id) {
            return false;
        }
        let handle = self.arena.len();
        let index = self.bucket_index(node.id);
        self.arena.push(node);
        self.buckets[index].push(handle);
        true
    }

    /// Resolves an external id to its arena handle.
    pub fn handle(&self, id: NodeId) -> Option<NodeHandle> {
        self.buckets[self.bucket_index(id)]
            .iter()
            .copied()
            .find(|&handle| self.arena[handle].id == id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.handle(id).map(|handle| &self.arena[handle])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.handle(id).is_some()
    }

    #[inline]
    pub fn node(&self, handle: NodeHandle) -> &Node {
        &self.arena[handle]
    }

    /// Visits every stored node exactly once, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter()
    }

    pub fn handles(&self) -> std::ops::Range<NodeHandle> {
        0..self.arena.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
