//! Bounded-hash edge store. Edges live in an arena owned by the table;
//! buckets group arena handles by a hashed key. The loader keys buckets by
//! edge id to filter duplicates; the residual-graph builder keys them by
//! source vertex id so that enumerating a vertex's outgoing residual edges
//! is one bucket scan. Because distinct ids can collide onto a bucket, a
//! bucket is sorted by `source` after construction and callers filter a
//! probe with a three-way comparison: skip while `edge.source < id`, stop
//! once `edge.source > id`.

use crate::edge::{EdgeHandle, FlowEdge};

#[derive(Clone, Debug, Default)]
pub struct EdgeTable {
    arena: Vec<FlowEdge>,
    buckets: Vec<Vec<EdgeHandle>>,
}

impl EdgeTable {
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            arena: Vec::new(),
            buckets: vec![Vec::new(); bucket_count.max(1)],
        }
    }

    #[inline]
    fn bucket_index(&self, key: i64) -> usize {
        key.rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Input-phase insert, deduplicating by edge id: if any edge with the
    /// same id is already stored, the new record is refused (first wins).
    pub fn insert_checked(&mut self, edge: FlowEdge, key: i64) -> bool {
        let index = self.bucket_index(key);
        let duplicate = self.buckets[index]
            .iter()
            .any(|&handle| self.arena[handle].id == edge.id);
        if duplicate {
            return false;
        }
        let handle = self.arena.len();
        self.arena.push(edge);
        self.buckets[index].push(handle);
        true
    }

    /// Residual-phase insert. No deduplication: all generated reverse
    /// edges share the same sentinel id and must coexist.
    pub fn insert_unchecked(&mut self, edge: FlowEdge, key: i64) -> EdgeHandle {
        let handle = self.arena.len();
        let index = self.bucket_index(key);
        self.arena.push(edge);
        self.buckets[index].push(handle);
        handle
    }

    /// The ordered bucket chosen by `key`. May contain edges whose source
    /// differs from the probed vertex id; callers filter.
    pub fn bucket_for(&self, key: i64) -> &[EdgeHandle] {
        &self.buckets[self.bucket_index(key)]
    }

    /// Stable per-bucket sort by source id, so that each vertex's edges
    /// form a contiguous run. Equal sources keep their relative order.
    pub fn sort_buckets_by_source(&mut self) {
        // sort_by_key can't borrow self.arena while self.buckets is borrowed
        // mutably, so the arena is captured first
        let arena = &self.arena;
        for bucket in &mut self.buckets {
            bucket.sort_by_key(|&handle| arena[handle].source);
        }
    }

    #[inline]
    pub fn edge(&self, handle: EdgeHandle) -> &FlowEdge {
        &self.arena[handle]
    }

    #[inline]
    pub fn edge_mut(&mut self, handle: EdgeHandle) -> &mut FlowEdge {
        &mut self.arena[handle]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowEdge> {
        self.arena.iter()
    }

    pub fn handles(&self) -> std::ops::Range<EdgeHandle> {
        0..self.arena.len()
    }

    /// Iteration over the raw buckets, used to finalize and to emit edges.
    pub fn buckets(&self) -> impl Iterator<Item = &[EdgeHandle]> {
        self.buckets.iter().map(Vec::as_slice)
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
