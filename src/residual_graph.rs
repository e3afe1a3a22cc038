//! Residual-graph construction. Every loaded edge is duplicated into a
//! forward edge carrying the original capacity and a reverse edge with
//! capacity 0; the two are cross-linked through arena handles so that
//! augmenting one updates the other's residual. Both halves of a pair are
//! bucketed by their own source vertex, and every bucket is sorted by
//! source id afterwards so a vertex's outgoing edges form one contiguous
//! run.

use crate::{
    edge::{EdgeHandle, FlowEdge},
    edge_table::EdgeTable,
    error::FlowError,
    node::NodeId,
    node_table::{NodeHandle, NodeTable},
};
use log::debug;

#[derive(Clone, Debug)]
pub struct ResidualGraph {
    nodes: NodeTable,
    edges: EdgeTable,
}

impl ResidualGraph {
    /// Builds the working graph from the loaded stores. Fails with
    /// [`FlowError::VertexMissing`] if any edge endpoint has no node
    /// record; topology is immutable afterwards.
    pub fn build<'a>(
        nodes: NodeTable,
        loaded: impl IntoIterator<Item = &'a FlowEdge>,
    ) -> Result<Self, FlowError> {
        let mut edges = EdgeTable::with_buckets(nodes.bucket_count());

        for input in loaded {
            if !nodes.contains(input.source) {
                return Err(FlowError::VertexMissing(input.source));
            }
            if !nodes.contains(input.target) {
                return Err(FlowError::VertexMissing(input.target));
            }

            let mut forward = input.clone();
            forward.flow = 0;
            let mut reverse = FlowEdge::reverse_of(&forward);

            // the pair is pushed back-to-back, so the handles are known
            // before either edge lands in the arena
            let forward_handle = edges.len();
            forward.mate = forward_handle + 1;
            reverse.mate = forward_handle;

            let key = forward.source;
            edges.insert_unchecked(forward, key);
            let key = reverse.source;
            edges.insert_unchecked(reverse, key);
        }

        edges.sort_buckets_by_source();
        debug!(
            "residual graph: {} nodes, {} edges in {} buckets",
            nodes.len(),
            edges.len(),
            edges.bucket_count()
        );

        Ok(Self { nodes, edges })
    }

    /// Remaining capacity of the edge behind `handle`.
    #[inline]
    pub fn residual(&self, handle: EdgeHandle) -> i64 {
        self.edges.edge(handle).residual()
    }

    /// Pushes `bottleneck` units over an edge: its flow grows, its mate's
    /// flow shrinks by the same amount, keeping the pair sum at zero.
    pub fn augment(&mut self, handle: EdgeHandle, bottleneck: i64) {
        let mate = self.edges.edge(handle).mate;
        self.edges.edge_mut(handle).flow += bottleneck;
        self.edges.edge_mut(mate).flow -= bottleneck;
    }

    /// Handles of the outgoing residual edges of `id`, i.e. the contiguous
    /// source-sorted run within the bucket chosen by `id`. Colliding
    /// foreign-source edges are filtered with the three-way comparison.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = EdgeHandle> + '_ {
        self.edges
            .bucket_for(id)
            .iter()
            .copied()
            .skip_while(move |&handle| self.edges.edge(handle).source < id)
            .take_while(move |&handle| self.edges.edge(handle).source == id)
    }

    /// Arena handle of a node id. Endpoints were verified during build, so
    /// callers resolve ids that are known to be present.
    #[inline]
    pub fn node_handle(&self, id: NodeId) -> Option<NodeHandle> {
        self.nodes.handle(id)
    }

    #[inline]
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }
}
