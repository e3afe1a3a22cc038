use crate::node::NodeId;

/// External edge identifier, taken from the input files.
pub type EdgeId = i64;

/// Index of an edge in the arena of its owning table.
pub type EdgeHandle = usize;

/// Id carried by every generated reverse edge.
pub const REVERSE_EDGE_ID: EdgeId = -1;

/// Sentinel for an edge that has no residual partner (yet).
pub const INVALID_EDGE_HANDLE: EdgeHandle = EdgeHandle::MAX;

/// A directed, capacitated edge. The same record type serves both the
/// loaded input edges (no partner, zero flow) and the edges of the residual
/// graph, where every forward edge is cross-linked with a capacity-0
/// reverse partner through `mate`.
#[derive(Clone, Debug)]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub capacity: i64,
    pub flow: i64,
    pub is_valid: bool,
    pub wkt: String,
    pub mate: EdgeHandle,
}

impl FlowEdge {
    pub fn new(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        capacity: i64,
        is_valid: bool,
        wkt: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            target,
            capacity,
            flow: 0,
            is_valid,
            wkt: wkt.into(),
            mate: INVALID_EDGE_HANDLE,
        }
    }

    /// The capacity-0 partner of a forward edge. Carries the reverse id
    /// sentinel and no geometry.
    pub fn reverse_of(forward: &FlowEdge) -> Self {
        Self {
            id: REVERSE_EDGE_ID,
            source: forward.target,
            target: forward.source,
            capacity: 0,
            flow: 0,
            is_valid: false,
            wkt: String::new(),
            mate: INVALID_EDGE_HANDLE,
        }
    }

    /// Remaining capacity, `capacity - flow`. On a reverse edge this equals
    /// the flow pushed over its forward partner.
    #[inline]
    pub fn residual(&self) -> i64 {
        self.capacity - self.flow
    }
}
