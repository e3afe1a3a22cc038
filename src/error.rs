use crate::node::NodeId;
use thiserror::Error;

/// Fatal error kinds at the library boundary. There is no retry or
/// partial-result mode; the binary adapter maps each kind to a diagnostic
/// and exit code.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Malformed header or unreadable file at the loader boundary.
    #[error("input rejected: {0}")]
    InputRejected(String),

    /// A referenced vertex id is absent from the node table.
    #[error("vertex {0} is not part of the network")]
    VertexMissing(NodeId),

    /// The source vertex equals the sink vertex.
    #[error("source and sink vertices must differ")]
    DegenerateRequest,

    /// The cut stream could not be emitted.
    #[error("failed to write cut output")]
    OutputWriteFailed(#[from] std::io::Error),
}
