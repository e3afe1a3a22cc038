//! A max-flow computation implementing Dinic's algorithm over the residual
//! graph. The solver alternates two phases until the sink becomes
//! unreachable: a BFS that labels every vertex with its level-graph
//! distance from the source, and a DFS that finds a blocking flow in the
//! level graph. Each vertex carries a next-edge cursor that is bumped past
//! dead ends, so one blocking-flow phase scans every bucket position at
//! most a constant number of times. The final level labelling doubles as
//! the min-cut certificate: a vertex is on the source side iff its level
//! is not the unreached sentinel.

use crate::{
    edge::{EdgeHandle, REVERSE_EDGE_ID},
    error::FlowError,
    node::NodeId,
    node_table::NodeHandle,
    residual_graph::ResidualGraph,
    ring_queue::RingQueue,
};
use bitvec::vec::BitVec;
use core::cmp::min;
use itertools::Itertools;
use log::debug;
use std::time::Instant;

/// Seed value for the DFS. Safely below half of `i64::MAX` so that
/// augmentation arithmetic cannot overflow.
pub const FLOW_INFINITY: i64 = i64::MAX / 2;

/// Level of a vertex not reached by the current BFS.
pub const UNREACHED: i64 = -1;

pub struct Dinic {
    graph: ResidualGraph,
    source: NodeId,
    target: NodeId,
    // per-handle solver scratch; meaningless outside a run
    levels: Vec<i64>,
    next_edge: Vec<usize>,
    queue: RingQueue,
    max_flow: i64,
    finished: bool,
    bfs_count: usize,
    dfs_count: usize,
}

impl Dinic {
    /// Takes ownership of the residual graph and validates the request:
    /// source and sink must differ and both must be stored vertices.
    pub fn new(graph: ResidualGraph, source: NodeId, target: NodeId) -> Result<Self, FlowError> {
        if source == target {
            return Err(FlowError::DegenerateRequest);
        }
        if !graph.nodes().contains(source) {
            return Err(FlowError::VertexMissing(source));
        }
        if !graph.nodes().contains(target) {
            return Err(FlowError::VertexMissing(target));
        }

        let number_of_nodes = graph.nodes().len();
        Ok(Self {
            graph,
            source,
            target,
            levels: vec![UNREACHED; number_of_nodes],
            next_edge: vec![0; number_of_nodes],
            queue: RingQueue::with_capacity(number_of_nodes),
            max_flow: 0,
            finished: false,
            bfs_count: 0,
            dfs_count: 0,
        })
    }

    /// Runs the solve to completion. Calling it again on a finished solver
    /// finds no augmenting path and leaves the result untouched.
    pub fn run(&mut self) {
        let start = Instant::now();
        while self.bfs() {
            // a fresh level graph invalidates all dead-end knowledge
            self.next_edge.fill(0);
            loop {
                self.dfs_count += 1;
                let pushed = self.dfs(self.source, FLOW_INFINITY);
                if pushed == 0 {
                    break;
                }
                self.max_flow += pushed;
            }
        }
        self.finished = true;
        debug!(
            "max flow {} after {} BFS and {} DFS runs in {:?}",
            self.max_flow,
            self.bfs_count,
            self.dfs_count,
            start.elapsed()
        );
    }

    // Rebuilds the level graph. Returns whether the sink is still
    // reachable through edges with positive residual capacity.
    fn bfs(&mut self) -> bool {
        let start = Instant::now();
        self.bfs_count += 1;

        self.levels.fill(UNREACHED);
        let graph = &self.graph;
        let source_handle = graph
            .node_handle(self.source)
            .expect("source verified at construction");
        self.levels[source_handle] = 0;

        self.queue.clear();
        self.queue.push_back(self.source);

        while let Some(u) = self.queue.pop_front() {
            let u_handle = graph.node_handle(u).expect("queued ids are stored");
            let u_level = self.levels[u_handle];
            for edge_handle in graph.outgoing(u) {
                let edge = graph.edges().edge(edge_handle);
                if edge.residual() <= 0 {
                    continue;
                }
                let target_handle = graph
                    .node_handle(edge.target)
                    .expect("endpoints verified at build");
                if self.levels[target_handle] != UNREACHED {
                    continue;
                }
                self.levels[target_handle] = u_level + 1;
                self.queue.push_back(edge.target);
            }
        }

        let target_handle = graph
            .node_handle(self.target)
            .expect("sink verified at construction");
        debug!(
            "BFS {} took {:?}, sink level {}",
            self.bfs_count,
            start.elapsed(),
            self.levels[target_handle]
        );
        self.levels[target_handle] != UNREACHED
    }

    // One augmenting path in the level graph, if any. Scans the outgoing
    // run of `u` from its cursor; an edge that fails to reach the sink is
    // skipped by all later calls within the same phase. Augmentation
    // happens as the recursion unwinds. Depth is bounded by the BFS
    // distance from source to sink.
    fn dfs(&mut self, u: NodeId, flow: i64) -> i64 {
        if u == self.target {
            return flow;
        }

        let u_handle = self
            .graph
            .node_handle(u)
            .expect("traversal stays on stored ids");
        let u_level = self.levels[u_handle];
        let bucket_len = self.graph.edges().bucket_for(u).len();

        let mut k = self.next_edge[u_handle];
        while k < bucket_len {
            let edge_handle = self.graph.edges().bucket_for(u)[k];
            let (source, target, residual) = {
                let edge = self.graph.edges().edge(edge_handle);
                (edge.source, edge.target, edge.residual())
            };

            // the bucket may hold colliding foreign sources; the run of u
            // is contiguous, so skip below it and stop above it
            if source < u {
                k += 1;
                continue;
            }
            if source > u {
                break;
            }

            if residual > 0 {
                let target_handle = self
                    .graph
                    .node_handle(target)
                    .expect("endpoints verified at build");
                if self.levels[target_handle] == u_level + 1 {
                    let bottleneck = self.dfs(target, min(flow, residual));
                    if bottleneck > 0 {
                        self.graph.augment(edge_handle, bottleneck);
                        return bottleneck;
                    }
                }
            }

            // dead end through this edge for the rest of the phase
            self.next_edge[u_handle] = k + 1;
            k += 1;
        }

        0
    }

    /// The computed flow value. An error until [`run`](Self::run) has
    /// completed.
    pub fn max_flow(&self) -> Result<i64, String> {
        if !self.finished {
            return Err("Flow was not computed.".to_string());
        }
        Ok(self.max_flow)
    }

    /// Final BFS level of a vertex handle; [`UNREACHED`] iff the vertex is
    /// not reachable from the source in the final residual graph.
    #[inline]
    pub fn level(&self, handle: NodeHandle) -> i64 {
        self.levels[handle]
    }

    /// The reachability partition as a handle-indexed bit vector: set bits
    /// are on the source side of the cut.
    pub fn source_side(&self) -> Result<BitVec, String> {
        if !self.finished {
            return Err("Flow was not computed.".to_string());
        }
        let mut side = BitVec::repeat(false, self.graph.nodes().len());
        for handle in self.graph.nodes().handles() {
            if self.levels[handle] != UNREACHED {
                side.set(handle, true);
            }
        }
        Ok(side)
    }

    /// The edges of a minimum s-t cut, ascending by original edge id: the
    /// forward edges that are saturated and have exactly one endpoint on
    /// the source side of the final reachability partition.
    pub fn min_cut(&self) -> Result<Vec<EdgeHandle>, String> {
        if !self.finished {
            return Err("Flow was not computed.".to_string());
        }
        let cut = self
            .graph
            .edges()
            .handles()
            .filter(|&handle| {
                let edge = self.graph.edges().edge(handle);
                if edge.id == REVERSE_EDGE_ID || edge.capacity == 0 || edge.flow != edge.capacity {
                    return false;
                }
                let source_cut = self.level_of(edge.source) == UNREACHED;
                let target_cut = self.level_of(edge.target) == UNREACHED;
                source_cut != target_cut
            })
            .sorted_by_key(|&handle| self.graph.edges().edge(handle).id)
            .collect_vec();
        Ok(cut)
    }

    #[inline]
    pub fn graph(&self) -> &ResidualGraph {
        &self.graph
    }

    fn level_of(&self, id: NodeId) -> i64 {
        let handle = self
            .graph
            .node_handle(id)
            .expect("endpoints verified at build");
        self.levels[handle]
    }
}
