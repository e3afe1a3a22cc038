use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group};
use flowcut::{
    dinic::Dinic, edge::FlowEdge, node::Node, node_table::NodeTable,
    residual_graph::ResidualGraph,
};
use rand::{RngExt, SeedableRng, rngs::StdRng};

/// A layered network: source, `layers` layers of `width` vertices each,
/// sink. Every vertex is wired to a handful of random vertices in the
/// next layer, so BFS produces many levels and DFS has real branching.
fn layered_network(layers: usize, width: usize) -> (ResidualGraph, i64, i64) {
    let mut rng = StdRng::seed_from_u64(0xf10c);
    let node_count = layers * width + 2;
    let source = 0i64;
    let sink = (node_count - 1) as i64;

    let mut nodes = NodeTable::with_capacity(node_count + 2);
    for id in 0..node_count as i64 {
        nodes.insert_unique(Node::new(id, ""));
    }

    let vertex = |layer: usize, slot: usize| (1 + layer * width + slot) as i64;
    let mut edges = Vec::new();
    let mut edge_id = 0i64;
    let mut push = |edges: &mut Vec<FlowEdge>, from: i64, to: i64, capacity: i64| {
        edges.push(FlowEdge::new(edge_id, from, to, capacity, true, ""));
        edge_id += 1;
    };

    for slot in 0..width {
        push(&mut edges, source, vertex(0, slot), rng.random_range(1..100));
    }
    for layer in 0..layers - 1 {
        for slot in 0..width {
            for _ in 0..3 {
                let next = rng.random_range(0..width);
                push(
                    &mut edges,
                    vertex(layer, slot),
                    vertex(layer + 1, next),
                    rng.random_range(1..100),
                );
            }
        }
    }
    for slot in 0..width {
        push(
            &mut edges,
            vertex(layers - 1, slot),
            sink,
            rng.random_range(1..100),
        );
    }

    let graph = ResidualGraph::build(nodes, &edges).expect("all endpoints exist");
    (graph, source, sink)
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dinic on layered networks");
    for (layers, width) in [(8, 16), (16, 32), (32, 64)] {
        let (graph, source, sink) = layered_network(layers, width);
        group.bench_function(BenchmarkId::new("run", format!("{layers}x{width}")), |b| {
            b.iter_batched(
                || graph.clone(),
                |graph| {
                    let mut solver =
                        Dinic::new(graph, source, sink).expect("source and sink exist");
                    solver.run();
                    solver.max_flow().expect("solver ran")
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(max_flow, bench_solve);
