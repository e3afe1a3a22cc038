//! Loader and writer for the delimited network streams: a vertex file
//! (`id,WKT`) and an edge file (`id,source,target,capacity,isvalid,WKT`).
//! The WKT geometry extends to the end of the line and may itself contain
//! commas, so only the first commas up to the geometry column act as field
//! separators. The cut writer emits the edge grammar back out, ascending
//! by edge id.

use crate::{
    edge::{EdgeHandle, FlowEdge},
    edge_table::EdgeTable,
    error::FlowError,
    node::Node,
    node_table::NodeTable,
    residual_graph::ResidualGraph,
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

pub const NODES_HEADER: &str = "id,WKT";
pub const EDGES_HEADER: &str = "id,source,target,capacity,isvalid,WKT";

const VALID: &str = "True";
const INVALID: &str = "False";

/// Reads the vertex stream. Duplicate ids dedup silently (first record
/// wins); records too short to carry both fields are skipped with a
/// warning. A missing file or a wrong header rejects the whole input.
pub fn read_nodes(filename: &str) -> Result<NodeTable, FlowError> {
    let contents = fs::read_to_string(filename)
        .map_err(|cause| FlowError::InputRejected(format!("cannot read {filename}: {cause}")))?;

    let mut lines = contents.lines();
    match lines.next() {
        Some(header) if header.trim_end() == NODES_HEADER => {}
        _ => {
            return Err(FlowError::InputRejected(format!(
                "{filename} does not start with the '{NODES_HEADER}' header"
            )));
        }
    }

    // size the table from the record count; a couple of spare buckets keep
    // the smallest inputs off the degenerate single-bucket case
    let record_count = contents.lines().skip(1).count();
    let mut table = NodeTable::with_capacity(record_count + 2);

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_node(line) {
            Some(node) => {
                table.insert_unique(node);
            }
            None => warn!("skipping malformed vertex record: {line}"),
        }
    }

    info!("loaded {} vertices from {}", table.len(), filename);
    Ok(table)
}

fn parse_node(line: &str) -> Option<Node> {
    let (id, wkt) = line.split_once(',')?;
    let id = id.trim().parse().ok()?;
    Some(Node::new(id, wkt))
}

/// Reads the edge stream. `False` edges are discarded at load unless
/// `include_invalid` is set; duplicate ids dedup silently (first wins);
/// malformed records and negative capacities are skipped with a warning.
/// `bucket_count` sizes the id-keyed store, conventionally the bucket
/// count of the vertex table.
pub fn read_edges(
    filename: &str,
    include_invalid: bool,
    bucket_count: usize,
) -> Result<EdgeTable, FlowError> {
    let contents = fs::read_to_string(filename)
        .map_err(|cause| FlowError::InputRejected(format!("cannot read {filename}: {cause}")))?;

    let mut lines = contents.lines();
    match lines.next() {
        Some(header) if header.trim_end() == EDGES_HEADER => {}
        _ => {
            return Err(FlowError::InputRejected(format!(
                "{filename} does not start with the '{EDGES_HEADER}' header"
            )));
        }
    }

    let mut table = EdgeTable::with_buckets(bucket_count);
    let mut discarded = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_edge(line) {
            Some(edge) => {
                if !edge.is_valid && !include_invalid {
                    discarded += 1;
                    continue;
                }
                let key = edge.id;
                table.insert_checked(edge, key);
            }
            None => warn!("skipping malformed edge record: {line}"),
        }
    }

    info!(
        "loaded {} edges from {}, discarded {} invalid",
        table.len(),
        filename,
        discarded
    );
    Ok(table)
}

fn parse_edge(line: &str) -> Option<FlowEdge> {
    // only the first five commas separate fields; the WKT keeps its own
    let mut fields = line.splitn(6, ',');
    let id = fields.next()?.trim().parse().ok()?;
    let source = fields.next()?.trim().parse().ok()?;
    let target = fields.next()?.trim().parse().ok()?;

    // tolerate the thousands-formatted variant by stripping at most one
    // leading quote before parsing
    let capacity_field = fields.next()?.trim();
    let capacity: i64 = capacity_field
        .strip_prefix('"')
        .unwrap_or(capacity_field)
        .parse()
        .ok()?;
    if capacity < 0 {
        return None;
    }

    let is_valid = fields.next()?.trim() == VALID;
    let wkt = fields.next()?;
    Some(FlowEdge::new(id, source, target, capacity, is_valid, wkt))
}

/// Writes the cut stream: the edge-file header followed by one record per
/// cut edge, in the order given (callers pass the id-ascending cut).
pub fn write_cut<W: Write>(
    writer: &mut W,
    graph: &ResidualGraph,
    cut: &[EdgeHandle],
) -> Result<(), FlowError> {
    writeln!(writer, "{EDGES_HEADER}")?;
    for &handle in cut {
        let edge = graph.edges().edge(handle);
        let validity = if edge.is_valid { VALID } else { INVALID };
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            edge.id, edge.source, edge.target, edge.capacity, validity, edge.wkt
        )?;
    }
    Ok(())
}

/// [`write_cut`] through a buffered file.
pub fn write_cut_file(
    filename: &str,
    graph: &ResidualGraph,
    cut: &[EdgeHandle],
) -> Result<(), FlowError> {
    let mut writer = BufWriter::new(File::create(filename)?);
    write_cut(&mut writer, graph, cut)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dinic::Dinic;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn path(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn read_nodes_happy_path() {
        let file = temp_file("id,WKT\n1,POINT (1 1)\n-2,POINT (2 2)\n");
        let table = read_nodes(path(&file)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().wkt, "POINT (1 1)");
        assert_eq!(table.get(-2).unwrap().wkt, "POINT (2 2)");
    }

    #[test]
    fn read_nodes_rejects_wrong_header() {
        let file = temp_file("id;WKT\n1,POINT (1 1)\n");
        assert!(matches!(
            read_nodes(path(&file)),
            Err(FlowError::InputRejected(_))
        ));
    }

    #[test]
    fn read_nodes_rejects_missing_file() {
        assert!(matches!(
            read_nodes("no_such_vertex_file.csv"),
            Err(FlowError::InputRejected(_))
        ));
    }

    #[test]
    fn read_nodes_dedups_first_wins() {
        let file = temp_file("id,WKT\n1,POINT (1 1)\n1,POINT (9 9)\n");
        let table = read_nodes(path(&file)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().wkt, "POINT (1 1)");
    }

    #[test]
    fn read_nodes_skips_malformed_records() {
        let file = temp_file("id,WKT\n1,POINT (1 1)\nnot-a-vertex\nx,POINT (0 0)\n\n");
        let table = read_nodes(path(&file)).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn node_wkt_keeps_embedded_commas() {
        let file = temp_file("id,WKT\n7,POLYGON ((0 0, 1 0, 1 1))\n");
        let table = read_nodes(path(&file)).unwrap();
        assert_eq!(table.get(7).unwrap().wkt, "POLYGON ((0 0, 1 0, 1 1))");
    }

    #[test]
    fn read_edges_happy_path() {
        let file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n\
             10,1,2,5,True,LINESTRING (0 0, 1 1)\n",
        );
        let table = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(table.len(), 1);
        let edge = table.iter().next().unwrap();
        assert_eq!(edge.id, 10);
        assert_eq!(edge.source, 1);
        assert_eq!(edge.target, 2);
        assert_eq!(edge.capacity, 5);
        assert!(edge.is_valid);
        assert_eq!(edge.wkt, "LINESTRING (0 0, 1 1)");
    }

    #[test]
    fn read_edges_rejects_wrong_header() {
        let file = temp_file("id,from,to,capacity,isvalid,WKT\n");
        assert!(matches!(
            read_edges(path(&file), false, 8),
            Err(FlowError::InputRejected(_))
        ));
    }

    #[test]
    fn invalid_edges_are_filtered_unless_requested() {
        let contents = "id,source,target,capacity,isvalid,WKT\n\
                        1,1,2,5,True,LINESTRING (0 0, 1 1)\n\
                        2,2,3,5,False,LINESTRING (1 1, 2 2)\n";
        let file = temp_file(contents);
        let filtered = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(filtered.len(), 1);
        let kept = read_edges(path(&file), true, 8).unwrap();
        assert_eq!(kept.len(), 2);
        let invalid = kept.iter().find(|edge| edge.id == 2).unwrap();
        assert!(!invalid.is_valid);
    }

    #[test]
    fn quoted_capacity_strips_one_leading_quote() {
        let file = temp_file("id,source,target,capacity,isvalid,WKT\n1,1,2,\"25,True,POINT (0 0)\n");
        let table = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(table.iter().next().unwrap().capacity, 25);
    }

    #[test]
    fn thousands_formatted_capacity_keeps_its_leading_group() {
        // the comma inside "1,234" shifts the remaining fields; the record
        // is read with the leading group as capacity and lands invalid
        let file =
            temp_file("id,source,target,capacity,isvalid,WKT\n1,1,2,\"1,234\",True,POINT (0 0)\n");
        let table = read_edges(path(&file), true, 8).unwrap();
        let edge = table.iter().next().unwrap();
        assert_eq!(edge.capacity, 1);
        assert!(!edge.is_valid);
    }

    #[test]
    fn negative_capacity_rejects_the_record() {
        let file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n\
             1,1,2,-5,True,POINT (0 0)\n\
             2,1,2,5,True,POINT (0 0)\n",
        );
        let table = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().id, 2);
    }

    #[test]
    fn duplicate_edge_ids_dedup_first_wins() {
        let file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n\
             1,1,2,5,True,POINT (0 0)\n\
             1,3,4,9,True,POINT (1 1)\n",
        );
        let table = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().source, 1);
    }

    #[test]
    fn edge_wkt_keeps_embedded_commas() {
        let file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n1,1,2,5,True,LINESTRING (0 0, 1 1, 2 2)\n",
        );
        let table = read_edges(path(&file), false, 8).unwrap();
        assert_eq!(table.iter().next().unwrap().wkt, "LINESTRING (0 0, 1 1, 2 2)");
    }

    #[test]
    fn write_cut_emits_the_input_grammar() {
        let nodes_file = temp_file("id,WKT\n1,POINT (0 0)\n2,POINT (1 1)\n");
        let edges_file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n10,1,2,5,True,LINESTRING (0 0, 1 1)\n",
        );
        let nodes = read_nodes(path(&nodes_file)).unwrap();
        let edges = read_edges(path(&edges_file), false, nodes.bucket_count()).unwrap();
        let graph = ResidualGraph::build(nodes, edges.iter()).unwrap();
        let mut solver = Dinic::new(graph, 1, 2).unwrap();
        solver.run();

        let cut = solver.min_cut().unwrap();
        let mut buffer = Vec::new();
        write_cut(&mut buffer, solver.graph(), &cut).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,source,target,capacity,isvalid,WKT\n10,1,2,5,True,LINESTRING (0 0, 1 1)\n"
        );
    }

    #[test]
    fn pipeline_respects_the_invalid_flag() {
        let nodes_file = temp_file("id,WKT\n1,POINT (0 0)\n2,POINT (1 1)\n3,POINT (2 2)\n");
        let edges_file = temp_file(
            "id,source,target,capacity,isvalid,WKT\n\
             60,1,2,5,True,LINESTRING (0 0, 1 1)\n\
             61,2,3,5,False,LINESTRING (1 1, 2 2)\n",
        );

        // invalid edges dropped: the sink is unreachable
        let nodes = read_nodes(path(&nodes_file)).unwrap();
        let edges = read_edges(path(&edges_file), false, nodes.bucket_count()).unwrap();
        let graph = ResidualGraph::build(nodes, edges.iter()).unwrap();
        let mut solver = Dinic::new(graph, 1, 3).unwrap();
        solver.run();
        assert_eq!(solver.max_flow().unwrap(), 0);
        assert!(solver.min_cut().unwrap().is_empty());

        // invalid edges kept: flow passes and the boundary edge is 61
        let nodes = read_nodes(path(&nodes_file)).unwrap();
        let edges = read_edges(path(&edges_file), true, nodes.bucket_count()).unwrap();
        let graph = ResidualGraph::build(nodes, edges.iter()).unwrap();
        let mut solver = Dinic::new(graph, 1, 3).unwrap();
        solver.run();
        assert_eq!(solver.max_flow().unwrap(), 5);

        let cut = solver.min_cut().unwrap();
        let output = NamedTempFile::new().unwrap();
        write_cut_file(path(&output), solver.graph(), &cut).unwrap();
        let written = fs::read_to_string(path(&output)).unwrap();
        assert_eq!(
            written,
            "id,source,target,capacity,isvalid,WKT\n61,2,3,5,False,LINESTRING (1 1, 2 2)\n"
        );
    }

    #[test]
    fn write_cut_file_fails_on_unwritable_path() {
        let nodes_file = temp_file("id,WKT\n1,POINT (0 0)\n2,POINT (1 1)\n");
        let nodes = read_nodes(path(&nodes_file)).unwrap();
        let graph = ResidualGraph::build(nodes, []).unwrap();
        let result = write_cut_file("/no/such/directory/cut.csv", &graph, &[]);
        assert!(matches!(result, Err(FlowError::OutputWriteFailed(_))));
    }
}
