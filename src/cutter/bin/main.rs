mod command_line;

use crate::command_line::Arguments;
use env_logger::Env;
use flowcut::{dinic::Dinic, geocsv, residual_graph::ResidualGraph};
use log::info;
use std::process::exit;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    println!(r#"      cutting networks along their weakest seam.       "#);
    println!(r#"       ___     _  _     _       _                      "#);
    println!(r#"      / __|   | || |   | |_    | |_    ___      _ _    "#);
    println!(r#"     | (__    | \/ |   |  _|   |  _|  / -_)    | '_|   "#);
    println!(r#"      \___|    \__/     \__|    \__|  \___|   _|_|_    "#);
    println!(r#"    _|"""""|_|"""""|_|"""""|_|"""""|_|"""""|_|"""""|   "#);
    println!(r#"    "`-0-0-'"`-0-0-'"`-0-0-'"`-0-0-'"`-0-0-'"`-0-0-'   "#);

    // parse and print command line parameters
    let args = <Arguments as clap::Parser>::parse();
    info!("{args}");

    let nodes = match geocsv::read_nodes(&args.vertices) {
        Ok(nodes) => nodes,
        Err(error) => {
            info!("{error}");
            println!("Invalid vertex file.");
            exit(1);
        }
    };

    let edges = match geocsv::read_edges(&args.edges, args.include_invalid, nodes.bucket_count()) {
        Ok(edges) => edges,
        Err(error) => {
            info!("{error}");
            println!("Invalid edge file.");
            exit(2);
        }
    };

    if !nodes.contains(args.source) {
        println!("Invalid source vertex.");
        exit(3);
    }
    if args.sink == args.source || !nodes.contains(args.sink) {
        println!("Invalid sink vertex.");
        exit(4);
    }

    let graph = match ResidualGraph::build(nodes, edges.iter()) {
        Ok(graph) => graph,
        Err(error) => {
            info!("{error}");
            println!("Unable to create graph.");
            exit(7);
        }
    };

    let mut solver = match Dinic::new(graph, args.source, args.sink) {
        Ok(solver) => solver,
        Err(error) => {
            info!("{error}");
            println!("Unable to create graph.");
            exit(7);
        }
    };
    solver.run();

    let max_flow = solver.max_flow().expect("solver ran to completion");
    println!("Max network flow is |x| = {max_flow}.");
    if max_flow == 0 {
        exit(6);
    }

    if let Some(output) = &args.output {
        let cut = solver.min_cut().expect("solver ran to completion");
        info!("writing {} cut edges to {}", cut.len(), output);
        if let Err(error) = geocsv::write_cut_file(output, solver.graph(), &cut) {
            info!("{error}");
            println!("Invalid output file.");
            exit(5);
        }
    }
}
