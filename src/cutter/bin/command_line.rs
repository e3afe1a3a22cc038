use clap::Parser;
use flowcut::node::NodeId;
use std::fmt::Display;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Arguments {
    /// input vertex file
    #[clap(short = 'v', long, action)]
    pub vertices: String,
    /// input edge file
    #[clap(short = 'e', long, action)]
    pub edges: String,
    /// also load edges flagged invalid
    #[clap(short = 'a', long, action)]
    pub include_invalid: bool,
    /// id of the source vertex
    #[clap(short, long, allow_hyphen_values = true)]
    pub source: NodeId,
    /// id of the sink vertex
    #[clap(short = 't', long, allow_hyphen_values = true)]
    pub sink: NodeId,
    /// cut output file
    #[clap(short, long, action)]
    pub output: Option<String>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "command line arguments:")?;
        writeln!(f, "vertices: {}", self.vertices)?;
        writeln!(f, "edges: {}", self.edges)?;
        writeln!(f, "include_invalid: {}", self.include_invalid)?;
        writeln!(f, "source: {}", self.source)?;
        writeln!(f, "sink: {}", self.sink)?;
        writeln!(f, "output: {}", self.output.as_deref().unwrap_or("<none>"))
    }
}
