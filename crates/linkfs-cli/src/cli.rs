use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "linkfs",
    about = "linkfs: files as content-addressed chains of chunks",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding stored nodes
    #[arg(long, global = true, default_value = ".linkfs")]
    pub store: PathBuf,

    /// TOML file with chain settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a file and print its head hash
    Put(PutArgs),
    /// Fetch a file by head hash
    Get(GetArgs),
    /// List the nodes of a stored chain
    Inspect(InspectArgs),
    /// Validate and normalise a hex hash
    Hash(HashArgs),
}

#[derive(Args)]
pub struct PutArgs {
    pub path: PathBuf,
    /// Print every node hash, not just the head
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub head: String,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub head: String,
    /// Re-check hashes and links of the fetched chain
    #[arg(long)]
    pub verify: bool,
}

#[derive(Args)]
pub struct HashArgs {
    pub hex: String,
}
